// ─── Artifact Resolution ───
// Pure mapping from descriptor references to remote URLs and cache paths.

use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::core::descriptor::{ArtifactKind, ArtifactRef, PrivateRuntime};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform;

const APP_DIR: &str = "app";

/// Codebase and cache root of one descriptor. Fixed for the whole
/// resolution of that descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveBase {
    pub codebase: Url,
    pub cache_root: PathBuf,
}

impl ResolveBase {
    pub fn new(
        descriptor_url: &Url,
        codebase: Option<&str>,
        cache_dir: &Path,
    ) -> LauncherResult<Self> {
        Ok(Self {
            codebase: derive_codebase(descriptor_url, codebase)?,
            cache_root: cache_dir.join(host_dir_name(descriptor_url)),
        })
    }
}

/// A reference resolved against a [`ResolveBase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub kind: ArtifactKind,
    pub url: Url,
    pub path: PathBuf,
}

/// Resolve a `<jar>`, `<nativelib>` or `<extension>` reference.
///
/// The local path is `<cache_root>/app/<href>`.
pub fn resolve(
    reference: &ArtifactRef,
    kind: ArtifactKind,
    base: &ResolveBase,
) -> LauncherResult<ResolvedArtifact> {
    let url = join_href(&base.codebase, &reference.href)?;
    let mut path = base.cache_root.join(APP_DIR);
    for segment in href_segments(&reference.href) {
        path.push(segment);
    }

    Ok(ResolvedArtifact { kind, url, path })
}

/// Resolve a `<private_jre>` reference.
///
/// The local path is `<cache_root>/<arch>/<file name>`, where `<arch>` is
/// the element's own `arch` attribute, or `default_arch` when it has none.
pub fn resolve_private_runtime(
    runtime: &PrivateRuntime,
    default_arch: &str,
    base: &ResolveBase,
) -> LauncherResult<ResolvedArtifact> {
    let url = join_href(&base.codebase, &runtime.href)?;
    let file_name = href_segments(&runtime.href)
        .pop()
        .ok_or_else(|| invalid(&runtime.href, "no file name"))?;
    let arch = runtime
        .arch
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(default_arch);

    Ok(ResolvedArtifact {
        kind: ArtifactKind::PrivateRuntime,
        url,
        path: base
            .cache_root
            .join(sanitize_segment(arch))
            .join(file_name),
    })
}

/// Executable of a runtime extracted next to its package.
pub fn runtime_executable(package_path: &Path) -> PathBuf {
    package_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("bin")
        .join(platform::java_exe())
}

/// Codebase URL with a trailing slash.
///
/// Without a `codebase` attribute the descriptor URL minus its last
/// segment is used; a relative attribute is resolved against the
/// descriptor URL.
pub fn derive_codebase(descriptor_url: &Url, codebase: Option<&str>) -> LauncherResult<Url> {
    let raw = codebase.map(str::trim).filter(|c| !c.is_empty());
    let mut base = match raw {
        Some(codebase) => descriptor_url
            .join(codebase)
            .map_err(|e| invalid(codebase, &e.to_string()))?,
        None => descriptor_url
            .join(".")
            .map_err(|e| invalid(descriptor_url.as_str(), &e.to_string()))?,
    };

    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base)
}

/// Directory name for the cache root of `url`: host plus explicit port,
/// with everything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn host_dir_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("localhost");
    let raw = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    sanitize_segment(&raw)
}

fn sanitize_segment(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn join_href(codebase: &Url, href: &str) -> LauncherResult<Url> {
    let href = href.trim();
    if href.is_empty() {
        return Err(invalid(href, "empty href"));
    }
    if href_segments(href).is_empty() {
        return Err(invalid(href, "href names no file"));
    }
    codebase.join(href).map_err(|e| invalid(href, &e.to_string()))
}

/// Normal path segments of an href. Query, fragment, `.`/`..` and empty
/// segments are dropped so the result always stays under its root.
fn href_segments(href: &str) -> Vec<String> {
    let path = match Url::parse(href) {
        Ok(absolute) => absolute.path().to_string(),
        Err(_) => href
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    path.split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .map(ToString::to_string)
        .collect()
}

fn invalid(url: &str, reason: &str) -> LauncherError {
    LauncherError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
