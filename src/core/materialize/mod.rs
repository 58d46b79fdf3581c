// ─── Artifact Materializer ───
// Post-fetch handling: unpack archives, run self-extracting packages.

mod archive;
mod self_extract;

use std::path::{Path, PathBuf};

use crate::core::error::{LauncherError, LauncherResult};

pub use archive::extract_zip_file;
pub use self_extract::run_self_extract;

/// Post-processing applied to a fetched file.
///
/// The caller's flags are widened by file suffix: `.zip` always unpacks,
/// `.exe` always self-extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterializePlan {
    pub unpack: bool,
    pub self_extract: bool,
}

impl MaterializePlan {
    pub fn for_path(path: &Path, unpack: bool, self_extract: bool) -> Self {
        Self {
            unpack: unpack || has_extension(path, "zip"),
            self_extract: self_extract || has_extension(path, "exe"),
        }
    }
}

/// Unpack and/or self-extract `path` into its containing directory.
pub async fn materialize(path: &Path, unpack: bool, self_extract: bool) -> LauncherResult<()> {
    let plan = MaterializePlan::for_path(path, unpack, self_extract);
    if !plan.unpack && !plan.self_extract {
        return Ok(());
    }

    let target_dir = containing_dir(path);

    if plan.unpack {
        let zip_path = path.to_path_buf();
        let dest = target_dir.clone();
        tokio::task::spawn_blocking(move || extract_zip_file(&zip_path, &dest))
            .await
            .map_err(|e| LauncherError::Task(format!("unpack {:?}: {}", path, e)))??;
    }

    if plan.self_extract {
        run_self_extract(path, &target_dir).await?;
    }

    Ok(())
}

fn containing_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
