// ─── Resolution Engine ───
// Walks the descriptor graph, fans out artifact fetches and extension
// resolutions as independent tasks, and joins the whole tree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use reqwest::Url;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::artifact::{
    resolve, resolve_private_runtime, runtime_executable, ResolveBase, ResolvedArtifact,
};
use super::errors::ErrorCollector;
use crate::core::config::LauncherConfig;
use crate::core::descriptor::{
    ArtifactKind, ArtifactRef, Descriptor, LaunchTarget, PrivateRuntime, RuntimeHints,
};
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::materialize::materialize;

/// Everything the launch needs once the descriptor tree is resolved.
#[derive(Debug, Clone)]
pub struct ResolvedApplication {
    pub url: Url,
    pub descriptor: Descriptor,
    /// Jar paths of the root and every reachable extension.
    pub classpath: Vec<PathBuf>,
    /// Directories holding unpacked native libraries.
    pub native_dirs: Vec<PathBuf>,
    /// Hints from the root descriptor's active resource groups.
    pub hints: RuntimeHints,
    /// Executable of the root descriptor's private runtime, when one applies.
    pub private_runtime: Option<PathBuf>,
}

impl ResolvedApplication {
    pub fn launch_target(&self) -> Option<LaunchTarget> {
        self.descriptor.launch_target()
    }
}

/// Resolves a descriptor URL into a fully materialized artifact set.
#[derive(Debug, Clone)]
pub struct Resolver {
    downloader: Downloader,
    config: Arc<LauncherConfig>,
}

/// State shared by every task of one resolution run.
#[derive(Debug)]
struct Shared {
    downloader: Downloader,
    config: Arc<LauncherConfig>,
    errors: ErrorCollector,
    /// Descriptor URLs already claimed by some resolution in this run.
    visited: Mutex<HashSet<Url>>,
}

impl Shared {
    fn new(downloader: Downloader, config: Arc<LauncherConfig>) -> Self {
        Self {
            downloader,
            config,
            errors: ErrorCollector::new(),
            visited: Mutex::new(HashSet::new()),
        }
    }

    /// Claim `url` for resolution. `false` when it was claimed before, which
    /// covers extension cycles and descriptors reached through several paths.
    fn first_visit(&self, url: &Url) -> bool {
        let mut key = url.clone();
        key.set_fragment(None);
        self.visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Root,
    Extension,
}

/// Path contributions of one descriptor and its extensions.
#[derive(Debug, Default)]
struct Contributions {
    classpath: Vec<PathBuf>,
    native_dirs: Vec<PathBuf>,
}

/// Value produced by one scheduled task.
#[derive(Debug)]
enum Contribution {
    Jar(PathBuf),
    NativeDir(PathBuf),
    Nested(Contributions),
}

#[derive(Debug, Default)]
struct Expansion {
    contributions: Contributions,
    hints: RuntimeHints,
    private_runtime: Option<PathBuf>,
}

type TaskSet = JoinSet<Option<(usize, Contribution)>>;

impl Resolver {
    pub fn new(config: LauncherConfig, downloader: Downloader) -> Self {
        Self {
            downloader,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Resolve the descriptor at `url` and everything it references.
    ///
    /// Failing to fetch or parse the root descriptor is returned directly
    /// before anything is scheduled. Any failure of a scheduled task is
    /// reported after every task of the tree has finished.
    pub async fn resolve(&self, url: &str) -> LauncherResult<ResolvedApplication> {
        let url = Url::parse(url.trim()).map_err(|e| LauncherError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let descriptor = Descriptor::fetch(self.downloader.client(), &url).await?;

        let shared = Arc::new(Shared::new(self.downloader.clone(), self.config.clone()));
        shared.first_visit(&url);

        let expansion = expand(shared.clone(), &url, &descriptor, Scope::Root).await;
        shared.errors.clone().into_result()?;

        let Expansion {
            contributions,
            hints,
            private_runtime,
        } = expansion;

        info!(
            "Resolved {}: {} classpath entries, {} native directories",
            url,
            contributions.classpath.len(),
            contributions.native_dirs.len()
        );

        Ok(ResolvedApplication {
            url,
            descriptor,
            classpath: contributions.classpath,
            native_dirs: contributions.native_dirs,
            hints,
            private_runtime,
        })
    }
}

/// Schedule every artifact of `descriptor` and wait for all of them.
///
/// Returns only after every spawned task, including nested extension
/// resolutions, has finished. Failures are recorded in `shared.errors`.
async fn expand(
    shared: Arc<Shared>,
    url: &Url,
    descriptor: &Descriptor,
    scope: Scope,
) -> Expansion {
    let config = &shared.config;
    let base = match ResolveBase::new(url, descriptor.codebase.as_deref(), &config.cache_dir) {
        Ok(base) => base,
        Err(e) => {
            shared.errors.record(e);
            return Expansion::default();
        }
    };
    debug!("Codebase for {}: {}", url, base.codebase);

    let mut tasks = TaskSet::new();
    let mut next_index = 0usize;
    let mut hints = RuntimeHints::default();

    for group in descriptor.active_groups(&config.os, &config.arch) {
        for jar in &group.jars {
            schedule_artifact(&mut tasks, &shared, &base, next_index, jar, ArtifactKind::Jar);
            next_index += 1;
        }

        for native in &group.nativelibs {
            schedule_artifact(
                &mut tasks,
                &shared,
                &base,
                next_index,
                native,
                ArtifactKind::NativeLibrary,
            );
            next_index += 1;
        }

        for extension in &group.extensions {
            schedule_extension(&mut tasks, &shared, &base, next_index, extension);
            next_index += 1;
        }

        if scope == Scope::Root {
            hints.merge(group.runtime_hints());
        }
    }

    info!("Scheduled {} tasks for {}", tasks.len(), url);

    // The runtime path must be known before the launch, so this one is
    // awaited here while the scheduled tasks keep running.
    let runtime = match descriptor.active_private_runtime(&config.os, &config.arch) {
        Some(jre) => fetch_private_runtime(&shared, &base, jre).await,
        None => None,
    };

    let mut finished = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(done)) => finished.push(done),
            Ok(None) => {}
            Err(e) => shared.errors.record(LauncherError::Task(e.to_string())),
        }
    }
    finished.sort_by_key(|(index, _)| *index);

    let mut contributions = Contributions::default();
    for (_, contribution) in finished {
        match contribution {
            Contribution::Jar(path) => contributions.classpath.push(path),
            Contribution::NativeDir(dir) => contributions.native_dirs.push(dir),
            Contribution::Nested(nested) => {
                contributions.classpath.extend(nested.classpath);
                contributions.native_dirs.extend(nested.native_dirs);
            }
        }
    }
    dedup_preserving_order(&mut contributions.classpath);
    dedup_preserving_order(&mut contributions.native_dirs);

    match scope {
        Scope::Root => Expansion {
            contributions,
            hints,
            private_runtime: runtime,
        },
        Scope::Extension => Expansion {
            contributions,
            ..Expansion::default()
        },
    }
}

fn schedule_artifact(
    tasks: &mut TaskSet,
    shared: &Arc<Shared>,
    base: &ResolveBase,
    index: usize,
    reference: &ArtifactRef,
    kind: ArtifactKind,
) {
    let artifact = match resolve(reference, kind, base) {
        Ok(artifact) => artifact,
        Err(e) => {
            shared.errors.record(e);
            return;
        }
    };

    let shared = shared.clone();
    tasks.spawn(async move {
        match fetch_and_materialize(&shared.downloader, &artifact).await {
            Ok(()) => Some((index, contribution_of(&artifact))),
            Err(e) => {
                shared.errors.record(e);
                None
            }
        }
    });
}

fn schedule_extension(
    tasks: &mut TaskSet,
    shared: &Arc<Shared>,
    base: &ResolveBase,
    index: usize,
    reference: &ArtifactRef,
) {
    let url = match resolve(reference, ArtifactKind::Extension, base) {
        Ok(resolved) => resolved.url,
        Err(e) => {
            shared.errors.record(e);
            return;
        }
    };

    if !shared.first_visit(&url) {
        debug!("Extension {} already resolved in this run, skipping", url);
        return;
    }

    debug!("Scheduling extension {}", url);
    let nested = resolve_extension(shared.clone(), url);
    tasks.spawn(async move { nested.await.map(|c| (index, Contribution::Nested(c))) });
}

/// Fetch, expand and join one extension descriptor.
fn resolve_extension(shared: Arc<Shared>, url: Url) -> BoxFuture<'static, Option<Contributions>> {
    Box::pin(async move {
        let descriptor = match Descriptor::fetch(shared.downloader.client(), &url).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!("Extension {} could not be loaded", url);
                shared.errors.record(e);
                return None;
            }
        };

        let expansion = expand(shared.clone(), &url, &descriptor, Scope::Extension).await;
        Some(expansion.contributions)
    })
}

async fn fetch_private_runtime(
    shared: &Shared,
    base: &ResolveBase,
    runtime: &PrivateRuntime,
) -> Option<PathBuf> {
    let artifact = match resolve_private_runtime(runtime, &shared.config.arch, base) {
        Ok(artifact) => artifact,
        Err(e) => {
            shared.errors.record(e);
            return None;
        }
    };

    match fetch_and_materialize(&shared.downloader, &artifact).await {
        Ok(()) => Some(runtime_executable(&artifact.path)),
        Err(e) => {
            shared.errors.record(e);
            None
        }
    }
}

/// Reconcile the cached copy, then unpack or self-extract as the kind asks.
async fn fetch_and_materialize(
    downloader: &Downloader,
    artifact: &ResolvedArtifact,
) -> LauncherResult<()> {
    let status = downloader.reconcile(&artifact.url, &artifact.path).await?;
    debug!("{:?} {} -> {:?}", status, artifact.url, artifact.path);

    materialize(
        &artifact.path,
        artifact.kind.unpacks(),
        artifact.kind.self_extracts(),
    )
    .await
}

fn contribution_of(artifact: &ResolvedArtifact) -> Contribution {
    match artifact.kind {
        ArtifactKind::NativeLibrary => Contribution::NativeDir(parent_dir(&artifact.path)),
        _ => Contribution::Jar(artifact.path.clone()),
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn dedup_preserving_order(entries: &mut Vec<PathBuf>) {
    let mut seen = HashSet::new();
    entries.retain(|entry| seen.insert(entry.clone()));
}
