use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the entire launcher.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Descriptor unavailable at {url}: HTTP {status}")]
    DescriptorUnavailable { url: String, status: u16 },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    // ── XML ─────────────────────────────────────────────
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Self-extraction of {path:?} failed: {reason}")]
    SelfExtract { path: PathBuf, reason: String },

    // ── Launch ──────────────────────────────────────────
    #[error("Descriptor declares neither an application nor an applet main class")]
    MissingEntryPoint,

    #[error("Java execution failed: {0}")]
    JavaExecution(String),

    #[error("Launched process exited with status {0}")]
    ChildFailed(i32),

    // ── Resolution ──────────────────────────────────────
    #[error("Resolution task failed: {0}")]
    Task(String),

    #[error("{} resolution errors: {}", .0.len(), render_all(.0))]
    Aggregate(Vec<LauncherError>),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

fn render_all(errors: &[LauncherError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
