// ─── Launcher Configuration ───
// Explicit configuration threaded through every resolution call.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform;

const CACHE_DIR_NAME: &str = ".espresso";
const SETTINGS_FILE: &str = "settings.json";

/// Optional values persisted in `<cache_dir>/settings.json`.
///
/// Command-line flags take precedence over anything stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherSettings {
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub java_path: Option<PathBuf>,
}

/// Everything the resolution engine and the launch assembler need to know
/// about the running host. Immutable for the lifetime of one run.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Root of the persistent artifact cache.
    pub cache_dir: PathBuf,
    /// Architecture matched against descriptor `arch` filters.
    pub arch: String,
    /// OS name matched against descriptor `os` filters.
    pub os: String,
    /// Runtime executable used when no private runtime was resolved.
    pub java_path: Option<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            arch: platform::default_arch(),
            os: platform::os_name(),
            java_path: None,
        }
    }
}

impl LauncherConfig {
    /// Config for the given cache directory with host defaults for the rest.
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ..Self::default()
        }
    }

    /// Fill values the command line left unset from persisted settings.
    pub fn apply_settings(mut self, settings: LauncherSettings, arch_from_cli: bool) -> Self {
        if !arch_from_cli {
            if let Some(arch) = settings.arch.filter(|a| !a.trim().is_empty()) {
                self.arch = arch;
            }
        }
        if self.java_path.is_none() {
            self.java_path = settings.java_path;
        }
        self
    }

    /// Create the cache directory if it does not exist yet.
    pub async fn ensure_cache_dir(&self) -> LauncherResult<()> {
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|source| LauncherError::Io {
                path: self.cache_dir.clone(),
                source,
            })
    }
}

/// `~/.espresso`, or `./.espresso` when no home directory is known.
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CACHE_DIR_NAME)
}

/// Read `settings.json` from the cache directory.
///
/// A missing file yields defaults; a malformed file is reported and ignored.
pub fn load_settings_from_disk(cache_dir: &Path) -> LauncherSettings {
    let path = cache_dir.join(SETTINGS_FILE);
    match read_settings(&path) {
        Ok(Some(settings)) => {
            debug!("Loaded settings from {:?}", path);
            settings
        }
        Ok(None) => LauncherSettings::default(),
        Err(e) => {
            warn!("Ignoring settings file {:?}: {}", path, e);
            LauncherSettings::default()
        }
    }
}

/// Parse a settings file. `None` when the file does not exist.
pub fn read_settings(path: &Path) -> LauncherResult<Option<LauncherSettings>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LauncherError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    Ok(Some(serde_json::from_str(&raw)?))
}
