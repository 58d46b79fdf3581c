// ─── Classpath Builder ───
// Joins resolved jar paths and native directories into runtime arguments.

use std::path::{Path, PathBuf};

use crate::core::platform::get_classpath_separator;

/// Classpath string for `-cp`, entries in resolution order.
///
/// Uses `;` on Windows, `:` on Linux/macOS. An empty list yields an empty
/// string; the runtime reports that itself.
pub fn build_classpath(entries: &[PathBuf]) -> String {
    join_paths(entries)
}

/// Value for `-Djava.library.path`, or `None` when no native directory
/// was contributed.
pub fn build_library_path(native_dirs: &[PathBuf]) -> Option<String> {
    if native_dirs.is_empty() {
        None
    } else {
        Some(join_paths(native_dirs))
    }
}

fn join_paths(entries: &[PathBuf]) -> String {
    entries
        .iter()
        .map(|p| safe_path_str(p))
        .collect::<Vec<_>>()
        .join(get_classpath_separator())
}

/// Path text suitable for a runtime argument.
pub fn safe_path_str(path: &Path) -> String {
    let text = path.to_string_lossy().to_string();

    #[cfg(target_os = "windows")]
    {
        // The runtime rejects extended-length paths (`\\?\C:\...`) on the
        // classpath.
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }

    text
}
