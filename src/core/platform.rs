// ─── Platform ───
// Names for the running OS and architecture as descriptors spell them,
// plus the runtime executable conventions per OS.

/// OS name as it appears in descriptor `os` attributes.
pub fn os_name() -> String {
    match std::env::consts::OS {
        "windows" => "Windows".to_string(),
        "linux" => "Linux".to_string(),
        "macos" => "Mac OS X".to_string(),
        other => other.to_string(),
    }
}

/// Host architecture in Java `os.arch` naming.
pub fn default_arch() -> String {
    match std::env::consts::ARCH {
        "x86_64" => "amd64".to_string(),
        "x86" => "x86".to_string(),
        "aarch64" => "aarch64".to_string(),
        "arm" => "arm".to_string(),
        other => other.to_string(),
    }
}

/// Platform-specific Java classpath separator.
pub fn get_classpath_separator() -> &'static str {
    if cfg!(target_os = "windows") {
        ";"
    } else {
        ":"
    }
}

/// Runtime executable used when neither an override nor a private
/// runtime is available. Resolved through `PATH`.
pub fn default_java_command() -> &'static str {
    if cfg!(windows) {
        "javaw"
    } else {
        "java"
    }
}

/// Executable name inside an extracted runtime's `bin/` directory.
pub fn java_exe() -> &'static str {
    if cfg!(windows) {
        "javaw.exe"
    } else {
        "java"
    }
}

/// Case-insensitive filter match where an empty filter accepts anything.
pub fn filter_matches(filter: Option<&str>, actual: &str) -> bool {
    match filter.map(str::trim) {
        None | Some("") => true,
        Some(wanted) => wanted.eq_ignore_ascii_case(actual.trim()),
    }
}
