// ─── Launch Task ───
// Builds the runtime command line for a resolved application and spawns it.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::{debug, info};

use crate::core::config::LauncherConfig;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform;
use crate::core::resolve::ResolvedApplication;

use super::classpath::{build_classpath, build_library_path, safe_path_str};

/// Fully assembled runtime invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchCommand {
    /// Assemble `[-Xmx<heap>] [-Djava.library.path=..] -cp <jars> <main> <args..>`.
    ///
    /// The application entry point wins over the applet one; applet
    /// parameters are passed as plain arguments.
    pub fn assemble(app: &ResolvedApplication, config: &LauncherConfig) -> LauncherResult<Self> {
        let target = app
            .launch_target()
            .ok_or(LauncherError::MissingEntryPoint)?;

        let program = runtime_program(config.java_path.as_deref(), app.private_runtime.as_deref());
        let mut args = Vec::new();

        // ── JVM Arguments ──
        if let Some(heap) = app
            .hints
            .max_heap_size
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
        {
            args.push(format!("-Xmx{}", heap));
        }
        if let Some(library_path) = build_library_path(&app.native_dirs) {
            args.push(format!("-Djava.library.path={}", library_path));
        }

        // Classpath
        let classpath = build_classpath(&app.classpath);
        debug!("Classpath len={} value={:?}", app.classpath.len(), classpath);
        args.push("-cp".into());
        args.push(classpath);

        // Main class
        args.push(target.main_class().to_string());

        // ── Application Arguments ──
        args.extend(target.arguments().iter().cloned());

        Ok(Self { program, args })
    }

    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Start the runtime with inherited stdout/stderr.
    ///
    /// Returns right after spawning unless `wait` is set, in which case a
    /// non-zero exit is reported as `ChildFailed`.
    pub async fn spawn(&self, wait: bool) -> LauncherResult<()> {
        let std_cmd = self.to_command();
        info!("Launching with runtime: {:?}", self.program);
        debug!("Command (copy/paste): {}", format_command_for_logs(&std_cmd));

        let mut cmd = tokio::process::Command::from(std_cmd);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd
            .spawn()
            .map_err(|e| LauncherError::JavaExecution(format!("{:?}: {}", self.program, e)))?;

        if !wait {
            return Ok(());
        }

        let status = child
            .wait()
            .await
            .map_err(|e| LauncherError::JavaExecution(e.to_string()))?;
        info!("Launched process exited with {}", status);

        if status.success() {
            Ok(())
        } else {
            Err(LauncherError::ChildFailed(status.code().unwrap_or(-1)))
        }
    }
}

/// Resolved private runtime, else the explicit override, else the platform
/// default resolved through `PATH`.
fn runtime_program(override_path: Option<&Path>, private_runtime: Option<&Path>) -> PathBuf {
    private_runtime
        .or(override_path)
        .map(|p| PathBuf::from(safe_path_str(p)))
        .unwrap_or_else(|| PathBuf::from(platform::default_java_command()))
}

fn format_command_for_logs(cmd: &std::process::Command) -> String {
    let program = shell_escape(&cmd.get_program().to_string_lossy());
    let args = cmd
        .get_args()
        .map(|arg| shell_escape(&arg.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ");

    if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args)
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
