use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::core::error::{LauncherError, LauncherResult};

/// Run a 7-Zip style self-extracting package non-interactively, unpacking
/// into `target_dir`.
pub async fn run_self_extract(package: &Path, target_dir: &Path) -> LauncherResult<()> {
    mark_executable(package).await?;

    let mut output_flag = std::ffi::OsString::from("-o");
    output_flag.push(target_dir.as_os_str());

    let mut cmd = Command::new(package);
    cmd.arg("-y")
        .arg(&output_flag)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit());

    info!("Self-extracting {:?}", package);
    debug!("Command: {:?}", cmd);

    let status = cmd.status().await.map_err(|e| LauncherError::SelfExtract {
        path: package.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !status.success() {
        return Err(LauncherError::SelfExtract {
            path: package.to_path_buf(),
            reason: format!("exited with {}", status),
        });
    }

    Ok(())
}

/// Downloaded files carry no execute bit on Unix.
#[cfg(unix)]
async fn mark_executable(package: &Path) -> LauncherResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let Ok(meta) = tokio::fs::metadata(package).await else {
        // Let the spawn report the missing package.
        return Ok(());
    };
    let mut perms = meta.permissions();
    if perms.mode() & 0o111 == 0o111 {
        return Ok(());
    }
    perms.set_mode(perms.mode() | 0o755);
    tokio::fs::set_permissions(package, perms)
        .await
        .map_err(|source| LauncherError::Io {
            path: package.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
async fn mark_executable(_package: &Path) -> LauncherResult<()> {
    Ok(())
}
