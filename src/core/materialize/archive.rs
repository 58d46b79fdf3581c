use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

/// Unpack every file of the ZIP archive at `zip_path` into `target_dir`.
///
/// Directory entries only create directories. Entry names that would
/// escape `target_dir` are rejected. Returns the number of files written.
pub fn extract_zip_file(zip_path: &Path, target_dir: &Path) -> LauncherResult<usize> {
    let zip_file = std::fs::File::open(zip_path).map_err(|source| LauncherError::Io {
        path: zip_path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(zip_file)?;
    let mut written = 0;

    for index in 0..archive.len() {
        let mut zipped = archive.by_index(index)?;

        let rel_path: PathBuf = zipped.enclosed_name().ok_or_else(|| {
            LauncherError::Other(format!(
                "Invalid zip entry path {:?} in {:?}",
                zipped.name(),
                zip_path
            ))
        })?;

        let out_path = target_dir.join(rel_path);
        if zipped.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|source| LauncherError::Io {
                path: out_path,
                source,
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| LauncherError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut out = std::fs::File::create(&out_path).map_err(|source| LauncherError::Io {
            path: out_path.clone(),
            source,
        })?;
        std::io::copy(&mut zipped, &mut out).map_err(|source| LauncherError::Io {
            path: out_path,
            source,
        })?;
        written += 1;
    }

    debug!("Unpacked {} files from {:?}", written, zip_path);
    Ok(written)
}
