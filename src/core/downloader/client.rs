use std::io::ErrorKind;
use std::path::Path;

use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Url};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::build_http_client;

/// Outcome of reconciling a cached file against its remote copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The cached file already matched the remote length.
    Fresh,
    /// The remote body was downloaded and written to disk.
    Fetched,
}

/// Length-checked artifact cache on top of a shared HTTP client.
///
/// Cloning is cheap: `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> LauncherResult<Self> {
        Ok(Self::with_client(build_http_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    // ── Cache reconciliation ────────────────────────────

    /// Make sure `dest` holds the current content of `url`.
    ///
    /// A cached file is current when its length equals the remote
    /// `Content-Length` reported by a HEAD request. Same-length remote
    /// changes are not detected.
    pub async fn reconcile(&self, url: &Url, dest: &Path) -> LauncherResult<CacheStatus> {
        if let Some(local_len) = local_length(dest).await? {
            let remote_len = self.remote_length(url).await?;
            if remote_len == Some(local_len) {
                debug!("Cache hit ({} bytes): {:?}", local_len, dest);
                return Ok(CacheStatus::Fresh);
            }
            debug!(
                "Cache stale for {:?}: local {} bytes, remote {:?}",
                dest, local_len, remote_len
            );
        }

        self.download_file(url, dest).await?;
        Ok(CacheStatus::Fetched)
    }

    /// Declared length of the remote resource from a HEAD request.
    ///
    /// `None` when the server sends no usable `Content-Length`.
    pub async fn remote_length(&self, url: &Url) -> LauncherResult<Option<u64>> {
        let response = self.client.head(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Read the header directly: the body of a HEAD response is empty,
        // so the body size hint cannot be trusted.
        Ok(response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok()))
    }

    // ── Single file download ────────────────────────────

    /// Download `url` to `dest`, overwriting any existing file.
    ///
    /// Creates parent directories as needed and returns the bytes written.
    pub async fn download_file(&self, url: &Url, dest: &Path) -> LauncherResult<u64> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        // Write inside a block so the handle is closed before extraction.
        {
            let mut file =
                tokio::fs::File::create(dest)
                    .await
                    .map_err(|e| LauncherError::Io {
                        path: dest.to_path_buf(),
                        source: e,
                    })?;
            file.write_all(&bytes).await.map_err(|e| LauncherError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;
            file.flush().await.map_err(|e| LauncherError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;
        }

        debug!("Downloaded: {} -> {:?} ({} bytes)", url, dest, bytes.len());
        Ok(bytes.len() as u64)
    }
}

/// Length of the cached file, or `None` when nothing is cached yet.
async fn local_length(path: &Path) -> LauncherResult<Option<u64>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LauncherError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
