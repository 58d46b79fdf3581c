#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;

use espresso_lib::core::config::LauncherConfig;
use espresso_lib::core::downloader::Downloader;
use espresso_lib::core::resolve::{host_dir_name, Resolver};

/// In-memory file tree served over HTTP, recording every request.
#[derive(Default)]
pub struct Remote {
    files: Mutex<HashMap<String, Vec<u8>>>,
    delays: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<(Method, String)>>,
}

pub struct TestServer {
    pub addr: SocketAddr,
    remote: Arc<Remote>,
    _handle: tokio::task::JoinHandle<()>,
}

async fn serve(State(remote): State<Arc<Remote>>, req: Request) -> Response {
    let path = req.uri().path().to_string();
    remote
        .requests
        .lock()
        .unwrap()
        .push((req.method().clone(), path.clone()));

    let delay = remote.delays.lock().unwrap().get(&path).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let body = remote.files.lock().unwrap().get(&path).cloned();
    match body {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_LENGTH, body.len().to_string())],
            body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

impl TestServer {
    pub async fn start() -> Self {
        let remote = Arc::new(Remote::default());
        let app = Router::new().fallback(serve).with_state(remote.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            addr,
            remote,
            _handle: handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn put(&self, path: &str, body: impl Into<Vec<u8>>) {
        self.remote
            .files
            .lock()
            .unwrap()
            .insert(path.to_string(), body.into());
    }

    pub fn delay(&self, path: &str, delay: Duration) {
        self.remote
            .delays
            .lock()
            .unwrap()
            .insert(path.to_string(), delay);
    }

    /// Number of GET requests (body transfers) for `path`.
    pub fn gets(&self, path: &str) -> usize {
        self.count(Method::GET, path)
    }

    pub fn heads(&self, path: &str) -> usize {
        self.count(Method::HEAD, path)
    }

    pub fn requested_paths(&self) -> Vec<String> {
        self.remote
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn count(&self, method: Method, path: &str) -> usize {
        self.remote
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p)| *m == method && p == path)
            .count()
    }

    /// Cache root the launcher uses for this server's host.
    pub fn cache_root(&self, cache_dir: &Path) -> PathBuf {
        let url = reqwest::Url::parse(&self.url("/")).unwrap();
        cache_dir.join(host_dir_name(&url))
    }
}

pub fn resolver(cache_dir: &Path) -> Resolver {
    Resolver::new(
        LauncherConfig::with_cache_dir(cache_dir),
        Downloader::new().unwrap(),
    )
}

/// Descriptor with one resource group holding `resources` verbatim.
pub fn jnlp(resources: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<jnlp spec="1.0+">
  <information><title>Test</title><vendor>Espresso</vendor></information>
  <resources>
{}
  </resources>
  <application-desc main-class="Main"/>
</jnlp>"#,
        resources
    )
}

pub fn zip_with(name: &str, data: &[u8]) -> Vec<u8> {
    use std::io::Write;

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        writer
            .start_file(name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
        writer.finish().unwrap();
    }
    cursor.into_inner()
}
