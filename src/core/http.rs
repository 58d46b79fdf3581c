use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

const APP_USER_AGENT: &str = concat!("Espresso/", env!("CARGO_PKG_VERSION"));

/// Client shared by descriptor fetches and artifact downloads.
///
/// Compression is disabled so that `Content-Length` on a HEAD probe
/// describes the same bytes a GET writes to disk.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}
