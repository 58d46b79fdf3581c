// ─── Descriptor Document ───
// Fetches a descriptor over HTTP, normalizes its text encoding and parses it.

use quick_xml::de::from_str;
use reqwest::{Client, Url};
use tracing::{debug, info};

use super::model::Descriptor;
use crate::core::error::{LauncherError, LauncherResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

impl Descriptor {
    /// Parse descriptor XML that is already valid text.
    pub fn parse(xml: &str) -> LauncherResult<Self> {
        let descriptor: Descriptor = from_str(xml)?;
        Ok(descriptor)
    }

    /// Parse raw descriptor bytes, accepting UTF-8 or ISO-8859-1 input.
    pub fn parse_bytes(bytes: Vec<u8>) -> LauncherResult<Self> {
        Self::parse(&decode_text(bytes))
    }

    /// Fetch and parse the descriptor at `url`.
    ///
    /// Any non-success status is reported as `DescriptorUnavailable`.
    pub async fn fetch(client: &Client, url: &Url) -> LauncherResult<Self> {
        let response = client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DescriptorUnavailable {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let text = decode_text(bytes.to_vec());
        debug!("Descriptor body from {}:\n{}", url, text);

        let descriptor = Self::parse(&text)?;
        if let Some(info) = descriptor.information() {
            info!(
                "Descriptor {}: {} ({})",
                url,
                info.title.as_deref().unwrap_or("untitled"),
                info.vendor.as_deref().unwrap_or("unknown vendor")
            );
        }
        Ok(descriptor)
    }
}

/// Normalize descriptor bytes to UTF-8 text.
///
/// Valid UTF-8 (with or without BOM) is kept as is; anything else is read as
/// ISO-8859-1, where every byte maps to the code point of the same value.
pub fn decode_text(bytes: Vec<u8>) -> String {
    let bytes = match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_vec(),
        None => bytes,
    };

    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| char::from(b)).collect(),
    }
}
