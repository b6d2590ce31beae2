//! Response body decoding with transparent gzip support.

use crate::{RandomurError, Result};
use bytes::Bytes;
use flate2::read::GzDecoder;
use reqwest::header::{HeaderMap, CONTENT_ENCODING};
use std::io::Read;

/// A fully received HTTP response, as handed over by an [`HttpTransport`].
///
/// [`HttpTransport`]: crate::network::HttpTransport
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// `None` when the response carried no entity.
    pub body: Option<Bytes>,
}

impl RawResponse {
    /// Build a response with a body and no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Some(body.into()),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Whether the headers declare a gzip-encoded body.
pub fn is_gzip_encoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false)
}

/// Decode a response body to text.
///
/// Returns `Ok(None)` for a missing response or an empty body. A body
/// labelled `Content-Encoding: gzip` is inflated first. The body is consumed
/// here and released on every return path; a fault while reading it is
/// reported as a transport error rather than yielding partial text.
pub fn decode_body(response: Option<RawResponse>) -> Result<Option<String>> {
    let Some(response) = response else {
        return Ok(None);
    };
    let body = match response.body {
        Some(body) if !body.is_empty() => body,
        _ => return Ok(None),
    };

    let bytes = if is_gzip_encoded(&response.headers) {
        inflate(&body)?
    } else {
        body.to_vec()
    };

    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

fn inflate(body: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(body);
    let mut out = Vec::with_capacity(body.len() * 4);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| RandomurError::transport("Failed to read gzip response body", e))?;
    Ok(out)
}
