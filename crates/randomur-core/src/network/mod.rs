//! Network plumbing for the gallery feed.
//!
//! This module provides:
//! - The narrow HTTP transport interface and its reqwest implementation
//! - Response body decoding with transparent gzip support
//! - Gallery rate limit tracking

mod decoder;
mod transport;

pub use decoder::{decode_body, is_gzip_encoded, RawResponse};
pub use transport::{HttpTransport, RateLimitState, ReqwestTransport};
