//! # Buffer Filename Patterns
//!
//! Decides whether a request path is a buffer request and which filename it
//! names. Two triggers exist:
//!
//! - **Id route**: exactly `/gltf_buffer_<id>.bin`.
//! - **Suffix route**: any path ending in `.bin` or containing
//!   `gltf_buffer_`. The filename is the last path segment.
//!
//! Both produce the same [`BufferRequest`] shape, so both end up in the same
//! [`crate::BufferResolver`].
//!
//! Request paths arrive percent-encoded (glTF URIs must be, and browsers
//! encode spaces and non-ASCII names), so the filename is decoded after the
//! path is split. An encoded `%2F` therefore ends up inside the filename,
//! where the resolver rejects it.

use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::{has_extension, BUFFER_EXTENSION, BUFFER_ID_PREFIX};

/// Which trigger recognized the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferTrigger {
    /// `/gltf_buffer_<id>.bin`.
    IdRoute,
    /// Generic `.bin` suffix or `gltf_buffer_` token.
    Suffix,
}

/// A request recognized as a buffer fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferRequest {
    /// Filename to look up.
    pub filename: String,
    /// Buffer id, for id-route requests.
    pub id: Option<String>,
    /// The trigger that matched.
    pub trigger: BufferTrigger,
}

fn id_route() -> &'static Regex {
    static ID_ROUTE: OnceLock<Regex> = OnceLock::new();
    ID_ROUTE.get_or_init(|| {
        Regex::new(r"^/gltf_buffer_(?<id>[^/]+)\.bin$").expect("id route pattern is valid")
    })
}

/// Classifies a raw (still percent-encoded) request path. Returns `None`
/// for non-buffer paths.
#[must_use]
pub fn classify_request_path(path: &str) -> Option<BufferRequest> {
    if let Some(caps) = id_route().captures(path) {
        let id = decode(&caps["id"]);
        return Some(BufferRequest {
            filename: format!("{BUFFER_ID_PREFIX}{id}.{BUFFER_EXTENSION}"),
            id: Some(id),
            trigger: BufferTrigger::IdRoute,
        });
    }

    let filename = decode(path.rsplit('/').next().unwrap_or(path));
    if has_extension(&filename, BUFFER_EXTENSION) || path.contains(BUFFER_ID_PREFIX) {
        return Some(BufferRequest {
            filename,
            id: None,
            trigger: BufferTrigger::Suffix,
        });
    }

    None
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
