//! File streaming shared by `/api/model` and the buffer routes.
//!
//! Files go out through [`ServeFile`], chunk by chunk, so a model of any size
//! costs a fixed amount of memory. `HEAD`, `Range` (206) and
//! `If-Modified-Since` (304) come with it.

use std::path::Path;

use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeFile;

/// Streams `path` in answer to `request`, honouring its conditional and
/// range headers.
pub async fn stream_file(path: &Path, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        // ServeFile reports IO failures as responses, never as errors.
        Err(never) => match never {},
    }
}
