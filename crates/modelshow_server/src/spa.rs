//! # SPA Fallback
//!
//! Whatever no route claimed. `/api/*` gets a JSON 404; everything else is
//! the viewer bundle: the file itself if it exists in `dist/`, otherwise
//! `index.html` so client-side routing works. Without a build, a placeholder
//! page says so.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::error::ApiError;
use crate::router::AppState;

/// Shown when the bundle has not been built.
pub const NOT_BUILT_PAGE: &str = r"<!DOCTYPE html>
<html>
<head><meta charset='utf-8'><title>ModelShow</title></head>
<body>
    <h1>The viewer has not been built yet</h1>
    <p>Run <code>npm run build</code> in the front-end project, copy the output to the configured <code>dist_dir</code>,</p>
    <p>then restart the server.</p>
</body>
</html>
";

/// Fallback handler for unmatched paths.
pub async fn fallback(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let path = request.uri().path();
    if path == "/api" || path.starts_with("/api/") {
        return ApiError::UnknownEndpoint(path.to_string()).into_response();
    }

    let index = state.config.index_html();
    let built = tokio::fs::metadata(&index)
        .await
        .is_ok_and(|meta| meta.is_file());
    if !built {
        tracing::warn!(index = %index.display(), "SPA bundle missing, serving placeholder");
        return (StatusCode::NOT_FOUND, Html(NOT_BUILT_PAGE)).into_response();
    }

    let bundle = ServeDir::new(&state.config.dist_dir).fallback(ServeFile::new(&index));
    match bundle.oneshot(request).await {
        Ok(response) => response.map(Body::new),
        // ServeDir with a ServeFile fallback is infallible.
        Err(never) => match never {},
    }
}
