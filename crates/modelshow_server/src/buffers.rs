//! # Buffer Routes
//!
//! Middleware in front of every route. A `GET`/`HEAD` whose path is a buffer
//! request (see [`classify_request_path`]) is answered here from the shared
//! [`BufferResolver`](modelshow_assets::BufferResolver); anything else passes
//! through untouched.
//!
//! The id route and the suffix route differ only in how the filename is
//! derived. Resolution, directory order and response headers are identical.
//! The file itself is streamed, so `Range` requests get a 206.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{self, HeaderValue};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use modelshow_assets::{classify_request_path, AssetError, BufferRequest};

use crate::error::ApiError;
use crate::files::stream_file;
use crate::router::AppState;

/// Buffers never change for a given model version.
pub const BUFFER_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Methods advertised on buffer responses.
pub const BUFFER_ALLOW_METHODS: &str = "GET, HEAD, OPTIONS";

/// Headers advertised on buffer responses (`Range` for partial fetches).
pub const BUFFER_ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Range";

/// Intercepts buffer requests before routing reaches static mounts or the SPA.
pub async fn intercept_buffers(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }
    let Some(buffer) = classify_request_path(request.uri().path()) else {
        return next.run(request).await;
    };

    tracing::debug!(
        path = %request.uri().path(),
        filename = %buffer.filename,
        trigger = ?buffer.trigger,
        "Buffer request"
    );

    match serve_buffer(state, buffer, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Resolves one buffer and streams it back.
///
/// # Errors
///
/// [`ApiError::BufferNotFound`] when no directory holds the file.
pub async fn serve_buffer(
    state: Arc<AppState>,
    buffer: BufferRequest,
    request: Request,
) -> Result<Response, ApiError> {
    let filename = buffer.filename;
    let request_path = request.uri().path().to_string();
    let lookup = filename.clone();
    let resolved =
        tokio::task::spawn_blocking(move || state.resolver.resolve(&lookup)).await?;

    let path = match resolved {
        Ok(path) => path,
        Err(AssetError::NotFound { searched, .. }) => {
            return Err(ApiError::BufferNotFound {
                filename,
                request_path,
                searched,
            });
        }
        Err(e) => return Err(e.into()),
    };

    let response = stream_file(&path, request).await;
    tracing::info!(
        file = %filename,
        from = %path.display(),
        status = response.status().as_u16(),
        "Sending buffer"
    );
    Ok(with_buffer_headers(response))
}

/// Adds the long-lived cache and cross-origin headers to a buffer response.
#[must_use]
pub fn with_buffer_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(BUFFER_CACHE_CONTROL),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(BUFFER_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(BUFFER_ALLOW_HEADERS),
    );
    response
}
