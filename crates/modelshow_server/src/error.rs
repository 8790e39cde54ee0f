//! # API Error Responses
//!
//! Every failure inside a handler ends up here and leaves as a JSON body.
//! Nothing is retried and nothing takes the process down.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use modelshow_assets::AssetError;
use serde_json::json;
use thiserror::Error;

/// Endpoints listed in API 404 bodies.
pub const AVAILABLE_ENDPOINTS: [&str; 3] = ["/api/health", "/api/model", "/api/models"];

/// Errors surfaced by the HTTP layer.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resolution or read failure from the asset core.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// A buffer request that resolved to nothing.
    #[error("buffer file {filename} not found")]
    BufferNotFound {
        /// Filename derived from the request.
        filename: String,
        /// The request path as received.
        request_path: String,
        /// Directories searched, in order.
        searched: Vec<String>,
    },

    /// An `/api/*` path with no handler.
    #[error("no API endpoint at {0}")]
    UnknownEndpoint(String),

    /// A blocking filesystem task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Asset(AssetError::NotFound { .. })
            | Self::BufferNotFound { .. }
            | Self::UnknownEndpoint(_) => StatusCode::NOT_FOUND,
            Self::Asset(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Asset(e) => e.kind(),
            Self::BufferNotFound { .. } | Self::UnknownEndpoint(_) => "not_found",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let body = match &self {
            Self::Asset(AssetError::NotFound { what, searched }) => json!({
                "error": kind,
                "message": format!("{what} not found; add a .gltf or .glb file to one of the searched paths"),
                "searchedPaths": searched,
            }),
            Self::BufferNotFound {
                request_path,
                searched,
                ..
            } => json!({
                "error": kind,
                "message": self.to_string(),
                "requestPath": request_path,
                "searchedDirs": searched,
            }),
            Self::UnknownEndpoint(path) => json!({
                "error": kind,
                "message": self.to_string(),
                "path": path,
                "availableEndpoints": AVAILABLE_ENDPOINTS,
            }),
            Self::Asset(_) | Self::Internal(_) => json!({
                "error": kind,
                "message": self.to_string(),
            }),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, kind, "Request failed");
        } else {
            tracing::warn!(error = %self, kind, "Request not satisfied");
        }

        (status, Json(body)).into_response()
    }
}
