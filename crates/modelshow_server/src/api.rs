//! # API Handlers
//!
//! Thin adapters: each handler moves the filesystem work onto the blocking
//! pool, calls into `modelshow_assets`, and shapes the response. Binary
//! models are streamed rather than read whole.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use modelshow_assets::{
    list_models as catalog_models, locate_current_model, AssetKind, AssetResult, ModelEntry,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::files::stream_file;
use crate::router::AppState;

/// Body of `/api/health`.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always `ok`.
    pub status: &'static str,
    /// Server time, RFC 3339 with milliseconds.
    pub timestamp: String,
    /// Configured server identity.
    pub server: String,
}

/// Body of `/api/models`.
#[derive(Debug, Serialize)]
pub struct ModelList {
    /// Every model file found.
    pub models: Vec<ModelEntry>,
    /// `models.len()`.
    pub count: usize,
}

/// `GET /api/health`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        timestamp: humantime::format_rfc3339_millis(SystemTime::now()).to_string(),
        server: state.config.server_name.clone(),
    })
}

/// `GET /api/models`. Never fails; unreadable directories are skipped.
///
/// # Errors
///
/// Only if the blocking task itself dies.
pub async fn list_models(State(state): State<Arc<AppState>>) -> Result<Json<ModelList>, ApiError> {
    let models = tokio::task::spawn_blocking(move || catalog_models(&state.directories)).await?;
    tracing::debug!(count = models.len(), "Listed models");
    Ok(Json(ModelList {
        count: models.len(),
        models,
    }))
}

/// What `/api/model` sends.
enum ModelPayload {
    Binary { name: String, path: PathBuf },
    Descriptor { name: String, text: String, rewritten: usize },
}

/// `GET /api/model`. A `.glb` is streamed from disk; a `.gltf` is rewritten
/// in memory.
///
/// # Errors
///
/// 404 when no model exists, 500 on read or parse failure.
pub async fn current_model(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ApiError> {
    let payload = tokio::task::spawn_blocking(move || load_current_model(&state)).await??;
    let (kind, mut response) = match payload {
        ModelPayload::Binary { name, path } => {
            let response = stream_file(&path, request).await;
            tracing::info!(file = %name, status = response.status().as_u16(), "Sending GLB model");
            (AssetKind::Binary, response)
        }
        ModelPayload::Descriptor {
            name,
            text,
            rewritten,
        } => {
            tracing::info!(
                file = %name,
                bytes = text.len(),
                rewritten,
                "Sending rewritten glTF descriptor"
            );
            (AssetKind::Descriptor, descriptor_response(text))
        }
    };

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(kind.content_type()),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    Ok(response)
}

fn load_current_model(state: &AppState) -> AssetResult<ModelPayload> {
    let candidate = locate_current_model(&state.directories)?;
    let name = candidate.file_name();
    match candidate.kind {
        AssetKind::Binary => Ok(ModelPayload::Binary {
            name,
            path: candidate.path,
        }),
        AssetKind::Descriptor => {
            let out = state.rewriter.rewrite_file(&candidate.path)?;
            Ok(ModelPayload::Descriptor {
                name,
                text: out.text,
                rewritten: out.rewritten,
            })
        }
    }
}

fn descriptor_response(text: String) -> Response {
    let len = text.len();
    let mut response = Body::from(text).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    response
}
