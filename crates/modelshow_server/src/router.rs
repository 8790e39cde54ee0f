//! # Router
//!
//! Assembles routes, static mounts, middleware and the SPA fallback around
//! one shared [`AppState`].

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::header::USER_AGENT;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use modelshow_assets::{BufferResolver, DirectoryPriorityList, ReferenceRewriter};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::{ConfigResult, ServerConfig, PUBLIC_MOUNT};
use crate::{api, buffers, spa};

/// State shared by every handler. Never mutated after construction.
#[derive(Debug)]
pub struct AppState {
    /// Validated configuration.
    pub config: ServerConfig,
    /// Directory priority list derived from the configuration.
    pub directories: DirectoryPriorityList,
    /// The single resolver behind both buffer triggers.
    pub resolver: BufferResolver,
    /// Rewrites descriptor buffer URIs under the primary mount.
    pub rewriter: ReferenceRewriter,
}

impl AppState {
    /// Validates `config` and derives the resolution components from it.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the configuration is inconsistent.
    pub fn new(config: ServerConfig) -> ConfigResult<Self> {
        config.validate()?;
        let directories = config.directories();
        let resolver = BufferResolver::from_priority_list(&directories);
        let rewriter = ReferenceRewriter::new(&config.primary.mount);
        Ok(Self {
            config,
            directories,
            resolver,
            rewriter,
        })
    }
}

/// Builds the application router.
///
/// # Errors
///
/// Returns the validation error if the configuration is inconsistent.
pub fn build_router(config: ServerConfig) -> ConfigResult<Router> {
    let state = Arc::new(AppState::new(config)?);

    let mut router = Router::new()
        .route("/api/health", get(api::health))
        .route("/api/model", get(api::current_model))
        .route("/api/models", get(api::list_models))
        .nest_service(
            &format!("/{PUBLIC_MOUNT}"),
            ServeDir::new(&state.config.public_root),
        );

    for dir in state.directories.iter() {
        if let Some(mount) = &dir.mount {
            router = router.nest_service(&format!("/{mount}"), ServeDir::new(&dir.path));
        }
    }

    let router = router
        .fallback(spa::fallback)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            buffers::intercept_buffers,
        ))
        .layer(middleware::from_fn(log_requests))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    Ok(router)
}

/// Logs every request with a coarse client kind, then its outcome.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = match request.headers().get(USER_AGENT).and_then(|v| v.to_str().ok()) {
        Some(agent) if agent.contains("Mozilla") => "browser",
        _ => "other",
    };
    tracing::info!(%method, %path, client, "Request");

    let started = Instant::now();
    let response = next.run(request).await;
    tracing::debug!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        "Response"
    );
    response
}
