//! # ModelShow Server
//!
//! HTTP surface delivering glTF models and their buffers to the browser
//! viewer.
//!
//! ## Routes
//!
//! ```text
//! GET  /api/health              liveness + identity
//! GET  /api/model               the current model (.glb raw, .gltf rewritten)
//! GET  /api/models              every model in every directory
//! GET  /gltf_buffer_<id>.bin    buffer, id route          ─┐
//! GET  /…/<name>.bin            buffer, suffix route      ─┴─ one BufferResolver
//! GET  /public/…                public root
//! GET  /<mount>/…               asset directory
//! *    /api/…                   JSON 404
//! *    everything else          SPA bundle, or the "not built" page
//! ```
//!
//! ## Concurrency
//!
//! Requests are independent. The shared [`AppState`] is immutable, and all
//! filesystem work is read-only and runs on the blocking pool.
//!
//! ## Example
//!
//! ```rust,ignore
//! use modelshow_server::{serve, ServerConfig};
//!
//! let config = ServerConfig::from_toml_file("modelshow.toml".as_ref())?;
//! serve(config).await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod api;
pub mod buffers;
pub mod config;
pub mod error;
pub mod files;
pub mod router;
pub mod server;
pub mod spa;
pub mod startup;
pub mod telemetry;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use router::{build_router, AppState};
pub use server::{serve, ServeError};
