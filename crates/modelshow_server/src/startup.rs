//! # Startup Diagnostics
//!
//! One report at boot so an operator can see, before the first request, what
//! `/api/model` is going to return and whether the viewer bundle exists.

use std::net::{IpAddr, UdpSocket};

use modelshow_assets::{
    has_extension, list_models, locate_current_model, AssetDirectory, DirectoryPriorityList,
    ModelEntry, BUFFER_EXTENSION,
};

use crate::config::ServerConfig;
use crate::error::AVAILABLE_ENDPOINTS;

/// The LAN address other machines would reach this host on.
///
/// Connecting a UDP socket sends nothing; it only asks the OS which local
/// address routes to the target.
#[must_use]
pub fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

/// Logs listen URLs, endpoints, bundle state and model directory contents.
pub fn report(config: &ServerConfig) {
    let port = config.port;
    let lan = local_ip().map_or_else(|| "localhost".to_string(), |ip| ip.to_string());

    tracing::info!("ModelShow server starting");
    tracing::info!("  local:   http://localhost:{port}");
    tracing::info!("  network: http://{lan}:{port}");
    for endpoint in AVAILABLE_ENDPOINTS {
        tracing::info!("  api:     http://{lan}:{port}{endpoint}");
    }

    if !config.index_html().is_file() {
        tracing::warn!(
            dist = %config.dist_dir.display(),
            "Viewer bundle not built; unmatched paths will serve a placeholder"
        );
    }

    let dirs = config.directories();
    let primary = dirs.primary();

    if primary.path.is_dir() {
        let models = models_in(primary);
        let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
        let buffers = std::fs::read_dir(&primary.path)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| has_extension(&e.file_name().to_string_lossy(), BUFFER_EXTENSION))
                    .count()
            })
            .unwrap_or(0);
        tracing::info!(
            dir = %primary.path.display(),
            models = ?names,
            buffers,
            "Primary model directory"
        );
    } else {
        tracing::warn!(dir = %primary.path.display(), "Primary model directory does not exist");
    }

    for fallback in dirs.fallbacks() {
        let count = models_in(fallback).len();
        if count > 0 {
            tracing::info!(
                dir = %fallback.path.display(),
                models = count,
                expected = fallback.expected_file.as_deref().unwrap_or_default(),
                "Fallback model directory"
            );
        }
    }

    match locate_current_model(&dirs) {
        Ok(current) => tracing::info!(
            file = %current.path.display(),
            kind = ?current.kind,
            "/api/model will return this file"
        ),
        Err(e) => tracing::warn!(error = %e, "/api/model has nothing to return yet"),
    }
}

fn models_in(dir: &AssetDirectory) -> Vec<ModelEntry> {
    list_models(&DirectoryPriorityList::new(dir.clone(), Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_survives_missing_directories() {
        let root = tempfile::TempDir::new().unwrap();
        let mut config = ServerConfig::default();
        config.primary.path = root.path().join("missing");
        config.dist_dir = root.path().join("dist");
        config.fallbacks.clear();
        report(&config);
    }
}
