//! `modelshow_server` binary.
//!
//! ```text
//! modelshow_server                       # stock layout, port 3000
//! modelshow_server --config modelshow.toml --port 8080
//! RUST_LOG=modelshow_assets=debug modelshow_server
//! ```

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use modelshow_server::telemetry::init_telemetry;
use modelshow_server::{serve, ServerConfig};

#[derive(Parser)]
#[command(name = "modelshow_server")]
#[command(about = "Serves glTF/GLB models and their buffers to the ModelShow viewer")]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if cli.json_logs {
        config.log.json = true;
    }
    config.validate().context("validating configuration")?;

    init_telemetry(&config.log).context("installing tracing subscriber")?;

    serve(config).await.context("server failed")
}
