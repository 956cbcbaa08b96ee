//! Case-dispatching HTTP file server.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                     CASE SERVER                       │
//!                     │                                                       │
//!   Client Request    │  ┌─────────┐   ┌──────────┐   ┌──────────┐            │
//!   ──────────────────┼─▶│  http   │──▶│ dispatch │──▶│ resource │            │
//!                     │  │ server  │   │          │   │ resolver │            │
//!                     │  └─────────┘   └────┬─────┘   └──────────┘            │
//!                     │                     │                                 │
//!                     │                     ▼                                 │
//!                     │               ┌──────────┐   ┌────────────────────┐   │
//!                     │               │  cases   │──▶│    responders      │   │
//!                     │               │  chain   │   │ file/listing/script│   │
//!                     │               └──────────┘   └─────────┬──────────┘   │
//!                     │                                        │              │
//!   Client Response   │  ┌──────────┐                          │              │
//!   ◀─────────────────┼──│ response │◀─────────────────────────┘              │
//!                     │  │  writer  │                                         │
//!                     │  └──────────┘                                         │
//!                     │                                                       │
//!                     │  config · observability · lifecycle                   │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use case_server::config::{self, ServerConfig};
use case_server::lifecycle::{signals, Shutdown};
use case_server::observability::{logging, metrics};
use case_server::HttpServer;

#[derive(Parser)]
#[command(name = "case-server")]
#[command(about = "Serve a directory, running scripts and listing folders", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides the configured bind address port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to serve (overrides the configured root)
    #[arg(short, long)]
    root: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig, config::ConfigError> {
        let mut config = match &self.config {
            Some(path) => config::read_config(path)?,
            None => ServerConfig::default(),
        };

        // An unparsable address is left alone for validation to report.
        if let Some(port) = self.port {
            if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
                addr.set_port(port);
                config.listener.bind_address = addr.to_string();
            }
        }
        if let Some(root) = self.root {
            config.site.root = root;
        }

        config::finalize(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);
    tracing::info!("case-server v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        root = %config.site.root.display(),
        script_extension = %config.scripts.extension,
        script_timeout_secs = config.scripts.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config.clone())?;

    // Bind last so traffic only arrives once everything is ready.
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
