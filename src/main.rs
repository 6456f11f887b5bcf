//! Client IP service.
//!
//! Serves `GET /` with the caller's resolved address and `GET /health`.
//!
//! ```text
//!     Client ──▶ CDN / load balancer ──▶ ┌──────────────────────────────┐
//!                (adds X-Forwarded-For,   │ request id → client_ip       │
//!                 CF-Connecting-IP, ...)  │   HeaderIpWare → IpWare      │
//!                                         │ → JSON { ip, trusted_route } │
//!                                         └──────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use header_ipware::lifecycle::{startup, wait_for_signal, Shutdown};
use header_ipware::observability::init_logging;

#[derive(Parser)]
#[command(name = "header-ipware")]
#[command(about = "Report each caller's client IP address", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = startup::load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!("header-ipware v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        precedence = ?config.client_ip.options.precedence,
        proxy_count = ?config.client_ip.options.proxy_count,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let (server, listener) = startup::bind(config).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
