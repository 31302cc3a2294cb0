//! Prerender gate server.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                PRERENDER GATE                 │
//!   Client Request         │  ┌──────────┐    ┌────────────┐               │
//!   ───────────────────────┼─▶│  http    │───▶│ classifier │──pass──▶ app  │
//!                          │  │ server   │    └─────┬──────┘               │
//!                          │  └──────────┘          │ crawler             │
//!                          │                        ▼                     │
//!                          │               ┌──────────────┐               │
//!                          │               │ url_builder  │               │
//!                          │               └──────┬───────┘               │
//!   Client Response        │  ┌──────────┐   ┌────▼─────┐                 │
//!   ◀──────────────────────┼──│ response │◀──│  relay   │◀────────────────┼── Rendering
//!                          │  └──────────┘   └──────────┘                 │   Service
//!                          └──────────────────────────────────────────────┘
//! ```
//!
//! Configuration precedence, lowest first: built-in defaults, `--config`
//! file, `PRERENDER_*` environment variables, command-line flags.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use prerender_gate::config::{load_config, AppConfig, PrerenderConfigBuilder};
use prerender_gate::http::{default_app, HttpServer};
use prerender_gate::lifecycle::{signals, Shutdown};
use prerender_gate::observability::{logging, metrics};
use prerender_gate::prerender::PrerenderState;

#[derive(Parser)]
#[command(name = "prerender-gate")]
#[command(about = "Serve prerendered pages to crawlers", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `server.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Rendering service base URL.
    #[arg(long)]
    service_url: Option<String>,

    /// Rendering service token.
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }

    logging::init_tracing(&config.observability);
    tracing::info!("prerender-gate v{} starting", env!("CARGO_PKG_VERSION"));

    let mut builder = PrerenderConfigBuilder::from_base(config.prerender.clone()).with_env();
    if let Some(url) = cli.service_url {
        builder = builder.service_url(url);
    }
    if let Some(token) = cli.token {
        builder = builder.token(token);
    }
    let prerender = builder.build()?;

    tracing::info!(
        bind_address = %config.server.bind_address,
        service_url = %prerender.service_url,
        token_set = prerender.token.is_some(),
        bots = prerender.bot_user_agents.len(),
        ignored_extensions = prerender.ignored_extensions.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let state = PrerenderState::with_timeouts(prerender, &config.timeouts)?;
    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    HttpServer::new(default_app(), state, &config.timeouts)
        .run(listener, shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
