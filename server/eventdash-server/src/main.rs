use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use eventdash_server::{create_app, ingest::IngestConfig, EventDashServer, ServerConfig};

/// EventDash HTTP Server
#[derive(Parser, Debug)]
#[command(name = "eventdash-server")]
#[command(about = "Security event dashboard HTTP API server")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080", env = "PORT")]
    port: u16,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Ingest queue capacity
    #[arg(long, default_value = "1000", env = "INGEST_BUFFER_SIZE")]
    ingest_buffer_size: usize,

    /// Events per ingest batch
    #[arg(long, default_value = "100", env = "INGEST_BATCH_SIZE")]
    ingest_batch_size: usize,

    /// Ingest flush interval in seconds
    #[arg(long, default_value = "5", env = "INGEST_FLUSH_INTERVAL_SECS")]
    ingest_flush_interval_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(args.verbose);

    info!("Starting EventDash server");
    info!(version = env!("CARGO_PKG_VERSION"), "Version");

    let config = ServerConfig {
        name: "EventDash".to_string(),
        ingest: IngestConfig {
            buffer_size: args.ingest_buffer_size,
            batch_size: args.ingest_batch_size,
            flush_interval: Duration::from_secs(args.ingest_flush_interval_secs),
        },
    };

    let server = EventDashServer::new(&args.database_url, config).await?;
    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("EventDash server running on http://{addr}");
    info!("Health check available at: http://{addr}/health");
    info!("API v1 available at: http://{addr}/api/v1");
    info!("OpenAPI docs available at: http://{addr}/docs");

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("eventdash_server={level},event_store={level},analytics_engine={level},tower_http=info,sqlx=warn")
            .into()
    });

    let is_development =
        env::var("EVENTDASH_ENV").unwrap_or_else(|_| "development".to_string()) == "development";

    if is_development {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true))
            .init();
    } else {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_ansi(false).json())
            .init();
    }
}
