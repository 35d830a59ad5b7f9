use clap::Parser;
use std::{env, net::SocketAddr};
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use error_common::{EventlineError, Result};
use eventline_server::{create_app, EventlineServer};

/// Eventline Engine HTTP Server
#[derive(Parser, Debug)]
#[command(name = "eventline-server")]
#[command(about = "Event management and ticketing platform HTTP API server")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080", env = "PORT")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads configuration
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_tracing(args.verbose);

    info!("Starting Eventline Engine HTTP Server");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Bind address: {}:{}", args.host, args.port);

    // Initialize server state: database, migrations, media storage
    let server = EventlineServer::new().await?;

    // Create the router with all routes
    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| EventlineError::ConfigError(format!("Invalid bind address: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| EventlineError::NetworkError(format!("Failed to bind to {addr}: {e}")))?;

    info!("Eventline Engine server running on http://{addr}");
    info!("Health check available at: http://{addr}/health");
    info!("API v1 available at: http://{addr}/api/v1");
    info!("API docs available at: http://{addr}/docs");

    axum::serve(listener, app)
        .await
        .map_err(|e| EventlineError::ServerError(format!("HTTP server error: {e}")))?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let is_development =
        env::var("EVENTLINE_ENV").unwrap_or_else(|_| "development".to_string()) == "development";

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("eventline_server={level},tower_http=info,sqlx=warn,hyper=info").into()
    });

    if is_development {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    } else {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_ansi(false).json())
            .init();
    }
}
