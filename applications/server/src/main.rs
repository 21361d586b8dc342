/// Soul Directory Server - media directory over pluggable backends
use clap::{Parser, Subcommand};
use soul_directory_server::{api, config::ServerConfig, state::AppState};
use std::{net::SocketAddr, path::PathBuf};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soul-directory-server")]
#[command(about = "Soul Directory media directory service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the directory service
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "SOUL_DIRECTORY_CONFIG")]
        config: Option<PathBuf>,
    },
    /// List the configured backends
    Backends {
        /// Configuration file path
        #[arg(short, long, env = "SOUL_DIRECTORY_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "soul_directory=info,soul_directory_server=info,soul_tidal=info,tower_http=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::Backends { config } => {
            list_backends(config)?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Soul Directory Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let app_state = AppState::from_config(&config)?;
    for backend in app_state.registry.descriptors() {
        tracing::info!("Backend available: {} ({})", backend.name, backend.title);
    }
    let registry = std::sync::Arc::clone(&app_state.registry);

    let app = api::create_router(app_state).layer(
        TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(true)),
    );

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Backends are released before the process exits
    registry.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn list_backends(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;
    let app_state = AppState::from_config(&config)?;

    println!("Backends:");
    for backend in app_state.registry.descriptors() {
        println!("  {} - {}", backend.name, backend.title);
    }

    Ok(())
}
