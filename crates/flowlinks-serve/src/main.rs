//! FlowLinks Serve - HTTP server for link landing pages and app association files.

use std::sync::Arc;

use axum::http::Request;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use flowlinks_serve::store::{ClickHouseLinkStore, MemoryLinkStore, welcome_link};
use flowlinks_serve::{AppState, Config, router};

/// FlowLinks - short links with app-aware landing pages.
#[derive(Parser, Debug)]
#[command(name = "flowlinks-serve")]
#[command(about = "Link landing page and app association server", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    /// Serve a built-in `/welcome` link from memory instead of ClickHouse.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    // Create application state
    let state = if args.in_memory {
        let store = MemoryLinkStore::new(vec![welcome_link(&config)]);
        tracing::info!(links = store.len(), "using in-memory link store");
        AppState::with_store(config, Arc::new(store))
    } else {
        let store = ClickHouseLinkStore::from_config(&config);
        if config.init_schema {
            store.ensure_table().await?;
        }
        AppState::with_store(config, Arc::new(store))
    };

    // Build router with middleware
    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting flowlinks server");

    axum::serve(listener, app).await?;

    Ok(())
}
