//! Bistro Storefront - a small food-ordering site.
//!
//! # Architecture
//!
//! - Axum web framework with HTMX for interactivity
//! - Askama templates for server-side rendering
//! - `bistro-core` cart engine for all cart state and view-sync planning
//! - Per-visitor carts held in memory (cookie-keyed), nothing persisted
//! - Orders forwarded to a configurable HTTP endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]

use bistro_storefront::catalog::Catalog;
use bistro_storefront::config::StorefrontConfig;
use bistro_storefront::routes;
use bistro_storefront::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bistro_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Load the product catalog (bundled unless a path is configured)
    let catalog =
        Catalog::load(config.catalog_path.as_deref()).expect("Failed to load product catalog");
    tracing::info!(products = catalog.products().len(), "catalog loaded");

    // Build application state and router
    let addr = config.socket_addr();
    let state = AppState::new(config, catalog);
    let app = routes::build_app(state);

    // Start server
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
