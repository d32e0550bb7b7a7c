mod config;
mod errors;
mod imaging;
mod listing;
mod models;
mod pricing;
mod routes;
mod translate;

use anyhow::Context;
use routes::{build_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::translate::TranslationClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    let translator = TranslationClient::new(config.huggingface_api_token.clone(), config.translation_api_base.clone())?;
    if translator.is_online() {
        tracing::info!("🌐 Hosted translation enabled ({})", config.translation_api_base);
    } else {
        tracing::info!("📖 No HUGGINGFACE_API_TOKEN set, using phrase dictionary translations");
    }

    let state = AppState {
        translator: Arc::new(translator),
    };
    let app = build_router(state, &config.allowed_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, origins = ?config.allowed_origins, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
