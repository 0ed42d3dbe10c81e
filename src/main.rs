//! Explanation AI Service
//!
//! Generates natural-language explanations for fraud predictions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   EXPLANATION SERVICE                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────────┐  │
//! │  │  API      │──▶│  Prompt      │──▶│  Generation gate    │  │
//! │  │  (Axum)   │   │  Builder     │   │  (Semaphore)        │  │
//! │  └───────────┘   └──────────────┘   └──────────┬──────────┘  │
//! │                                                ▼             │
//! │                                    ┌─────────────────────┐   │
//! │                                    │  Inference backend  │   │
//! │                                    │  (distilgpt2)       │   │
//! │                                    └─────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod extract;
mod generator;
mod handlers;
mod models;
mod prompt;
mod service;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;

use generator::{GenerationOptions, HttpTextGenerator, PadToken};
use generator::http::InferenceConfig;
use service::ExplanationService;

pub use error::AppError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Explanation Service starting ({})...", config.environment);

    // Build the generation backend once, before accepting requests
    let generator = HttpTextGenerator::new(InferenceConfig::from(&config))
        .context("Failed to create inference client")?;
    tracing::info!("Inference backend: {}", generator.url());

    let options = GenerationOptions {
        max_length: config.max_length,
        num_return_sequences: config.num_return_sequences,
        pad_token: PadToken::Eos,
    };

    // Build application state
    let state = AppState {
        explainer: ExplanationService::new(
            Arc::new(generator),
            options,
            config.max_concurrent_generations,
        ),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let ip = config.host.parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid HOST: {}", config.host))?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Explanation Service stopped");
    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "explanation_service=debug,tower_http=debug".into());

    if config.json_logs() || config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub explainer: ExplanationService,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/explain", post(handlers::explain::explain))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
