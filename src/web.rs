use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::ServerConfig;
use crate::email::MailTransport;
use crate::identity::IdentityProvider;
use crate::notifier::Notifier;
use crate::weather::WeatherProvider;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Full application router with middleware
pub fn app<I, W, M>(config: &ServerConfig, notifier: Notifier<I, W, M>) -> Router
where
    I: IdentityProvider,
    W: WeatherProvider,
    M: MailTransport,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(notifier))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_seconds.into(),
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run<I, W, M>(config: &ServerConfig, notifier: Notifier<I, W, M>) -> Result<()>
where
    I: IdentityProvider,
    W: WeatherProvider,
    M: MailTransport,
{
    let app = app(config, notifier);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
