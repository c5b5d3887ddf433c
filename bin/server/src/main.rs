use nodeflow_integration::{Proxy, ReqwestTransport};
use nodeflow_server::app::{AppState, router};
use nodeflow_server::config::ServerConfig;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!(
        github_secret = config.webhooks.github_secret.is_some(),
        gmail_verification_token = config.webhooks.gmail_verification_token.is_some(),
        "Loaded configuration"
    );

    let transport = ReqwestTransport::new().expect("failed to build HTTP client");
    let proxy = Proxy::new(Arc::new(transport), config.upstream);
    let app = router(AppState::new(proxy, config.webhooks));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
