use std::sync::Arc;

use bullethell::session::SessionRegistry;
use bullethell::shared::AppState;
use bullethell::websockets::InMemoryConnectionManager;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bullethell=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting bullet hell co-op server");

    // Process-wide session registry plus the outbound delivery table,
    // injected into the handlers through shared state
    let registry = Arc::new(SessionRegistry::new());
    let connection_manager = Arc::new(InMemoryConnectionManager::new());

    let app_state = AppState::new(registry, connection_manager);
    let app = bullethell::app(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();
    info!(port = %port, "Server live");
    axum::serve(listener, app).await.unwrap();
}
