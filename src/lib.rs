// Library crate for the co-op bullet hell session relay server
// This file exposes the public API for integration tests

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod session;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use session::{JoinOutcome, Player, Room, SessionRegistry};
pub use shared::AppState;
pub use websockets::{
    ConnectionManager, InMemoryConnectionManager, MessageHandler, MessageType, WebSocketMessage,
    WebsocketReceiveHandler,
};

/// Builds the application router: the health check and the WebSocket
/// endpoint, with request tracing and the permissive CORS the game
/// clients expect.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Bullet Hell Co-op Server Running" }))
        .route("/ws", get(websockets::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
