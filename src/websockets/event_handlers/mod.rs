use thiserror::Error;

// Public API - what other modules can use
pub use connection_events::ConnectionEventHandlers;
pub use game_events::GameEventHandlers;
pub use session_events::SessionEventHandlers;

// Internal modules
mod connection_events;
mod game_events;
mod session_events;
pub mod shared;

/// Errors that can occur while turning a session event into outbound
/// frames. Never fatal: the receive loop logs and keeps serving.
#[derive(Debug, Error)]
pub enum SessionEventError {
    #[error("failed to serialize outbound message: {0}")]
    Serialization(#[from] serde_json::Error),
}
