use std::sync::Arc;

use crate::session::SessionRegistry;
use crate::websockets::ConnectionManager;

/// Shared application state containing all dependencies
///
/// The registry and connection manager are injected here rather than
/// referenced as ambient globals, so the event-handling logic can be
/// exercised in tests without a live transport.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub connection_manager: Arc<dyn ConnectionManager>,
}

impl AppState {
    pub fn new(
        registry: Arc<SessionRegistry>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            registry,
            connection_manager,
        }
    }
}
