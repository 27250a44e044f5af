use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::DiagramService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; the store behind the service is shared.
#[derive(Clone)]
pub struct AppState {
    /// Diagram use cases over the configured store.
    pub diagrams: DiagramService,
    pub config: Arc<ServerConfig>,
}
