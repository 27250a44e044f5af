pub mod diagrams;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /diagrams                     list, create
/// /diagrams/{id}                get, update, delete
/// /diagrams/{id}/solve          solve (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/diagrams", diagrams::router())
}
