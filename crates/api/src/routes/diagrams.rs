use axum::routing::{get, post};
use axum::Router;

use crate::handlers::diagrams;
use crate::state::AppState;

/// Diagram routes mounted at `/diagrams`. All require a Bearer token.
///
/// ```text
/// GET    /                  -> list_diagrams
/// POST   /                  -> create_diagram
/// GET    /{id}              -> get_diagram
/// PUT    /{id}              -> update_diagram
/// DELETE /{id}              -> delete_diagram
/// POST   /{id}/solve        -> solve_diagram
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(diagrams::list_diagrams).post(diagrams::create_diagram),
        )
        .route(
            "/{id}",
            get(diagrams::get_diagram)
                .put(diagrams::update_diagram)
                .delete(diagrams::delete_diagram),
        )
        .route("/{id}/solve", post(diagrams::solve_diagram))
}
