//! Handlers for the `/diagrams` resource.
//!
//! Every handler requires an authenticated caller and only ever sees that
//! caller's diagrams.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use sudoku_core::types::DbId;
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, PaginatedResponse, Pagination};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Raw list query string.
///
/// `page` and `limit` stay strings so an unparseable value counts as absent
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub filter: Option<String>,
}

/// Body of create and update requests.
#[derive(Debug, Deserialize)]
pub struct DiagramInput {
    pub name: Option<String>,
    pub definition: Option<String>,
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

// ---------------------------------------------------------------------------
// GET /diagrams
// ---------------------------------------------------------------------------

/// List the caller's diagrams, one page at a time.
pub async fn list_diagrams(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let query = state.diagrams.validate_query(
        parse_number(params.page.as_deref()),
        parse_number(params.limit.as_deref()),
        params.sort_by.as_deref(),
        params.filter.as_deref(),
    )?;

    let page = state.diagrams.list(auth.user_id, &query).await?;
    tracing::debug!(user_id = auth.user_id, count = page.items.len(), total = page.total, "Listed diagrams");

    Ok(Json(PaginatedResponse {
        data: page.items,
        pagination: Pagination {
            page: query.page,
            limit: query.limit,
            total: page.total,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /diagrams
// ---------------------------------------------------------------------------

pub async fn create_diagram(
    auth: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<DiagramInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let created = state
        .diagrams
        .create(
            auth.user_id,
            input.name.as_deref(),
            input.definition.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /diagrams/{id}
// ---------------------------------------------------------------------------

pub async fn get_diagram(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let diagram = state.diagrams.get(id, auth.user_id).await?;
    Ok(Json(DataResponse { data: diagram }))
}

// ---------------------------------------------------------------------------
// PUT /diagrams/{id}
// ---------------------------------------------------------------------------

/// Replace name and definition; any stored solution is discarded.
pub async fn update_diagram(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    payload: Result<Json<DiagramInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let updated = state
        .diagrams
        .update(
            id,
            auth.user_id,
            input.name.as_deref(),
            input.definition.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /diagrams/{id}
// ---------------------------------------------------------------------------

pub async fn delete_diagram(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.diagrams.delete(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /diagrams/{id}/solve
// ---------------------------------------------------------------------------

/// Solve the stored puzzle and return the diagram with its solution.
///
/// The search is cancelled if the request is dropped before it finishes.
pub async fn solve_diagram(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let solved = state
        .diagrams
        .solve(id, auth.user_id, CancellationToken::new())
        .await?;
    Ok(Json(DataResponse { data: solved }))
}
