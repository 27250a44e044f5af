//! Diagram entity.

use serde::Serialize;
use sqlx::FromRow;
use sudoku_core::types::{DbId, Timestamp, UserId};

/// A row from the `diagrams` table.
///
/// `solution` is `None` until a solve succeeds and is cleared again by any
/// edit of `name` or `definition`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Diagram {
    pub id: DbId,
    pub user_id: UserId,
    pub name: Option<String>,
    pub definition: String,
    pub solution: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One page of a diagram listing plus the filtered total.
#[derive(Debug, Clone)]
pub struct DiagramPage {
    pub items: Vec<Diagram>,
    pub total: i64,
}
