//! Repository for the `diagrams` table.
//!
//! Every statement is scoped by `user_id`; a diagram owned by someone else
//! is indistinguishable from a missing one.

use sqlx::PgPool;
use sudoku_core::listing::{ListQuery, SortField};
use sudoku_core::types::{DbId, UserId};

use crate::models::diagram::Diagram;

/// Column list for diagrams queries.
const COLUMNS: &str = "id, user_id, name, definition, solution, created_at, updated_at";

/// Provides CRUD operations for diagrams.
pub struct DiagramRepo;

impl DiagramRepo {
    /// Insert a new diagram with no solution.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<Diagram, sqlx::Error> {
        let query = format!(
            "INSERT INTO diagrams (user_id, name, definition)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Diagram>(&query)
            .bind(user_id)
            .bind(name)
            .bind(definition)
            .fetch_one(pool)
            .await
    }

    /// Find a diagram by ID for its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Diagram>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM diagrams WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Diagram>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of a user's diagrams, optionally filtered by name.
    pub async fn list(
        pool: &PgPool,
        user_id: UserId,
        params: &ListQuery,
    ) -> Result<Vec<Diagram>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM diagrams
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR name ILIKE $2)
             ORDER BY {}
             LIMIT $3 OFFSET $4",
            order_clause(params.sort_by)
        );
        sqlx::query_as::<_, Diagram>(&query)
            .bind(user_id)
            .bind(params.filter.as_deref().map(like_pattern))
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    /// Count a user's diagrams matching the same filter as [`Self::list`].
    pub async fn count(
        pool: &PgPool,
        user_id: UserId,
        filter: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM diagrams
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR name ILIKE $2)",
        )
        .bind(user_id)
        .bind(filter.map(like_pattern))
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Replace name and definition and drop any stored solution.
    ///
    /// Returns `true` if a row was updated.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE diagrams
             SET name = $3, definition = $4, solution = NULL, updated_at = NOW()
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(definition)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a computed solution. Returns `true` if a row was updated.
    pub async fn update_solution(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
        solution: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE diagrams SET solution = $3, updated_at = NOW()
             WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(solution)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a diagram. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM diagrams WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// ORDER BY clause for a sort key. Ties break on `id` so paging is stable.
fn order_clause(sort_by: Option<SortField>) -> &'static str {
    match sort_by {
        Some(SortField::Name) => "name ASC NULLS LAST, id ASC",
        Some(SortField::Id) => "id ASC",
        Some(SortField::CreatedAt) | None => "created_at DESC, id DESC",
    }
}

/// `ILIKE` pattern matching `filter` as a literal substring.
fn like_pattern(filter: &str) -> String {
    let escaped = filter
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
