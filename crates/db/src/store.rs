//! The persistence contract consumed by the diagram service.

use sqlx::PgPool;
use sudoku_core::listing::ListQuery;
use sudoku_core::types::{DbId, UserId};

use crate::models::diagram::{Diagram, DiagramPage};
use crate::repositories::DiagramRepo;

/// Failure reported by a [`DiagramStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Owner-scoped diagram storage.
///
/// Every operation is keyed by `(id, user_id)`. A diagram owned by another
/// user behaves exactly like one that does not exist. The boolean results of
/// the write operations report whether a row was affected.
#[async_trait::async_trait]
pub trait DiagramStore: Send + Sync {
    /// One page of the user's diagrams and the total matching `params.filter`.
    async fn list(&self, user_id: UserId, params: &ListQuery) -> Result<DiagramPage, StoreError>;

    async fn get_by_id(&self, id: DbId, user_id: UserId) -> Result<Option<Diagram>, StoreError>;

    /// Insert a diagram with no solution and return the stored row.
    async fn create(
        &self,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<Diagram, StoreError>;

    /// Replace name and definition, clearing the solution in the same write.
    async fn update(
        &self,
        id: DbId,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<bool, StoreError>;

    async fn update_solution(
        &self,
        id: DbId,
        user_id: UserId,
        solution: &str,
    ) -> Result<bool, StoreError>;

    async fn delete(&self, id: DbId, user_id: UserId) -> Result<bool, StoreError>;
}

/// [`DiagramStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgDiagramStore {
    pool: PgPool,
}

impl PgDiagramStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl DiagramStore for PgDiagramStore {
    async fn list(&self, user_id: UserId, params: &ListQuery) -> Result<DiagramPage, StoreError> {
        let items = DiagramRepo::list(&self.pool, user_id, params).await?;
        let total = DiagramRepo::count(&self.pool, user_id, params.filter.as_deref()).await?;
        Ok(DiagramPage { items, total })
    }

    async fn get_by_id(&self, id: DbId, user_id: UserId) -> Result<Option<Diagram>, StoreError> {
        Ok(DiagramRepo::find_by_id(&self.pool, id, user_id).await?)
    }

    async fn create(
        &self,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<Diagram, StoreError> {
        Ok(DiagramRepo::create(&self.pool, user_id, name, definition).await?)
    }

    async fn update(
        &self,
        id: DbId,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<bool, StoreError> {
        Ok(DiagramRepo::update(&self.pool, id, user_id, name, definition).await?)
    }

    async fn update_solution(
        &self,
        id: DbId,
        user_id: UserId,
        solution: &str,
    ) -> Result<bool, StoreError> {
        Ok(DiagramRepo::update_solution(&self.pool, id, user_id, solution).await?)
    }

    async fn delete(&self, id: DbId, user_id: UserId) -> Result<bool, StoreError> {
        Ok(DiagramRepo::delete(&self.pool, id, user_id).await?)
    }
}
