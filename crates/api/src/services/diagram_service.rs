//! Diagram lifecycle service.
//!
//! Sequences coarse validation, owner-scoped existence checks, solving and
//! persistence for each diagram use case. Held in
//! [`AppState`](crate::state::AppState).
//!
//! The read-check-then-write steps are not transactional. A write that
//! affects no rows after a successful existence check means the diagram was
//! removed concurrently and is reported as [`CoreError::Conflict`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use sudoku_core::diagram::{self, ENTITY};
use sudoku_core::error::CoreError;
use sudoku_core::listing::{self, ListQuery};
use sudoku_core::sudoku;
use sudoku_core::types::{DbId, UserId};
use sudoku_db::models::diagram::{Diagram, DiagramPage};
use sudoku_db::store::{DiagramStore, StoreError};
use tokio_util::sync::CancellationToken;

/// Orchestrates create / update / solve / delete for one user's diagrams.
#[derive(Clone)]
pub struct DiagramService {
    store: Arc<dyn DiagramStore>,
    solve_timeout: Duration,
}

impl DiagramService {
    pub fn new(store: Arc<dyn DiagramStore>, solve_timeout: Duration) -> Self {
        Self {
            store,
            solve_timeout,
        }
    }

    /// Normalize raw list parameters. See [`listing::validate_list_query`].
    pub fn validate_query(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
        sort_by: Option<&str>,
        filter: Option<&str>,
    ) -> Result<ListQuery, CoreError> {
        listing::validate_list_query(page, limit, sort_by, filter)
    }

    pub async fn list(&self, user_id: UserId, params: &ListQuery) -> Result<DiagramPage, CoreError> {
        self.store
            .list(user_id, params)
            .await
            .map_err(store_failure)
    }

    /// Fetch one diagram owned by `user_id`.
    pub async fn get(&self, id: DbId, user_id: UserId) -> Result<Diagram, CoreError> {
        diagram::validate_id(id)?;
        self.find_owned(id, user_id).await
    }

    /// Store a new, unsolved diagram.
    ///
    /// Only coarse bounds are checked here; sudoku legality is checked when
    /// the diagram is solved. Any store failure is reported as a validation
    /// error carrying the cause.
    pub async fn create(
        &self,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<Diagram, CoreError> {
        diagram::validate_fields(name, definition)?;

        let created = self
            .store
            .create(user_id, name, definition)
            .await
            .map_err(|err| {
                tracing::warn!(user_id, error = %err, "Store rejected new diagram");
                CoreError::Validation(format!("Failed to create diagram: {err}"))
            })?;

        tracing::info!(user_id, diagram_id = created.id, "Diagram created");
        Ok(created)
    }

    /// Replace name and definition. The stored solution is cleared.
    pub async fn update(
        &self,
        id: DbId,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<Diagram, CoreError> {
        diagram::validate_id(id)?;
        diagram::validate_fields(name, definition)?;
        self.find_owned(id, user_id).await?;

        let updated = self
            .store
            .update(id, user_id, name, definition)
            .await
            .map_err(store_failure)?;
        if !updated {
            return Err(CoreError::Conflict("Failed to update diagram".into()));
        }

        tracing::info!(user_id, diagram_id = id, "Diagram updated");
        self.find_owned(id, user_id).await
    }

    /// Solve the stored definition and persist the solution.
    ///
    /// Malformed or illegal definitions fail with [`CoreError::Validation`],
    /// a legal puzzle without a completion with [`CoreError::Unsolvable`].
    /// The search is aborted with [`CoreError::Cancelled`] when `cancel`
    /// fires, when the solve budget runs out, or when this future is dropped.
    /// `cancel` itself is only observed, so one token may be shared by many
    /// solves.
    pub async fn solve(
        &self,
        id: DbId,
        user_id: UserId,
        cancel: CancellationToken,
    ) -> Result<Diagram, CoreError> {
        diagram::validate_id(id)?;
        let current = self.find_owned(id, user_id).await?;
        diagram::validate_definition(&current.definition)?;

        let solution = self.run_solver(current.definition, cancel).await?;

        let saved = self
            .store
            .update_solution(id, user_id, &solution)
            .await
            .map_err(store_failure)?;
        if !saved {
            return Err(CoreError::Conflict("Failed to save solution".into()));
        }

        tracing::info!(user_id, diagram_id = id, "Diagram solved");
        self.find_owned(id, user_id).await
    }

    pub async fn delete(&self, id: DbId, user_id: UserId) -> Result<(), CoreError> {
        diagram::validate_id(id)?;
        self.find_owned(id, user_id).await?;

        let deleted = self
            .store
            .delete(id, user_id)
            .await
            .map_err(store_failure)?;
        if !deleted {
            return Err(CoreError::Conflict("Failed to delete diagram".into()));
        }

        tracing::info!(user_id, diagram_id = id, "Diagram deleted");
        Ok(())
    }

    async fn find_owned(&self, id: DbId, user_id: UserId) -> Result<Diagram, CoreError> {
        self.store
            .get_by_id(id, user_id)
            .await
            .map_err(store_failure)?
            .ok_or(CoreError::NotFound { entity: ENTITY, id })
    }

    /// Run the search on the blocking pool under the solve budget.
    async fn run_solver(
        &self,
        definition: String,
        cancel: CancellationToken,
    ) -> Result<String, CoreError> {
        // Child token: the timeout and the drop guard stop this search only,
        // never the caller's token.
        let cancel = cancel.child_token();
        // Dropping this future (client gone, request timeout) stops the worker.
        let _abort_on_drop = cancel.clone().drop_guard();

        let started = Instant::now();
        let worker_cancel = cancel.clone();
        let mut task = tokio::task::spawn_blocking(move || {
            sudoku::solve_definition(&definition, &worker_cancel)
        });

        let joined = tokio::select! {
            joined = &mut task => joined,
            () = tokio::time::sleep(self.solve_timeout) => {
                tracing::warn!(timeout = ?self.solve_timeout, "Solve budget exceeded");
                cancel.cancel();
                task.await
            }
        };
        let outcome =
            joined.map_err(|e| CoreError::Internal(format!("Solver task failed: {e}")))?;

        tracing::debug!(
            elapsed = ?started.elapsed(),
            solved = outcome.is_ok(),
            "Solver finished"
        );
        Ok(outcome?)
    }
}

fn store_failure(err: StoreError) -> CoreError {
    tracing::error!(error = %err, "Diagram store failure");
    CoreError::Internal(err.to_string())
}
