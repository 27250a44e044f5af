//! Behaviour of the diagram lifecycle service against in-process stores.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use common::{CLASSIC, CLASSIC_SOLUTION, HARD};
use sudoku_api::services::DiagramService;
use sudoku_core::error::CoreError;
use sudoku_core::listing::ListQuery;
use sudoku_core::types::{DbId, UserId};
use sudoku_db::memory::InMemoryDiagramStore;
use sudoku_db::models::diagram::{Diagram, DiagramPage};
use sudoku_db::store::{DiagramStore, StoreError};
use tokio_util::sync::CancellationToken;

const USER: UserId = 11;
const OTHER: UserId = 12;

/// Legal clues, but the last cell of row 1 has no candidate left.
fn blocked_definition() -> String {
    format!("12345678 {}9", " ".repeat(71))
}

fn service_over(store: Arc<dyn DiagramStore>) -> DiagramService {
    DiagramService::new(store, Duration::from_secs(10))
}

fn service() -> (DiagramService, Arc<InMemoryDiagramStore>) {
    let store = Arc::new(InMemoryDiagramStore::new());
    (service_over(store.clone()), store)
}

// ---------------------------------------------------------------------------
// Store doubles
// ---------------------------------------------------------------------------

/// Removes the diagram right before every write, as a concurrent delete would.
struct VanishingStore {
    inner: InMemoryDiagramStore,
}

#[async_trait::async_trait]
impl DiagramStore for VanishingStore {
    async fn list(&self, user_id: UserId, params: &ListQuery) -> Result<DiagramPage, StoreError> {
        self.inner.list(user_id, params).await
    }

    async fn get_by_id(&self, id: DbId, user_id: UserId) -> Result<Option<Diagram>, StoreError> {
        self.inner.get_by_id(id, user_id).await
    }

    async fn create(
        &self,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<Diagram, StoreError> {
        self.inner.create(user_id, name, definition).await
    }

    async fn update(
        &self,
        id: DbId,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<bool, StoreError> {
        self.inner.delete(id, user_id).await?;
        self.inner.update(id, user_id, name, definition).await
    }

    async fn update_solution(
        &self,
        id: DbId,
        user_id: UserId,
        solution: &str,
    ) -> Result<bool, StoreError> {
        self.inner.delete(id, user_id).await?;
        self.inner.update_solution(id, user_id, solution).await
    }

    async fn delete(&self, id: DbId, user_id: UserId) -> Result<bool, StoreError> {
        self.inner.delete(id, user_id).await?;
        self.inner.delete(id, user_id).await
    }
}

fn unreachable_database() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

/// Every operation fails as if the backend were unreachable.
struct DownStore;

#[async_trait::async_trait]
impl DiagramStore for DownStore {
    async fn list(&self, _: UserId, _: &ListQuery) -> Result<DiagramPage, StoreError> {
        Err(unreachable_database())
    }

    async fn get_by_id(&self, _: DbId, _: UserId) -> Result<Option<Diagram>, StoreError> {
        Err(unreachable_database())
    }

    async fn create(&self, _: UserId, _: Option<&str>, _: &str) -> Result<Diagram, StoreError> {
        Err(unreachable_database())
    }

    async fn update(
        &self,
        _: DbId,
        _: UserId,
        _: Option<&str>,
        _: &str,
    ) -> Result<bool, StoreError> {
        Err(unreachable_database())
    }

    async fn update_solution(&self, _: DbId, _: UserId, _: &str) -> Result<bool, StoreError> {
        Err(unreachable_database())
    }

    async fn delete(&self, _: DbId, _: UserId) -> Result<bool, StoreError> {
        Err(unreachable_database())
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_stores_unsolved_diagram() {
    let (service, _) = service();
    let created = service.create(USER, Some("Classic"), CLASSIC).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.user_id, USER);
    assert_eq!(created.name.as_deref(), Some("Classic"));
    assert_eq!(created.definition, CLASSIC);
    assert_eq!(created.solution, None);
}

#[tokio::test]
async fn create_accepts_definitions_that_are_not_yet_legal() {
    let (service, _) = service();
    assert!(service.create(USER, None, "11").await.is_ok());
}

#[tokio::test]
async fn create_rejects_blank_definition() {
    let (service, store) = service();
    let err = service.create(USER, None, "   ").await.unwrap_err();
    assert_eq!(err, CoreError::Validation("definition must be provided".into()));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn create_rejects_oversized_fields() {
    let (service, _) = service();
    assert_matches!(
        service.create(USER, None, &"1".repeat(10_001)).await,
        Err(CoreError::Validation(msg)) if msg == "definition length must be <= 10000 characters"
    );
    assert_matches!(
        service.create(USER, Some(&"n".repeat(101)), CLASSIC).await,
        Err(CoreError::Validation(msg)) if msg == "name length must be <= 100 characters"
    );
}

#[tokio::test]
async fn create_store_failure_surfaces_as_validation() {
    let service = service_over(Arc::new(DownStore));
    assert_matches!(
        service.create(USER, None, CLASSIC).await,
        Err(CoreError::Validation(msg)) if msg.starts_with("Failed to create diagram: Database error:")
    );
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_clears_existing_solution() {
    let (service, _) = service();
    let created = service.create(USER, None, CLASSIC).await.unwrap();
    let solved = service
        .solve(created.id, USER, CancellationToken::new())
        .await
        .unwrap();
    assert!(solved.solution.is_some());

    let updated = service
        .update(created.id, USER, Some("Edited"), &blocked_definition())
        .await
        .unwrap();
    assert_eq!(updated.solution, None);
    assert_eq!(updated.name.as_deref(), Some("Edited"));
    assert_eq!(updated.definition, blocked_definition());
}

#[tokio::test]
async fn update_rejects_non_positive_id() {
    let (service, _) = service();
    assert_matches!(
        service.update(0, USER, None, CLASSIC).await,
        Err(CoreError::Validation(msg)) if msg == "id must be a positive integer"
    );
}

#[tokio::test]
async fn update_of_foreign_diagram_is_not_found() {
    let (service, _) = service();
    let created = service.create(OTHER, None, CLASSIC).await.unwrap();
    assert_eq!(
        service.update(created.id, USER, None, CLASSIC).await,
        Err(CoreError::NotFound {
            entity: "Diagram",
            id: created.id
        })
    );
}

#[tokio::test]
async fn update_lost_to_concurrent_delete_is_conflict() {
    let store = Arc::new(VanishingStore {
        inner: InMemoryDiagramStore::new(),
    });
    let service = service_over(store.clone());
    let created = service.create(USER, None, CLASSIC).await.unwrap();

    assert_eq!(
        service.update(created.id, USER, None, CLASSIC).await,
        Err(CoreError::Conflict("Failed to update diagram".into()))
    );
}

// ---------------------------------------------------------------------------
// Solve
// ---------------------------------------------------------------------------

#[tokio::test]
async fn solve_persists_solution() {
    let (service, store) = service();
    let created = service.create(USER, Some("Classic"), CLASSIC).await.unwrap();

    let solved = service
        .solve(created.id, USER, CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(solved.solution.as_deref(), Some(CLASSIC_SOLUTION));
    assert_eq!(solved.definition, CLASSIC);
    assert!(solved.updated_at >= created.updated_at);

    let stored = store.get_by_id(created.id, USER).await.unwrap().unwrap();
    assert_eq!(stored, solved);
}

#[tokio::test]
async fn solve_is_deterministic() {
    let (service, _) = service();
    let first = service.create(USER, None, CLASSIC).await.unwrap();
    let second = service.create(USER, None, CLASSIC).await.unwrap();

    let a = service.solve(first.id, USER, CancellationToken::new()).await.unwrap();
    let b = service.solve(second.id, USER, CancellationToken::new()).await.unwrap();
    assert_eq!(a.solution, b.solution);
}

#[tokio::test]
async fn solve_reports_duplicate_clue_as_validation() {
    let (service, store) = service();
    let definition = format!("11{}", " ".repeat(79));
    let created = service.create(USER, None, &definition).await.unwrap();

    let err = service
        .solve(created.id, USER, CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CoreError::Validation(
            "definition violates Sudoku constraints: digit 1 repeats in row 1".into()
        )
    );
    let stored = store.get_by_id(created.id, USER).await.unwrap().unwrap();
    assert_eq!(stored.solution, None);
}

#[tokio::test]
async fn solve_reports_wrong_length_as_validation() {
    let (service, _) = service();
    let created = service.create(USER, None, "123").await.unwrap();
    assert_matches!(
        service.solve(created.id, USER, CancellationToken::new()).await,
        Err(CoreError::Validation(msg)) if msg.contains("exactly 81 cells")
    );
}

#[tokio::test]
async fn solve_reports_unsolvable_distinctly() {
    let (service, _) = service();
    let created = service.create(USER, None, &blocked_definition()).await.unwrap();
    assert_eq!(
        service.solve(created.id, USER, CancellationToken::new()).await,
        Err(CoreError::Unsolvable("Sudoku is unsolvable".into()))
    );
}

#[tokio::test]
async fn solve_cancelled_before_start_is_not_unsolvable() {
    let (service, store) = service();
    let created = service.create(USER, None, CLASSIC).await.unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(
        service.solve(created.id, USER, cancel).await,
        Err(CoreError::Cancelled)
    );
    let stored = store.get_by_id(created.id, USER).await.unwrap().unwrap();
    assert_eq!(stored.solution, None);
}

#[tokio::test]
async fn solve_past_budget_is_cancelled_and_stores_nothing() {
    let store = Arc::new(InMemoryDiagramStore::new());
    let service = DiagramService::new(store.clone(), Duration::ZERO);
    let created = service.create(USER, None, HARD).await.unwrap();

    assert_eq!(
        service.solve(created.id, USER, CancellationToken::new()).await,
        Err(CoreError::Cancelled)
    );
    let stored = store.get_by_id(created.id, USER).await.unwrap().unwrap();
    assert_eq!(stored.solution, None);
}

#[tokio::test]
async fn shared_token_survives_consecutive_solves() {
    let (service, _) = service();
    let first = service.create(USER, None, CLASSIC).await.unwrap();
    let second = service.create(USER, None, CLASSIC).await.unwrap();
    let token = CancellationToken::new();

    let a = service.solve(first.id, USER, token.clone()).await.unwrap();
    assert!(!token.is_cancelled());
    let b = service.solve(second.id, USER, token.clone()).await.unwrap();

    assert_eq!(a.solution.as_deref(), Some(CLASSIC_SOLUTION));
    assert_eq!(b.solution.as_deref(), Some(CLASSIC_SOLUTION));
    assert!(!token.is_cancelled());
}

#[tokio::test]
async fn solve_of_missing_diagram_is_not_found() {
    let (service, _) = service();
    assert_matches!(
        service.solve(99, USER, CancellationToken::new()).await,
        Err(CoreError::NotFound { entity: "Diagram", id: 99 })
    );
}

#[tokio::test]
async fn solve_lost_to_concurrent_delete_is_conflict() {
    let store = Arc::new(VanishingStore {
        inner: InMemoryDiagramStore::new(),
    });
    let service = service_over(store.clone());
    let created = service.create(USER, None, CLASSIC).await.unwrap();

    assert_eq!(
        service.solve(created.id, USER, CancellationToken::new()).await,
        Err(CoreError::Conflict("Failed to save solution".into()))
    );
}

// ---------------------------------------------------------------------------
// Delete / get / list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_diagram() {
    let (service, _) = service();
    let created = service.create(USER, None, CLASSIC).await.unwrap();

    service.delete(created.id, USER).await.unwrap();
    assert_matches!(
        service.get(created.id, USER).await,
        Err(CoreError::NotFound { .. })
    );
    assert_matches!(
        service.delete(created.id, USER).await,
        Err(CoreError::NotFound { .. })
    );
}

#[tokio::test]
async fn delete_lost_to_concurrent_delete_is_conflict() {
    let service = service_over(Arc::new(VanishingStore {
        inner: InMemoryDiagramStore::new(),
    }));
    let created = service.create(USER, None, CLASSIC).await.unwrap();
    assert_eq!(
        service.delete(created.id, USER).await,
        Err(CoreError::Conflict("Failed to delete diagram".into()))
    );
}

#[tokio::test]
async fn get_rejects_negative_id() {
    let (service, _) = service();
    assert_matches!(service.get(-3, USER).await, Err(CoreError::Validation(_)));
}

#[tokio::test]
async fn list_only_returns_own_diagrams() {
    let (service, _) = service();
    service.create(USER, Some("mine"), CLASSIC).await.unwrap();
    service.create(OTHER, Some("theirs"), CLASSIC).await.unwrap();

    let query = service.validate_query(None, None, None, None).unwrap();
    let page = service.list(USER, &query).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].name.as_deref(), Some("mine"));
}

#[tokio::test]
async fn store_failure_outside_create_is_internal() {
    let service = service_over(Arc::new(DownStore));
    assert_matches!(service.get(1, USER).await, Err(CoreError::Internal(_)));
    assert_matches!(
        service.list(USER, &ListQuery::default()).await,
        Err(CoreError::Internal(_))
    );
}
