//! Process-local [`DiagramStore`], used for development and tests.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::Utc;
use sudoku_core::listing::{ListQuery, SortField};
use sudoku_core::types::{DbId, UserId};
use tokio::sync::RwLock;

use crate::models::diagram::{Diagram, DiagramPage};
use crate::store::{DiagramStore, StoreError};

#[derive(Default)]
struct Inner {
    next_id: DbId,
    rows: BTreeMap<DbId, Diagram>,
}

/// Diagrams kept in a map guarded by a [`RwLock`]. Ids start at 1.
#[derive(Default)]
pub struct InMemoryDiagramStore {
    inner: RwLock<Inner>,
}

impl InMemoryDiagramStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored diagrams across all users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn matches_filter(diagram: &Diagram, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => diagram
            .name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(needle)),
    }
}

/// Same ordering as the PostgreSQL listing, including `NULLS LAST` on name.
fn sort_rows(rows: &mut [Diagram], sort_by: Option<SortField>) {
    match sort_by {
        Some(SortField::Name) => {
            rows.sort_by(|a, b| {
                (a.name.is_none(), &a.name, a.id).cmp(&(b.name.is_none(), &b.name, b.id))
            });
        }
        Some(SortField::Id) => rows.sort_by_key(|d| d.id),
        Some(SortField::CreatedAt) | None => rows.sort_by_key(|d| Reverse((d.created_at, d.id))),
    }
}

#[async_trait::async_trait]
impl DiagramStore for InMemoryDiagramStore {
    async fn list(&self, user_id: UserId, params: &ListQuery) -> Result<DiagramPage, StoreError> {
        let needle = params.filter.as_deref().map(str::to_lowercase);
        let inner = self.inner.read().await;

        let mut rows: Vec<Diagram> = inner
            .rows
            .values()
            .filter(|d| d.user_id == user_id && matches_filter(d, needle.as_deref()))
            .cloned()
            .collect();
        sort_rows(&mut rows, params.sort_by);

        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(params.offset().max(0) as usize)
            .take(params.limit.max(0) as usize)
            .collect();
        Ok(DiagramPage { items, total })
    }

    async fn get_by_id(&self, id: DbId, user_id: UserId) -> Result<Option<Diagram>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).filter(|d| d.user_id == user_id).cloned())
    }

    async fn create(
        &self,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<Diagram, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let now = Utc::now();
        let diagram = Diagram {
            id: inner.next_id,
            user_id,
            name: name.map(str::to_owned),
            definition: definition.to_owned(),
            solution: None,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(diagram.id, diagram.clone());
        Ok(diagram)
    }

    async fn update(
        &self,
        id: DbId,
        user_id: UserId,
        name: Option<&str>,
        definition: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&id).filter(|d| d.user_id == user_id) {
            Some(diagram) => {
                diagram.name = name.map(str::to_owned);
                diagram.definition = definition.to_owned();
                diagram.solution = None;
                diagram.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_solution(
        &self,
        id: DbId,
        user_id: UserId,
        solution: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&id).filter(|d| d.user_id == user_id) {
            Some(diagram) => {
                diagram.solution = Some(solution.to_owned());
                diagram.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: DbId, user_id: UserId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let owned = inner.rows.get(&id).is_some_and(|d| d.user_id == user_id);
        if owned {
            inner.rows.remove(&id);
        }
        Ok(owned)
    }
}
