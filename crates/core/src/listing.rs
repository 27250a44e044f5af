//! Normalization of list query parameters (`page`, `limit`, `sortBy`,
//! `filter`).
//!
//! Validation stops at the first violated rule; the error message names it.

use crate::error::CoreError;

/// Page used when the caller does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest accepted page size.
pub const MAX_LIMIT: i64 = 100;

/// Longest accepted name filter, in characters.
pub const MAX_FILTER_LENGTH: usize = 1000;

/// Columns a diagram listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Name,
    Id,
}

impl SortField {
    /// Accepted spellings, in the order they are reported to the caller.
    pub const NAMES: [&'static str; 3] = ["created_at", "name", "id"];

    /// Parse a sort key, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "created_at" => Some(Self::CreatedAt),
            "name" => Some(Self::Name),
            "id" => Some(Self::Id),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Name => "name",
            Self::Id => "id",
        }
    }
}

/// A validated, defaulted list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// One-based page number.
    pub page: i64,
    pub limit: i64,
    /// `None` means newest first.
    pub sort_by: Option<SortField>,
    /// Case-insensitive substring match on the diagram name.
    pub filter: Option<String>,
}

impl ListQuery {
    /// Number of rows to skip for the current page. Saturates at
    /// `i64::MAX`, which simply yields an empty page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: None,
            filter: None,
        }
    }
}

/// Apply defaults and bounds to raw list parameters.
///
/// - `page` defaults to 1 and must be >= 1.
/// - `limit` defaults to 10 and must be within `1..=100`.
/// - `sort_by`, when non-blank, must be one of `created_at`, `name`, `id`.
/// - `filter`, when non-empty, must be at most 1000 characters.
pub fn validate_list_query(
    page: Option<i64>,
    limit: Option<i64>,
    sort_by: Option<&str>,
    filter: Option<&str>,
) -> Result<ListQuery, CoreError> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    if page < 1 {
        return Err(CoreError::Validation("page must be >= 1".into()));
    }

    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(CoreError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let sort_by = match sort_by.filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(SortField::parse(raw).ok_or_else(|| {
            CoreError::Validation(format!(
                "sortBy must be one of: {}",
                SortField::NAMES.join(", ")
            ))
        })?),
        None => None,
    };

    let filter = match filter.filter(|f| !f.is_empty()) {
        Some(f) if f.chars().count() > MAX_FILTER_LENGTH => {
            return Err(CoreError::Validation(format!(
                "filter length must be <= {MAX_FILTER_LENGTH}"
            )));
        }
        other => other.map(str::to_owned),
    };

    Ok(ListQuery {
        page,
        limit,
        sort_by,
        filter,
    })
}
