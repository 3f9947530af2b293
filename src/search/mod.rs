//! Dataset search: request validation, the upstream call, and normalization of
//! the catalog's records into the output schema.

pub mod normalize;
pub mod types;

pub use types::SearchResponse;

use tracing::info;

use crate::ckan::{CkanError, PackageQuery, PackageSearch};
use normalize::normalize;

pub const DEFAULT_ROWS: i64 = 10;
pub const DEFAULT_START: i64 = 0;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("query must not be empty")]
    EmptyQuery,
}

/// A validated search. `rows` and `start` are forwarded unchecked; a
/// non-negative `rows` also caps the records returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    term: String,
    rows: i64,
    start: i64,
}

impl SearchRequest {
    pub fn new(
        term: impl Into<String>,
        rows: Option<i64>,
        start: Option<i64>,
    ) -> Result<Self, ValidationError> {
        let term = term.into();
        if term.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(Self {
            term,
            rows: rows.unwrap_or(DEFAULT_ROWS),
            start: start.unwrap_or(DEFAULT_START),
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn rows(&self) -> i64 {
        self.rows
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    fn package_query(&self) -> PackageQuery<'_> {
        PackageQuery {
            q: &self.term,
            rows: self.rows,
            start: self.start,
        }
    }
}

/// Searches the catalog and reshapes its answer. Holds no state besides the client.
pub struct SearchService<C> {
    catalog: C,
}

impl<C: PackageSearch> SearchService<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, CkanError> {
        let mut result = self.catalog.package_search(request.package_query()).await?;
        if let (Some(records), Ok(limit)) =
            (result.results.as_mut(), usize::try_from(request.rows()))
        {
            records.truncate(limit);
        }
        let response = normalize(request.term(), result);
        info!(
            count = response.count,
            returned = response.results.len(),
            "search complete"
        );
        Ok(response)
    }
}
