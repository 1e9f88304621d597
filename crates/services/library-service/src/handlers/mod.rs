//! HTTP handlers.

pub mod book_handler;
pub mod health_handler;
pub mod user_handler;

pub use book_handler::book_routes;
pub use health_handler::health_routes;
pub use user_handler::user_routes;

use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use common::AppResult;
use domain::{SearchQuery, DEFAULT_PAGE_SIZE};

/// Search, paging and sorting query parameters.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive filter; blank means no filter
    pub search_string: Option<String>,
    /// Zero-based page index
    #[serde(default)]
    pub page: u64,
    /// Page size (1-100)
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 100, message = "size must be between 1 and 100"))]
    pub size: u64,
    /// Sort key
    pub sort: Option<String>,
}

fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl SearchParams {
    /// Convert to a domain query, falling back to `default_sort`.
    pub fn into_query(self, default_sort: &str) -> AppResult<SearchQuery> {
        let sort = self
            .sort
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default_sort.to_string());

        Ok(SearchQuery::new(self.search_string, self.page, self.size, sort)?)
    }
}
