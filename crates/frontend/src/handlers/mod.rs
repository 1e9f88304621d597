//! HTTP handlers.

pub mod admin_handler;
pub mod auth_handler;
pub mod error_handler;
pub mod health_handler;
pub mod library_handler;

pub use admin_handler::admin_routes;
pub use auth_handler::auth_routes;
pub use error_handler::error_routes;
pub use health_handler::health_routes;
pub use library_handler::library_routes;

use serde::Deserialize;
use validator::Validate;

use common::AppResult;
use domain::{SearchQuery, DEFAULT_PAGE_SIZE};

/// Search, paging and sorting parameters of the list pages.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_string: Option<String>,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 100, message = "size must be between 1 and 100"))]
    pub size: u64,
    /// Sort key; `sortBy` is accepted for older links
    #[serde(alias = "sortBy")]
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
