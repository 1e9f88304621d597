//! Pagination envelope, search parameters and sort keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BOOK_SORT, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{DomainError, DomainResult};

#[cfg(feature = "openapi")]
use crate::{book::Book, user::User};

/// A page of results ordered by the requested sort key.
///
/// Invariants: `content.len() <= size`, and `page * size < total_elements`
/// whenever `content` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "openapi",
    derive(utoipa::ToSchema),
    aliases(BookPage = Page<Book>, UserPage = Page<User>)
)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    /// Zero-based page index
    pub page: u64,
    pub size: u64,
    #[serde(default)]
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Create a page, truncating `content` to `size` if a store returned more.
    pub fn new(mut content: Vec<T>, page: u64, size: u64, total_elements: u64) -> Self {
        content.truncate(size as usize);
        let total_pages = if size > 0 {
            total_elements.div_ceil(size)
        } else {
            0
        };

        Self {
            content,
            total_elements,
            page,
            size,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Search, paging and sorting parameters shared by book and user searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    search_string: Option<String>,
    pub page: u64,
    pub size: u64,
    pub sort: String,
}

impl SearchQuery {
    /// Build a query, rejecting sizes outside `1..=MAX_PAGE_SIZE` and pages
    /// whose row offset does not fit a signed 64-bit SQL offset.
    pub fn new(
        search_string: Option<String>,
        page: u64,
        size: u64,
        sort: impl Into<String>,
    ) -> DomainResult<Self> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(DomainError::validation(format!(
                "size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        match page.checked_mul(size) {
            Some(offset) if offset <= i64::MAX as u64 => {}
            _ => {
                return Err(DomainError::validation(format!(
                    "page {} is out of range",
                    page
                )))
            }
        }

        Ok(Self {
            search_string,
            page,
            size,
            sort: sort.into(),
        })
    }

    /// The filter to apply, or `None` when the search string is blank.
    pub fn search_filter(&self) -> Option<&str> {
        self.search_string
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            search_string: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_BOOK_SORT.to_string(),
        }
    }
}

/// Sort keys accepted by book searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSort {
    Title,
    Author,
    Isbn,
    PublishedYear,
}

impl BookSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookSort::Title => "title",
            BookSort::Author => "author",
            BookSort::Isbn => "isbn",
            BookSort::PublishedYear => "publishedYear",
        }
    }
}

impl FromStr for BookSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(BookSort::Title),
            "author" => Ok(BookSort::Author),
            "isbn" => Ok(BookSort::Isbn),
            "publishedYear" => Ok(BookSort::PublishedYear),
            other => Err(DomainError::validation(format!(
                "Unknown book sort key '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for BookSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort keys accepted by user searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSort {
    UserName,
    FirstName,
    LastName,
    Email,
}

impl UserSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserSort::UserName => "userName",
            UserSort::FirstName => "firstName",
            UserSort::LastName => "lastName",
            UserSort::Email => "email",
        }
    }
}

impl FromStr for UserSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "userName" => Ok(UserSort::UserName),
            "firstName" => Ok(UserSort::FirstName),
            "lastName" => Ok(UserSort::LastName),
            "email" => Ok(UserSort::Email),
            other => Err(DomainError::validation(format!(
                "Unknown user sort key '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for UserSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_never_exceeds_size() {
        let page = Page::new(vec![1, 2, 3, 4, 5], 0, 3, 5);

        assert_eq!(page.content, vec![1, 2, 3]);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_non_empty_page_starts_before_total() {
        let page = Page::new(vec!["a"], 2, 10, 21);

        assert!(!page.is_empty());
        assert!(page.page * page.size < page.total_elements);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let json = serde_json::to_value(Page::new(vec![1], 0, 10, 1)).unwrap();

        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["totalPages"], 1);
    }

    #[test]
    fn test_blank_search_string_is_no_filter() {
        let query = SearchQuery::new(Some("   ".to_string()), 0, 10, "title").unwrap();
        assert_eq!(query.search_filter(), None);

        let query = SearchQuery::new(Some(" gatsby ".to_string()), 0, 10, "title").unwrap();
        assert_eq!(query.search_filter(), Some("gatsby"));
    }

    #[test]
    fn test_size_must_be_positive_and_bounded() {
        assert!(SearchQuery::new(None, 0, 0, "title").is_err());
        assert!(SearchQuery::new(None, 0, MAX_PAGE_SIZE + 1, "title").is_err());
        assert_eq!(SearchQuery::new(None, 3, 10, "title").unwrap().offset(), 30);
    }

    #[test]
    fn test_page_offset_must_fit_sql_offset() {
        assert!(SearchQuery::new(None, u64::MAX / 2, 10, "title").is_err());
        assert!(SearchQuery::new(None, i64::MAX as u64, 2, "title").is_err());

        let last = i64::MAX as u64 / 10;
        assert_eq!(SearchQuery::new(None, last, 10, "title").unwrap().offset(), last * 10);
    }

    #[test]
    fn test_sort_keys_are_whitelisted() {
        assert_eq!("publishedYear".parse::<BookSort>().unwrap(), BookSort::PublishedYear);
        assert_eq!("lastName".parse::<UserSort>().unwrap(), UserSort::LastName);
        assert!("password".parse::<UserSort>().is_err());
        assert!("title; DROP TABLE books".parse::<BookSort>().is_err());
    }
}
