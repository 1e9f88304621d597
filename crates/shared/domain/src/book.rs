//! Book domain entity.

use serde::{Deserialize, Serialize};

/// A catalogued book, keyed by ISBN.
///
/// `available` is derived by the backend from loan existence; the frontend
/// treats the whole record as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// International Standard Book Number
    #[cfg_attr(feature = "openapi", schema(example = "978-0743273565"))]
    pub isbn: String,
    /// Book title
    #[cfg_attr(feature = "openapi", schema(example = "The Great Gatsby"))]
    pub title: String,
    /// Author(s), as printed on the cover
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    /// False while a loan references this book
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}
