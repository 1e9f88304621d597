//! Service layer.

mod library_service;

pub use library_service::LibraryService;
