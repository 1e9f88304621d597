//! Application state for dependency injection.

use std::sync::Arc;

use crate::infra::ReadinessCheck;
use crate::service::{CatalogService, LendingService, TokenValidator, UserService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogService>,
    pub users: Arc<dyn UserService>,
    pub lending: Arc<dyn LendingService>,
    pub token_validator: Arc<TokenValidator>,
    pub health: Arc<dyn ReadinessCheck>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        users: Arc<dyn UserService>,
        lending: Arc<dyn LendingService>,
        token_validator: Arc<TokenValidator>,
        health: Arc<dyn ReadinessCheck>,
    ) -> Self {
        Self {
            catalog,
            users,
            lending,
            token_validator,
            health,
        }
    }
}
