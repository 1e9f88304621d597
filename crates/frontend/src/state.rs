//! Application state for dependency injection.

use std::sync::Arc;

use crate::clients::OidcClient;
use crate::config::FrontendConfig;
use crate::service::LibraryService;
use crate::session::SessionStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<LibraryService>,
    pub sessions: Arc<dyn SessionStore>,
    pub oidc: Arc<OidcClient>,
    pub config: Arc<FrontendConfig>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        library: Arc<LibraryService>,
        sessions: Arc<dyn SessionStore>,
        oidc: Arc<OidcClient>,
        config: Arc<FrontendConfig>,
    ) -> Self {
        Self {
            library,
            sessions,
            oidc,
            config,
        }
    }
}
