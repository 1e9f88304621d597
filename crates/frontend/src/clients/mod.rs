//! HTTP clients for the library backend and the identity provider.

mod backend_client;
pub mod interceptors;
mod oidc_client;

pub use backend_client::{BackendClient, BackendError, BackendResult, HttpBackendClient};
pub use interceptors::{default_chain, BearerAuth, RequestInterceptor, RequestLogger};
pub use oidc_client::{OidcClient, TokenGrant};

#[cfg(any(test, feature = "test-utils"))]
pub use backend_client::MockBackendClient;

use std::fmt;

/// Bearer access token relayed to the backend on behalf of the session user.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}
