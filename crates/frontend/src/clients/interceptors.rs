//! Outbound request transforms applied before every backend call.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use tracing::{debug, warn};

use domain::BEARER_TOKEN_PREFIX;

use super::backend_client::{BackendError, BackendResult};
use super::AccessToken;

/// A transform applied to an outbound request, in chain order.
///
/// An error aborts the call before anything is sent.
pub trait RequestInterceptor: Send + Sync {
    fn apply(&self, request: &mut Request, token: &AccessToken) -> BackendResult<()>;
}

/// Sets `Authorization: Bearer <token>` (token relay).
pub struct BearerAuth;

impl RequestInterceptor for BearerAuth {
    fn apply(&self, request: &mut Request, token: &AccessToken) -> BackendResult<()> {
        let header = format!("{}{}", BEARER_TOKEN_PREFIX, token.as_str());
        let mut value = HeaderValue::from_str(&header).map_err(|_| {
            warn!("Access token is not a valid header value");
            BackendError::InvalidToken
        })?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Logs method, URL and whether an Authorization header is present.
pub struct RequestLogger;

impl RequestInterceptor for RequestLogger {
    fn apply(&self, request: &mut Request, _token: &AccessToken) -> BackendResult<()> {
        debug!(
            method = %request.method(),
            url = %request.url(),
            authorization = request.headers().contains_key(AUTHORIZATION),
            "Backend request"
        );
        Ok(())
    }
}

/// `[BearerAuth, RequestLogger]`
pub fn default_chain() -> Vec<Arc<dyn RequestInterceptor>> {
    vec![Arc::new(BearerAuth), Arc::new(RequestLogger)]
}
