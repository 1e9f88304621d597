//! OpenID Connect authorization-code client.
//!
//! Builds the authorization redirect (state, nonce and PKCE S256), exchanges
//! the callback code for tokens and refreshes them. Claims are read from the
//! token payload as issued by the provider over TLS; signature checks happen
//! in the backend, which validates every relayed access token.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

use common::{AppError, AppResult, HttpClientConfig, OidcConfig};
use domain::{AccessClaims, Identity};

use crate::session::{PendingLogin, TokenSet};

/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_EXPIRES_IN: i64 = 300;

/// Identity and tokens obtained from a successful code exchange.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub identity: Identity,
    pub tokens: TokenSet,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct NonceClaim {
    #[serde(default)]
    nonce: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client for the identity provider's authorization and token endpoints.
pub struct OidcClient {
    http: reqwest::Client,
    config: OidcConfig,
}

impl OidcClient {
    pub fn new(config: OidcConfig, http: &HttpClientConfig) -> AppResult<Self> {
        Url::parse(&config.authorization_endpoint)
            .map_err(|e| AppError::internal(format!("Invalid authorization endpoint: {}", e)))?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(http.connect_timeout_ms))
            .timeout(Duration::from_millis(http.request_timeout_ms))
            .build()
            .map_err(|e| AppError::internal(format!("HTTP client error: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Start a login: the authorization URL and the state to keep until callback.
    pub fn begin_login(&self) -> AppResult<(Url, PendingLogin)> {
        let pending = PendingLogin::new();
        let mut url = Url::parse(&self.config.authorization_endpoint)
            .map_err(|e| AppError::internal(format!("Invalid authorization endpoint: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", self.config.client_id.as_str())
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", &pending.state)
            .append_pair("nonce", &pending.nonce)
            .append_pair("code_challenge", &pkce_challenge(&pending.pkce_verifier))
            .append_pair("code_challenge_method", "S256");

        Ok((url, pending))
    }

    /// Exchange an authorization code for tokens and the signed-in identity.
    pub async fn exchange_code(
        &self,
        code: &str,
        pending: &PendingLogin,
    ) -> AppResult<TokenGrant> {
        let response = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code_verifier", pending.pkce_verifier.as_str()),
            ])
            .await?;

        if let Some(id_token) = &response.id_token {
            let claim: NonceClaim = decode_payload(id_token)?;
            if claim.nonce.as_deref() != Some(pending.nonce.as_str()) {
                tracing::warn!("ID token nonce mismatch");
                return Err(AppError::Unauthorized);
            }
        }

        let claims: AccessClaims =
            decode_payload(response.id_token.as_deref().unwrap_or(&response.access_token))?;
        let mut identity = Identity::from(claims);

        // Realm roles are only guaranteed on the access token
        if response.id_token.is_some() {
            if let Ok(access) = decode_payload::<AccessClaims>(&response.access_token) {
                identity.roles.extend(Identity::from(access).roles);
            }
        }

        Ok(TokenGrant {
            identity,
            tokens: token_set(response, None),
        })
    }

    /// Refresh the token set; a rotated refresh token replaces the old one.
    pub async fn refresh(&self, tokens: &TokenSet) -> AppResult<TokenSet> {
        let refresh_token = tokens.refresh_token.as_deref().ok_or(AppError::Unauthorized)?;

        let response = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .await?;

        Ok(token_set(response, Some(tokens)))
    }

    /// Provider logout URL, when the provider has an end-session endpoint.
    pub fn end_session_url(&self, id_token: Option<&str>) -> Option<Url> {
        let mut url = Url::parse(self.config.end_session_endpoint.as_deref()?).ok()?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", self.config.client_id.as_str())
                .append_pair("post_logout_redirect_uri", &self.config.post_logout_redirect_uri);
            if let Some(hint) = id_token {
                query.append_pair("id_token_hint", hint);
            }
        }
        Some(url)
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> AppResult<TokenResponse> {
        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::bad_gateway(format!("Token endpoint unreachable: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::bad_gateway(format!("Token response unreadable: {}", e)))?;

        if status.is_success() {
            return serde_json::from_slice(&bytes)
                .map_err(|e| AppError::bad_gateway(format!("Malformed token response: {}", e)));
        }

        match serde_json::from_slice::<TokenErrorResponse>(&bytes) {
            // invalid_grant: expired or revoked code or refresh token
            Ok(body) if status.is_client_error() => {
                tracing::info!(
                    error = %body.error,
                    description = body.error_description.as_deref().unwrap_or(""),
                    "Token request rejected"
                );
                Err(AppError::Unauthorized)
            }
            _ => Err(AppError::bad_gateway(format!(
                "Token endpoint returned {}",
                status
            ))),
        }
    }
}

fn token_set(response: TokenResponse, previous: Option<&TokenSet>) -> TokenSet {
    let expires_in = response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
    TokenSet {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .or_else(|| previous.and_then(|t| t.refresh_token.clone())),
        id_token: response
            .id_token
            .or_else(|| previous.and_then(|t| t.id_token.clone())),
        expires_at: Utc::now() + chrono::Duration::seconds(expires_in),
    }
}

/// `BASE64URL(SHA256(verifier))` without padding.
fn pkce_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Read the claims of a token received directly from the token endpoint.
///
/// Expiry is handled through `expires_in`, so only structure is checked here.
fn decode_payload<T: DeserializeOwned>(token: &str) -> AppResult<T> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<T>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::bad_gateway(format!("Token claims unreadable: {}", e)))
}
