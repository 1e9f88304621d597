//! Frontend configuration.

use std::env;

use common::{HttpClientConfig, OidcConfig};

/// Frontend configuration.
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Library backend API client settings
    pub backend: HttpClientConfig,
    /// Identity provider settings
    pub oidc: OidcConfig,
    /// Redis URL for sessions; sessions are kept in memory when unset
    pub redis_url: Option<String>,
    /// Idle lifetime of a browser session
    pub session_ttl_seconds: u64,
    /// Lifetime of a pending login between redirect and callback
    pub login_ttl_seconds: u64,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

fn var_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn parsed_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl FrontendConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let backend = defaults.backend;
        let oidc = defaults.oidc;

        Self {
            backend: HttpClientConfig {
                base_url: var_or("LIBRARY_SERVICE_URL", backend.base_url),
                connect_timeout_ms: parsed_or(
                    "LIBRARY_SERVICE_CONNECT_TIMEOUT_MS",
                    backend.connect_timeout_ms,
                ),
                request_timeout_ms: parsed_or(
                    "LIBRARY_SERVICE_REQUEST_TIMEOUT_MS",
                    backend.request_timeout_ms,
                ),
            },
            oidc: OidcConfig {
                authorization_endpoint: var_or(
                    "OIDC_AUTHORIZATION_ENDPOINT",
                    oidc.authorization_endpoint,
                ),
                token_endpoint: var_or("OIDC_TOKEN_ENDPOINT", oidc.token_endpoint),
                end_session_endpoint: match env::var("OIDC_END_SESSION_ENDPOINT") {
                    Ok(url) if url.trim().is_empty() => None,
                    Ok(url) => Some(url),
                    Err(_) => oidc.end_session_endpoint,
                },
                client_id: var_or("OIDC_CLIENT_ID", oidc.client_id),
                client_secret: var_or("OIDC_CLIENT_SECRET", oidc.client_secret),
                redirect_uri: var_or("OIDC_REDIRECT_URI", oidc.redirect_uri),
                post_logout_redirect_uri: var_or(
                    "OIDC_POST_LOGOUT_REDIRECT_URI",
                    oidc.post_logout_redirect_uri,
                ),
                scopes: env::var("OIDC_SCOPES")
                    .map(|s| s.split_whitespace().map(str::to_string).collect())
                    .unwrap_or(oidc.scopes),
            },
            redis_url: env::var("REDIS_URL").ok().filter(|u| !u.trim().is_empty()),
            session_ttl_seconds: parsed_or("SESSION_TTL_SECONDS", defaults.session_ttl_seconds),
            login_ttl_seconds: parsed_or("LOGIN_TTL_SECONDS", defaults.login_ttl_seconds),
            secure_cookies: parsed_or("SECURE_COOKIES", defaults.secure_cookies),
            host: var_or("FRONTEND_HOST", defaults.host),
            port: parsed_or("FRONTEND_PORT", defaults.port),
        }
    }

    /// Reject configurations the frontend cannot start with.
    pub fn validate(&self) -> Result<(), String> {
        if self.oidc.client_id.trim().is_empty() {
            return Err("OIDC_CLIENT_ID must be set".to_string());
        }
        if !self.oidc.scopes.iter().any(|s| s == "openid") {
            return Err("OIDC_SCOPES must include openid".to_string());
        }
        for (name, url) in [
            ("LIBRARY_SERVICE_URL", &self.backend.base_url),
            ("OIDC_AUTHORIZATION_ENDPOINT", &self.oidc.authorization_endpoint),
            ("OIDC_TOKEN_ENDPOINT", &self.oidc.token_endpoint),
            ("OIDC_REDIRECT_URI", &self.oidc.redirect_uri),
        ] {
            url::Url::parse(url).map_err(|e| format!("{} is not a valid URL: {}", name, e))?;
        }
        if self.session_ttl_seconds == 0 {
            return Err("SESSION_TTL_SECONDS must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            backend: HttpClientConfig::default(),
            oidc: OidcConfig::default(),
            redis_url: None,
            session_ttl_seconds: 1800,
            login_ttl_seconds: 300,
            secure_cookies: false,
            host: "0.0.0.0".to_string(),
            port: 9090,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FrontendConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_scopes() {
        let mut config = FrontendConfig::default();
        config.backend.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = FrontendConfig::default();
        config.oidc.scopes = vec!["profile".to_string()];
        assert!(config.validate().is_err());
    }
}
