//! Library service configuration.

use std::env;

use common::{DatabaseConfig, JwtConfig};

/// Library service configuration.
#[derive(Debug, Clone)]
pub struct LibraryServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Bearer token validation settings
    pub jwt: JwtConfig,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl LibraryServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();

        Self {
            database: DatabaseConfig {
                url: env::var("LIBRARY_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(defaults.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(defaults.min_connections),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").unwrap_or_default(),
                public_key_pem: env::var("JWT_PUBLIC_KEY_PEM").ok(),
                issuer: env::var("JWT_ISSUER").ok(),
                audience: env::var("JWT_AUDIENCE").ok(),
            },
            host: env::var("LIBRARY_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("LIBRARY_SERVICE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8081),
        }
    }

    /// Reject configurations the service cannot start with.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.public_key_pem.is_none() && self.jwt.secret.is_empty() {
            return Err("Either JWT_PUBLIC_KEY_PEM or JWT_SECRET must be set".to_string());
        }
        if self.database.min_connections > self.database.max_connections {
            return Err("DATABASE_MIN_CONNECTIONS exceeds DATABASE_MAX_CONNECTIONS".to_string());
        }
        Ok(())
    }
}

impl Default for LibraryServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            host: "0.0.0.0".to_string(),
            port: 8081,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_a_verification_key() {
        let config = LibraryServiceConfig::default();
        assert!(config.validate().is_err());

        let mut config = LibraryServiceConfig::default();
        config.jwt.secret = "test-secret".to_string();
        assert!(config.validate().is_ok());
    }
}
