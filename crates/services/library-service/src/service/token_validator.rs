//! Bearer token validation.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use common::{AppError, AppResult, JwtConfig};
use domain::{AccessClaims, Identity};

/// Verifies access tokens issued by the identity provider.
///
/// RS256 with the configured public key when present, otherwise HS256 with
/// the shared secret.
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(config: &JwtConfig) -> AppResult<Self> {
        let (key, algorithm) = match &config.public_key_pem {
            Some(pem) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
            None if !config.secret.is_empty() => (
                DecodingKey::from_secret(config.secret.as_bytes()),
                Algorithm::HS256,
            ),
            None => {
                return Err(AppError::internal(
                    "No token verification key configured",
                ))
            }
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self { key, validation })
    }

    /// Validate the token and resolve the caller's identity and roles.
    pub fn validate(&self, token: &str) -> AppResult<Identity> {
        let data = decode::<AccessClaims>(token, &self.key, &self.validation)?;
        Ok(Identity::from(data.claims))
    }
}
