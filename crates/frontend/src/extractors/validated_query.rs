//! Validated query-string extractor for UI search pages.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use common::AppError;

/// Query extractor that validates the parameters before the handler runs.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value.validate().map_err(|e| {
            let message = e
                .field_errors()
                .into_iter()
                .next()
                .and_then(|(field, errors)| {
                    errors
                        .first()
                        .and_then(|error| error.message.as_ref())
                        .map(|msg| msg.to_string())
                        .or_else(|| Some(format!("invalid {}", field)))
                })
                .unwrap_or_else(|| "Validation failed".to_string());
            AppError::validation(message)
        })?;

        Ok(ValidatedQuery(value))
    }
}
