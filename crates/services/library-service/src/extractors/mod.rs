//! Custom request extractors.
//!
//! Rejections become `AppError::Validation`, so malformed input gets the
//! same `{"error":{...}}` body as every other failure.

mod validated_json;
mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;

use validator::ValidationErrors;

/// Message of the first failed rule.
fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .next()
        .and_then(|errors| errors.first())
        .and_then(|error| error.message.as_ref())
        .map(|msg| msg.to_string())
        .unwrap_or_else(|| "Validation failed".to_string())
}
