//! Custom request extractors.

mod optional_session;
mod validated_query;

pub use optional_session::OptionalSession;
pub use validated_query::ValidatedQuery;
