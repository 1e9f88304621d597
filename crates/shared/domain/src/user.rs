//! User domain entity and the user-with-loans composite.

use serde::{Deserialize, Serialize};

use crate::loan::Loan;

/// Library member, keyed by user name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique login name
    #[cfg_attr(feature = "openapi", schema(example = "demo_user_1"))]
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    /// First and last name joined by a space. Never stored.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A user together with their active loans.
///
/// Built per request by the frontend aggregation layer; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithLoans {
    pub user: User,
    pub loans: Vec<Loan>,
}

impl UserWithLoans {
    pub fn new(user: User, loans: Vec<Loan>) -> Self {
        Self { user, loans }
    }
}
