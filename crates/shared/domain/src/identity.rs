//! Authenticated identity and the token claims it is built from.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Realm-level role list as issued in OIDC access and ID tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Claims read from an access or ID token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    #[serde(default)]
    pub preferred_username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub realm_access: Option<RealmAccess>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Typed identity with its roles resolved once, when the session or request
/// is established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Identity {
    pub fn new(user_name: impl Into<String>, roles: impl IntoIterator<Item = String>) -> Self {
        Self {
            user_name: user_name.into(),
            full_name: None,
            email: None,
            roles: roles.into_iter().collect(),
        }
    }

    /// Name to greet the user with: full name when known, else user name.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.user_name)
    }

    /// True when the identity acts on its own behalf for `user_name`.
    pub fn is(&self, user_name: &str) -> bool {
        self.user_name == user_name
    }
}

impl From<AccessClaims> for Identity {
    fn from(claims: AccessClaims) -> Self {
        let full_name = claims.name.filter(|n| !n.trim().is_empty()).or_else(|| {
            match (claims.given_name, claims.family_name) {
                (Some(given), Some(family)) => Some(format!("{} {}", given, family)),
                (Some(given), None) => Some(given),
                (None, Some(family)) => Some(family),
                (None, None) => None,
            }
        });

        Self {
            user_name: claims.preferred_username.unwrap_or(claims.sub),
            full_name,
            email: claims.email,
            roles: claims
                .realm_access
                .map(|access| access.roles.into_iter().collect())
                .unwrap_or_default(),
        }
    }
}

/// Authorization check used by both tiers.
pub fn has_role(identity: &Identity, role: &str) -> bool {
    identity.roles.contains(role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ROLE_LIBRARIAN;

    fn claims(json: &str) -> AccessClaims {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_roles_come_from_realm_access() {
        let identity = Identity::from(claims(
            r#"{"sub":"42","preferred_username":"librarian","exp":1,
                "realm_access":{"roles":["LIBRARIAN","offline_access"]}}"#,
        ));

        assert_eq!(identity.user_name, "librarian");
        assert!(has_role(&identity, ROLE_LIBRARIAN));
        assert!(!has_role(&identity, "ADMIN"));
    }

    #[test]
    fn test_missing_realm_access_means_no_roles() {
        let identity = Identity::from(claims(r#"{"sub":"demo_user_1","exp":1}"#));

        assert_eq!(identity.user_name, "demo_user_1");
        assert!(identity.roles.is_empty());
        assert_eq!(identity.display_name(), "demo_user_1");
    }

    #[test]
    fn test_full_name_falls_back_to_given_and_family() {
        let identity = Identity::from(claims(
            r#"{"sub":"1","preferred_username":"u","given_name":"Ada","family_name":"Lovelace","exp":1}"#,
        ));

        assert_eq!(identity.display_name(), "Ada Lovelace");
    }
}
