//! User/session entities.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::status::UserRole;

/// A signed-in user.
///
/// Read-only from the store's perspective; authentication flows live
/// elsewhere and hand a `User` to the store for session display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Permission role.
    #[serde(default)]
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults_to_standard() {
        let json = r#"{ "id": 1, "name": "Alex Reed", "email": "alex@example.com" }"#;
        let user: User = serde_json::from_str(json).expect("deserialize");
        assert_eq!(user.role, UserRole::Standard);
    }
}
