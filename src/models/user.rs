use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
}

impl UserRole {
    /// Resolve the `role` field of an `admins/{uid}` record.
    ///
    /// Anything other than `admin` or `editor` degrades to `Editor`.
    pub fn from_record(role: Option<&str>) -> Self {
        match role {
            Some("admin") => Self::Admin,
            _ => Self::Editor,
        }
    }
}

/// Signed-in console user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Both roles may use the admin console
    pub fn can_administer(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Editor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_fallback() {
        assert_eq!(UserRole::from_record(Some("admin")), UserRole::Admin);
        assert_eq!(UserRole::from_record(Some("editor")), UserRole::Editor);
        assert_eq!(UserRole::from_record(Some("owner")), UserRole::Editor);
        assert_eq!(UserRole::from_record(None), UserRole::Editor);
    }
}
