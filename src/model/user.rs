use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Closed role set. Role checks go through the methods below instead of
/// string comparisons scattered around handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Staff may manage the catalog and view/cancel any order.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }

    /// Only the owner may change roles or list arbitrary users by search.
    pub fn is_owner(&self) -> bool {
        matches!(self, Role::Owner)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Password-reset one-time-code, stored on the user document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetOtp {
    pub code: String,
    /// RFC3339 expiry instant
    pub expires_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub password_hash: String,
    pub role: Role,

    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub verification_last_sent_at: Option<String>,
    pub verification_resend_count: u32,

    pub reset_otp: Option<ResetOtp>,

    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Audit record written whenever an owner changes another account's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChangeLog {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub changed_by: ObjectId,
    pub from_role: Role,
    pub to_role: Role,
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Owner, Role::Admin, Role::User] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_staff_set() {
        assert!(Role::Owner.is_staff());
        assert!(Role::Admin.is_staff());
        assert!(!Role::User.is_staff());
    }

    #[test]
    fn test_owner_only() {
        assert!(Role::Owner.is_owner());
        assert!(!Role::Admin.is_owner());
        assert!(!Role::User.is_owner());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let parsed: Role = serde_json::from_str("\"owner\"").unwrap();
        assert_eq!(parsed, Role::Owner);
    }
}
