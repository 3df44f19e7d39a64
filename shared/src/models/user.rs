//! User Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    RestaurantAdmin,
    RestaurantStaff,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::RestaurantAdmin => "restaurant_admin",
            Role::RestaurantStaff => "restaurant_staff",
        }
    }

    /// Restaurant roles must always carry a restaurant id; super admins never do
    pub const fn requires_restaurant(&self) -> bool {
        !matches!(self, Role::SuperAdmin)
    }

    pub fn default_permissions(&self) -> Vec<String> {
        match self {
            Role::SuperAdmin | Role::RestaurantAdmin => vec!["all".to_string()],
            Role::RestaurantStaff => vec!["orders".to_string()],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "restaurant_admin" => Ok(Role::RestaurantAdmin),
            "restaurant_staff" => Ok(Role::RestaurantStaff),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// User entity as stored
///
/// Never serialize this to clients; use [`UserView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Lowercased, unique
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Client-facing projection of [`User`] without credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
    pub permissions: Vec<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<i64>,
    pub created_at: i64,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role: user.role,
            restaurant_id: user.restaurant_id,
            permissions: user.permissions,
            is_active: user.is_active,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(
            serde_json::to_string(&Role::RestaurantStaff).unwrap(),
            "\"restaurant_staff\""
        );
        assert_eq!("super_admin".parse::<Role>(), Ok(Role::SuperAdmin));
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_scope_and_permissions() {
        assert!(!Role::SuperAdmin.requires_restaurant());
        assert!(Role::RestaurantAdmin.requires_restaurant());
        assert_eq!(Role::RestaurantAdmin.default_permissions(), vec!["all"]);
        assert_eq!(Role::RestaurantStaff.default_permissions(), vec!["orders"]);
    }

    #[test]
    fn test_view_drops_password_hash() {
        let user = User {
            id: "u1".into(),
            email: "a@b.test".into(),
            password_hash: "$argon2id$secret".into(),
            name: "A".into(),
            phone: None,
            role: Role::RestaurantAdmin,
            restaurant_id: Some("r1".into()),
            permissions: vec!["all".into()],
            is_active: true,
            last_login: None,
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_value(UserView::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["restaurantId"], "r1");
    }
}
