//! Restaurant Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Restaurant entity (one tenant)
///
/// `slug` is the subdomain / URL key. It is unique and never changes after
/// registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub contact: ContactInfo,
    pub settings: RestaurantSettings,
    #[serde(default)]
    pub theme: Theme,
    /// Registering owner (restaurant_admin user id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Restaurant {
    /// Whether customers may place orders right now
    pub fn is_open_for_orders(&self) -> bool {
        self.settings.is_active && self.settings.accept_orders
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

/// Operational switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantSettings {
    /// Set by a super-admin on approval; owners cannot change it
    pub is_active: bool,
    pub accept_orders: bool,
    #[serde(default)]
    pub delivery_enabled: bool,
    #[serde(default = "super::default_true")]
    pub pickup_enabled: bool,
    /// Keyed by lowercase weekday name
    #[serde(default)]
    pub operating_hours: BTreeMap<String, OperatingHours>,
}

impl Default for RestaurantSettings {
    /// Pending-approval defaults applied at registration
    fn default() -> Self {
        Self {
            is_active: false,
            accept_orders: false,
            delivery_enabled: false,
            pickup_enabled: true,
            operating_hours: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    pub open: String,
    pub close: String,
    #[serde(default = "super::default_true")]
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#000000".to_string(),
            secondary_color: "#ffffff".to_string(),
            font_family: "Arial".to_string(),
        }
    }
}

/// Owner-editable restaurant fields (merge patch)
///
/// `slug` and `settings.isActive` are deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsUpdate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_orders: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<BTreeMap<String, OperatingHours>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let json = serde_json::json!({
            "id": "r1",
            "slug": "asala",
            "name": "Asala",
            "contact": { "email": "owner@asala.test", "phone": "123" },
            "settings": { "isActive": true, "acceptOrders": false },
            "createdAt": 1,
            "updatedAt": 1
        });
        let r: Restaurant = serde_json::from_value(json).unwrap();
        assert!(r.settings.pickup_enabled);
        assert!(!r.settings.delivery_enabled);
        assert_eq!(r.theme, Theme::default());
        assert!(!r.is_open_for_orders());
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_value(RestaurantSettings::default()).unwrap();
        assert_eq!(json["isActive"], false);
        assert_eq!(json["acceptOrders"], false);
        assert_eq!(json["pickupEnabled"], true);
    }

    #[test]
    fn test_update_ignores_active_flag() {
        let update: RestaurantUpdate = serde_json::from_value(serde_json::json!({
            "name": "New",
            "slug": "hijack",
            "settings": { "isActive": true, "acceptOrders": true }
        }))
        .unwrap();
        let patch = serde_json::to_value(&update).unwrap();
        assert_eq!(
            patch,
            serde_json::json!({ "name": "New", "settings": { "acceptOrders": true } })
        );
    }
}
