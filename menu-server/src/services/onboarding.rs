//! 餐厅开通
//!
//! 自助注册与超级管理员创建共用：生成 slug、创建餐厅和店主账号。

use shared::error::ErrorCode;
use shared::models::{ContactInfo, Restaurant, RestaurantSettings, Role, Theme, User};
use shared::util::{is_valid_slug, new_id, now_millis, slugify};

use crate::auth::password::hash_password;
use crate::db::RepoError;
use crate::db::repository::{RestaurantRepository, UserRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, normalize_email, validate_email,
    validate_optional_text, validate_password, validate_required_text,
};
use crate::{AppError, AppResult};

/// Slugs that collide with platform paths or subdomains
pub const RESERVED_SLUGS: &[&str] = &[
    "www",
    "api",
    "admin",
    "settings",
    "register",
    "menu",
    "dashboard",
    "super-admin",
    "static",
    "health",
];

#[derive(Debug, Clone)]
pub struct NewOwner {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub name_ar: Option<String>,
    pub description: Option<String>,
    /// Explicit slug; derived from `name` when absent
    pub slug: Option<String>,
    pub contact: ContactInfo,
    pub owner: Option<NewOwner>,
    /// Approved immediately (super-admin) or pending approval (self-service)
    pub active: bool,
}

/// Resolve and check the slug for a new restaurant
pub fn derive_slug(name: &str, explicit: Option<&str>) -> AppResult<String> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_ascii_lowercase(),
        None => slugify(name),
    };
    if !is_valid_slug(&slug) || RESERVED_SLUGS.contains(&slug.as_str()) {
        return Err(AppError::business_rule(
            ErrorCode::InvalidSlug,
            format!("'{slug}' cannot be used as a restaurant address"),
        )
        .with_detail("slug", slug));
    }
    Ok(slug)
}

fn slug_taken(slug: &str) -> AppError {
    AppError::business_rule(ErrorCode::SlugAlreadyExists, "Restaurant address already taken")
        .with_detail("slug", slug)
}

fn email_taken() -> AppError {
    AppError::business_rule(ErrorCode::EmailAlreadyExists, "Email already registered")
}

/// Create a restaurant and, optionally, its owner account
pub async fn create_restaurant(
    restaurants: &RestaurantRepository,
    users: &UserRepository,
    input: NewRestaurant,
) -> AppResult<(Restaurant, Option<User>)> {
    validate_required_text(&input.name, "restaurantName", MAX_NAME_LEN)?;
    validate_optional_text(&input.name_ar, "nameAr", MAX_NAME_LEN)?;
    validate_optional_text(&input.description, "description", MAX_NOTE_LEN)?;
    validate_email(&input.contact.email)?;
    validate_required_text(&input.contact.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    let slug = derive_slug(&input.name, input.slug.as_deref())?;

    let owner_hash = match &input.owner {
        Some(owner) => {
            validate_required_text(&owner.name, "ownerName", MAX_NAME_LEN)?;
            validate_email(&owner.email)?;
            validate_password(&owner.password)?;
            if users.find_by_email(&owner.email).await?.is_some() {
                return Err(email_taken());
            }
            Some(
                hash_password(&owner.password)
                    .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?,
            )
        }
        None => None,
    };

    if restaurants.find_by_slug(&slug).await?.is_some() {
        return Err(slug_taken(&slug));
    }

    let now = now_millis();
    let settings = RestaurantSettings {
        is_active: input.active,
        accept_orders: input.active,
        ..RestaurantSettings::default()
    };
    let restaurant = Restaurant {
        id: new_id(),
        slug: slug.clone(),
        name: input.name.trim().to_string(),
        name_ar: input.name_ar,
        description: input.description,
        logo: None,
        contact: ContactInfo {
            email: normalize_email(&input.contact.email),
            ..input.contact
        },
        settings,
        theme: Theme::default(),
        owner_id: None,
        created_at: now,
        updated_at: now,
    };
    let restaurant = restaurants.create(restaurant).await.map_err(|e| match e {
        RepoError::Duplicate(_) => slug_taken(&slug),
        other => other.into(),
    })?;

    let (Some(owner), Some(password_hash)) = (input.owner, owner_hash) else {
        tracing::info!(
            restaurant_id = %restaurant.id,
            slug = %restaurant.slug,
            "Restaurant created"
        );
        return Ok((restaurant, None));
    };

    let user = User {
        id: new_id(),
        email: normalize_email(&owner.email),
        password_hash,
        name: owner.name.trim().to_string(),
        phone: owner.phone,
        role: Role::RestaurantAdmin,
        restaurant_id: Some(restaurant.id.clone()),
        permissions: Role::RestaurantAdmin.default_permissions(),
        is_active: input.active,
        last_login: None,
        created_at: now,
        updated_at: now,
    };
    let user = match users.create(user).await {
        Ok(user) => user,
        Err(e) => {
            // roll back the restaurant so the slug is released
            if let Err(cleanup) = restaurants.delete(&restaurant.id).await {
                tracing::error!(
                    restaurant_id = %restaurant.id,
                    error = %cleanup,
                    "Failed to roll back restaurant"
                );
            }
            return Err(match e {
                RepoError::Duplicate(_) => email_taken(),
                other => other.into(),
            });
        }
    };

    let restaurant = restaurants.set_owner(&restaurant.id, &user.id).await?;
    tracing::info!(
        restaurant_id = %restaurant.id,
        slug = %restaurant.slug,
        owner_id = %user.id,
        active = input.active,
        "Restaurant registered"
    );
    Ok((restaurant, Some(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_slug() {
        assert_eq!(derive_slug("Asala Restaurant", None).unwrap(), "asala-restaurant");
        assert_eq!(derive_slug("ignored", Some("Burger-Hub")).unwrap(), "burger-hub");
    }

    #[test]
    fn test_reserved_and_invalid_slugs() {
        let cases = [
            ("x", Some("admin")),
            ("Settings", None),
            ("مطعم", None),
            ("ab", None),
        ];
        for (name, slug) in cases {
            assert_eq!(
                derive_slug(name, slug).unwrap_err().code,
                ErrorCode::InvalidSlug,
                "{name} {slug:?}"
            );
        }
    }
}
