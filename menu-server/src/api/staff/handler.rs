//! Staff API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{Role, User, UserView};
use shared::util::{new_id, now_millis};

use crate::auth::Identity;
use crate::auth::password::hash_password;
use crate::core::ServerState;
use crate::db::RepoError;
use crate::db::repository::UserPatch;
use crate::security_log;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, normalize_email, validate_email, validate_optional_text,
    validate_password, validate_required_text,
};
use crate::utils::{AppError, AppResult, Json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    /// New password, hashed before storage
    pub password: Option<String>,
}

fn user_not_found(id: &str) -> AppError {
    AppError::business_rule(ErrorCode::UserNotFound, "User not found").with_detail("id", id)
}

/// Only restaurant roles can be handed out here
fn check_staff_role(role: Role) -> AppResult<Role> {
    if !role.requires_restaurant() {
        return Err(AppError::validation(format!(
            "role must be restaurant_admin or restaurant_staff, got {role}"
        ))
        .with_detail("field", "role"));
    }
    Ok(role)
}

fn hash(password: &str) -> AppResult<String> {
    validate_password(password)?;
    hash_password(password).map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// GET /api/staff - 本餐厅账号列表
pub async fn list(
    State(state): State<ServerState>,
    identity: Identity,
) -> AppResult<Json<Vec<UserView>>> {
    let restaurant_id = identity.tenant_id()?;
    let users = state.users.find_by_restaurant(restaurant_id).await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// GET /api/staff/{id} - 获取账号
pub async fn get_by_id(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
) -> AppResult<Json<UserView>> {
    let restaurant_id = identity.tenant_id()?;
    let user = state
        .users
        .find_in_restaurant(restaurant_id, &id)
        .await?
        .ok_or_else(|| user_not_found(&id))?;
    Ok(Json(user.into()))
}

/// POST /api/staff - 创建账号
pub async fn create(
    State(state): State<ServerState>,
    identity: Identity,
    Json(payload): Json<StaffCreate>,
) -> AppResult<(StatusCode, Json<UserView>)> {
    let restaurant_id = identity.tenant_id()?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    let role = check_staff_role(payload.role.unwrap_or(Role::RestaurantStaff))?;
    let password_hash = hash(&payload.password)?;

    let email = normalize_email(&payload.email);
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::business_rule(
            ErrorCode::EmailAlreadyExists,
            "Email already registered",
        ));
    }

    let now = now_millis();
    let user = User {
        id: new_id(),
        email,
        password_hash,
        name: payload.name.trim().to_string(),
        phone: payload.phone.filter(|p| !p.trim().is_empty()),
        role,
        restaurant_id: Some(restaurant_id.to_string()),
        permissions: role.default_permissions(),
        is_active: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    };

    let user = state.users.create(user).await.map_err(|e| match e {
        RepoError::Duplicate(_) => {
            AppError::business_rule(ErrorCode::EmailAlreadyExists, "Email already registered")
        }
        other => other.into(),
    })?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        restaurant_id = %restaurant_id,
        created_by = %identity.user_id,
        "Staff account created"
    );
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/staff/{id} - 更新账号
pub async fn update(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(payload): Json<StaffUpdate>,
) -> AppResult<Json<UserView>> {
    let restaurant_id = identity.tenant_id()?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;

    if id == identity.user_id && (payload.role.is_some() || payload.is_active == Some(false)) {
        return Err(AppError::permission_denied(
            "Cannot change your own role or deactivate yourself",
        ));
    }

    let role = payload.role.map(check_staff_role).transpose()?;
    let patch = UserPatch {
        name: payload.name.map(|n| n.trim().to_string()),
        phone: payload.phone,
        role,
        permissions: role.map(|r| r.default_permissions()),
        is_active: payload.is_active,
        password_hash: payload.password.as_deref().map(hash).transpose()?,
    };

    let user = state
        .users
        .update(restaurant_id, &id, patch)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => user_not_found(&id),
            other => other.into(),
        })?;
    Ok(Json(user.into()))
}

/// DELETE /api/staff/{id} - 删除账号 (不能删除自己)
pub async fn delete(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let restaurant_id = identity.tenant_id()?;
    if id == identity.user_id {
        security_log!("self_delete_attempt", user_id = identity.user_id.as_str());
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }
    if !state.users.delete(restaurant_id, &id).await? {
        return Err(user_not_found(&id));
    }
    tracing::info!(user_id = %id, deleted_by = %identity.user_id, "Staff account deleted");
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_roles() {
        assert_eq!(
            check_staff_role(Role::RestaurantStaff).unwrap(),
            Role::RestaurantStaff
        );
        assert!(check_staff_role(Role::RestaurantAdmin).is_ok());
        assert_eq!(
            check_staff_role(Role::SuperAdmin).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_create_payload_ignores_restaurant_id() {
        let payload: StaffCreate = serde_json::from_value(serde_json::json!({
            "name": "Sara",
            "email": "sara@asala.test",
            "password": "longenough",
            "role": "restaurant_staff",
            "restaurantId": "other"
        }))
        .unwrap();
        assert_eq!(payload.role, Some(Role::RestaurantStaff));
    }
}
