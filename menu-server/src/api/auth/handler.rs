//! Auth API Handlers

use std::time::{Duration, Instant};

use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{User, UserView};

use crate::auth::Identity;
use crate::auth::password::verify_password;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult, Json};

/// Failed logins take at least this long
const MIN_FAILURE_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User plus the restaurant it belongs to
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_slug: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

async fn profile(state: &ServerState, user: User) -> AppResult<UserProfile> {
    let restaurant = match user.restaurant_id.as_deref() {
        Some(id) => state.restaurants.find_by_id(id).await?,
        None => None,
    };
    Ok(UserProfile {
        user: user.into(),
        restaurant_name: restaurant.as_ref().map(|r| r.name.clone()),
        restaurant_slug: restaurant.map(|r| r.slug),
    })
}

/// Check credentials; every failure looks the same to the caller
async fn authenticate(state: &ServerState, req: &LoginRequest) -> AppResult<User> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::invalid_credentials());
    }

    let user = state.users.find_by_email(&req.email).await?;
    let Some(user) = user.filter(|u| verify_password(&req.password, &u.password_hash)) else {
        security_log!("login_failed", email = req.email.as_str());
        return Err(AppError::invalid_credentials());
    };

    if !user.is_active {
        security_log!("login_disabled_account", user_id = user.id.as_str());
        return Err(AppError::business_rule(
            ErrorCode::AccountDisabled,
            "Account is not active yet",
        ));
    }
    Ok(user)
}

/// POST /api/auth/login - 登录
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let started = Instant::now();

    let user = match authenticate(&state, &req).await {
        Ok(user) => user,
        Err(e) => {
            tokio::time::sleep(MIN_FAILURE_DELAY.saturating_sub(started.elapsed())).await;
            return Err(e);
        }
    };

    state.users.touch_last_login(&user.id).await?;
    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

    let user = state.users.find_by_id(&user.id).await?.unwrap_or(user);
    Ok(Json(LoginResponse {
        token,
        user: profile(&state, user).await?,
    }))
}

/// GET /api/auth/me - 当前用户
pub async fn me(
    State(state): State<ServerState>,
    identity: Identity,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .users
        .find_by_id(&identity.user_id)
        .await?
        .ok_or_else(|| AppError::business_rule(ErrorCode::UserNotFound, "User not found"))?;
    Ok(Json(profile(&state, user).await?))
}
