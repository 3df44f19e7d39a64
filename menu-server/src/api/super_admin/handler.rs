//! Super Admin API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{Address, ContactInfo, Restaurant, UserView};

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::RepoError;
use crate::services::onboarding::{self, NewOwner, NewRestaurant};
use crate::services::stats::{self, PlatformStats};
use crate::utils::{AppError, AppResult, Json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCreate {
    #[serde(default)]
    pub name: String,
    pub name_ar: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    pub owner: Option<OwnerInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRestaurant {
    pub restaurant: Restaurant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserView>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub is_active: bool,
    pub accept_orders: Option<bool>,
}

/// GET /api/super-admin/restaurants - 全部餐厅
pub async fn list_restaurants(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Restaurant>>> {
    let restaurants = state.restaurants.find_all().await?;
    Ok(Json(restaurants))
}

/// POST /api/super-admin/restaurants - 创建餐厅
pub async fn create_restaurant(
    State(state): State<ServerState>,
    identity: Identity,
    Json(req): Json<RestaurantCreate>,
) -> AppResult<(StatusCode, Json<CreatedRestaurant>)> {
    let input = NewRestaurant {
        name: req.name,
        name_ar: req.name_ar,
        description: req.description,
        slug: req.slug,
        contact: ContactInfo {
            email: req.email,
            phone: req.phone,
            address: req.address,
        },
        owner: req.owner.map(|o| NewOwner {
            name: o.name,
            email: o.email,
            password: o.password,
            phone: o.phone,
        }),
        active: true,
    };

    let (restaurant, owner) =
        onboarding::create_restaurant(&state.restaurants, &state.users, input).await?;
    tracing::info!(
        restaurant_id = %restaurant.id,
        created_by = %identity.user_id,
        "Restaurant created by super admin"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedRestaurant {
            restaurant,
            owner: owner.map(UserView::from),
        }),
    ))
}

/// PUT /api/super-admin/restaurants/{id}/status - 启用/停用餐厅
///
/// 启用时同时激活该餐厅的店主账号 (审核通过)。
pub async fn set_status(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(body): Json<StatusChange>,
) -> AppResult<Json<Restaurant>> {
    let restaurant = state
        .restaurants
        .set_status(&id, body.is_active, body.accept_orders)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => {
                AppError::business_rule(ErrorCode::RestaurantNotFound, "Restaurant not found")
            }
            other => other.into(),
        })?;

    if body.is_active {
        let activated = state.users.activate_restaurant_admins(&id).await?;
        tracing::info!(restaurant_id = %id, activated, "Restaurant admins activated");
    }

    tracing::info!(
        restaurant_id = %id,
        is_active = body.is_active,
        accept_orders = restaurant.settings.accept_orders,
        changed_by = %identity.user_id,
        "Restaurant status changed"
    );
    Ok(Json(restaurant))
}

/// GET /api/super-admin/stats - 平台统计
pub async fn get_stats(State(state): State<ServerState>) -> AppResult<Json<PlatformStats>> {
    let stats = stats::platform_stats(&state.restaurants, &state.users, &state.orders).await?;
    Ok(Json(stats))
}
