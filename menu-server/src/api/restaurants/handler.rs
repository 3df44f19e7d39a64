//! Restaurant API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{
    Address, Category, ContactInfo, MenuItem, Restaurant, RestaurantUpdate, UserView,
};

use crate::auth::Identity;
use crate::core::ServerState;
use crate::services::MenuPage;
use crate::services::onboarding::{self, NewOwner, NewRestaurant};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_email, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, Json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub restaurant_name: String,
    pub name_ar: Option<String>,
    pub description: Option<String>,
    /// Optional explicit address; derived from the name otherwise
    pub slug: Option<String>,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub restaurant: Restaurant,
    pub user: UserView,
}

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    /// Category id
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub menu_items: Vec<MenuItem>,
}

fn restaurant_not_found() -> AppError {
    AppError::business_rule(ErrorCode::RestaurantNotFound, "Restaurant not found")
}

async fn restaurant_by_slug(state: &ServerState, slug: &str) -> AppResult<Restaurant> {
    state
        .directory
        .find_by_slug(slug)
        .await?
        .ok_or_else(restaurant_not_found)
}

/// POST /api/restaurants/register - 注册餐厅 (待超级管理员审核)
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let input = NewRestaurant {
        name: req.restaurant_name,
        name_ar: req.name_ar,
        description: req.description,
        slug: req.slug,
        contact: ContactInfo {
            email: req.email.clone(),
            phone: req.phone.clone(),
            address: req.address,
        },
        owner: Some(NewOwner {
            name: req.owner_name,
            email: req.email,
            password: req.password,
            phone: Some(req.phone).filter(|p| !p.trim().is_empty()),
        }),
        active: false,
    };

    let (restaurant, user) =
        onboarding::create_restaurant(&state.restaurants, &state.users, input).await?;
    let user = user.ok_or_else(|| AppError::internal("Owner account was not created"))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration received, pending approval".to_string(),
            restaurant,
            user: user.into(),
        }),
    ))
}

/// GET /api/restaurants/{slug} - 餐厅、分类和菜单
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<MenuPage>> {
    let page = state
        .directory
        .menu_page(&slug)
        .await?
        .ok_or_else(restaurant_not_found)?;
    Ok(Json(page))
}

/// GET /api/restaurants/{slug}/categories - 启用的分类
pub async fn list_categories(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<CategoriesResponse>> {
    let restaurant = restaurant_by_slug(&state, &slug).await?;
    let categories = state
        .directory
        .find_categories_by_restaurant(&restaurant.id)
        .await?;
    Ok(Json(CategoriesResponse { categories }))
}

/// GET /api/restaurants/{slug}/menu - 可售菜品
pub async fn list_menu(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<MenuResponse>> {
    let restaurant = restaurant_by_slug(&state, &slug).await?;
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let menu_items = state
        .directory
        .find_menu_items_by_restaurant(&restaurant.id, category)
        .await?;
    Ok(Json(MenuResponse { menu_items }))
}

/// GET /api/restaurants/settings - 当前餐厅设置
pub async fn get_settings(
    State(state): State<ServerState>,
    identity: Identity,
) -> AppResult<Json<Restaurant>> {
    let restaurant_id = identity.tenant_id()?;
    let restaurant = state
        .restaurants
        .find_by_id(restaurant_id)
        .await?
        .ok_or_else(restaurant_not_found)?;
    Ok(Json(restaurant))
}

/// PUT /api/restaurants/settings - 更新餐厅设置
///
/// `slug` 与 `isActive` 不可由店主修改 (请求中的这些字段会被忽略)。
pub async fn update_settings(
    State(state): State<ServerState>,
    identity: Identity,
    Json(payload): Json<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    let restaurant_id = identity.tenant_id()?;

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.name_ar, "nameAr", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.logo, "logo", MAX_URL_LEN)?;
    if let Some(contact) = &payload.contact {
        validate_email(&contact.email)?;
    }

    let restaurant = state.restaurants.update(restaurant_id, payload).await?;
    tracing::info!(restaurant_id = %restaurant.id, user_id = %identity.user_id, "Restaurant settings updated");
    Ok(Json(restaurant))
}
