//! Category API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use shared::error::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::RepoError;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, Json};

fn category_not_found(id: &str) -> AppError {
    AppError::business_rule(ErrorCode::CategoryNotFound, "Category not found")
        .with_detail("id", id)
}

fn map_repo_error(id: &str, err: RepoError) -> AppError {
    match err {
        RepoError::NotFound(_) => category_not_found(id),
        RepoError::InUse(count) => AppError::business_rule(
            ErrorCode::CategoryHasMenuItems,
            "Category still has menu items",
        )
        .with_detail("menuItems", count),
        other => other.into(),
    }
}

fn validate_text_fields(
    name_ar: &Option<String>,
    description: &Option<String>,
    description_ar: &Option<String>,
    image: &Option<String>,
) -> AppResult<()> {
    validate_optional_text(name_ar, "nameAr", MAX_NAME_LEN)?;
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(description_ar, "descriptionAr", MAX_NOTE_LEN)?;
    validate_optional_text(image, "image", MAX_URL_LEN)?;
    Ok(())
}

/// GET /api/categories - 获取所有分类 (含停用)
pub async fn list(
    State(state): State<ServerState>,
    identity: Identity,
) -> AppResult<Json<Vec<Category>>> {
    let restaurant_id = identity.tenant_id()?;
    let categories = state.categories.find_all_by_restaurant(restaurant_id).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let restaurant_id = identity.tenant_id()?;
    let category = state
        .categories
        .find_in_restaurant(restaurant_id, &id)
        .await?
        .ok_or_else(|| category_not_found(&id))?;
    Ok(Json(category))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    identity: Identity,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let restaurant_id = identity.tenant_id()?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_text_fields(
        &payload.name_ar,
        &payload.description,
        &payload.description_ar,
        &payload.image,
    )?;

    let category = state.categories.create(restaurant_id, payload).await?;
    tracing::info!(category_id = %category.id, restaurant_id = %restaurant_id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let restaurant_id = identity.tenant_id()?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_text_fields(
        &payload.name_ar,
        &payload.description,
        &payload.description_ar,
        &payload.image,
    )?;

    let category = state
        .categories
        .update(restaurant_id, &id, payload)
        .await
        .map_err(|e| map_repo_error(&id, e))?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - 删除分类 (仍有菜品时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let restaurant_id = identity.tenant_id()?;
    let deleted = state
        .categories
        .delete(restaurant_id, &id)
        .await
        .map_err(|e| map_repo_error(&id, e))?;
    if !deleted {
        return Err(category_not_found(&id));
    }
    tracing::info!(category_id = %id, restaurant_id = %restaurant_id, "Category deleted");
    Ok(Json(true))
}
