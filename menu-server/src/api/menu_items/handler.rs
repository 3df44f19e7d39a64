//! Menu Item API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate, OptionGroup};

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::RepoError;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult, Json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category_id: Option<String>,
}

fn menu_item_not_found(id: &str) -> AppError {
    AppError::business_rule(ErrorCode::MenuItemNotFound, "Menu item not found")
        .with_detail("id", id)
}

/// The category must exist inside the caller's restaurant
async fn ensure_category(
    state: &ServerState,
    restaurant_id: &str,
    category_id: &str,
) -> AppResult<()> {
    validate_required_text(category_id, "categoryId", MAX_SHORT_TEXT_LEN)?;
    if state
        .categories
        .find_in_restaurant(restaurant_id, category_id)
        .await?
        .is_none()
    {
        return Err(
            AppError::business_rule(ErrorCode::CategoryNotFound, "Category not found")
                .with_detail("categoryId", category_id),
        );
    }
    Ok(())
}

fn validate_options(groups: &[OptionGroup]) -> AppResult<()> {
    for group in groups {
        validate_required_text(&group.name, "options.name", MAX_SHORT_TEXT_LEN)?;
        if groups.iter().filter(|g| g.name == group.name).count() > 1 {
            return Err(AppError::business_rule(
                ErrorCode::InvalidOption,
                format!("Option group '{}' is defined twice", group.name),
            ));
        }
        for choice in &group.choices {
            validate_required_text(&choice.name, "options.choices.name", MAX_SHORT_TEXT_LEN)?;
            validate_price(choice.price, "options.choices.price")?;
        }
    }
    Ok(())
}

fn validate_list(values: &[String], field: &str) -> AppResult<()> {
    values
        .iter()
        .try_for_each(|v| validate_required_text(v, field, MAX_SHORT_TEXT_LEN))
}

/// GET /api/menu-items - 获取所有菜品 (`?categoryId=`)
pub async fn list(
    State(state): State<ServerState>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let restaurant_id = identity.tenant_id()?;
    let category = query.category_id.as_deref().filter(|c| !c.is_empty());
    let items = state
        .menu_items
        .find_all_by_restaurant(restaurant_id, category)
        .await?;
    Ok(Json(items))
}

/// GET /api/menu-items/{id} - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let restaurant_id = identity.tenant_id()?;
    let item = state
        .menu_items
        .find_in_restaurant(restaurant_id, &id)
        .await?
        .ok_or_else(|| menu_item_not_found(&id))?;
    Ok(Json(item))
}

/// POST /api/menu-items - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    identity: Identity,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    let restaurant_id = identity.tenant_id()?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.name_ar, "nameAr", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.description_ar, "descriptionAr", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_price(payload.price, "price")?;
    validate_list(&payload.ingredients, "ingredients")?;
    validate_list(&payload.allergens, "allergens")?;
    validate_options(&payload.options)?;
    ensure_category(&state, restaurant_id, &payload.category_id).await?;

    let item = state.menu_items.create(restaurant_id, payload).await?;
    tracing::info!(menu_item_id = %item.id, restaurant_id = %restaurant_id, "Menu item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu-items/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let restaurant_id = identity.tenant_id()?;
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.name_ar, "nameAr", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.description_ar, "descriptionAr", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(ingredients) = &payload.ingredients {
        validate_list(ingredients, "ingredients")?;
    }
    if let Some(allergens) = &payload.allergens {
        validate_list(allergens, "allergens")?;
    }
    if let Some(options) = &payload.options {
        validate_options(options)?;
    }
    if let Some(category_id) = &payload.category_id {
        ensure_category(&state, restaurant_id, category_id).await?;
    }

    let item = state
        .menu_items
        .update(restaurant_id, &id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => menu_item_not_found(&id),
            other => other.into(),
        })?;
    Ok(Json(item))
}

/// DELETE /api/menu-items/{id} - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let restaurant_id = identity.tenant_id()?;
    if !state.menu_items.delete(restaurant_id, &id).await? {
        return Err(menu_item_not_found(&id));
    }
    tracing::info!(menu_item_id = %id, restaurant_id = %restaurant_id, "Menu item deleted");
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OptionChoice, OptionType};

    fn group(name: &str, price: f64) -> OptionGroup {
        OptionGroup {
            name: name.to_string(),
            option_type: OptionType::Single,
            required: false,
            choices: vec![OptionChoice {
                name: "Large".to_string(),
                price,
            }],
        }
    }

    #[test]
    fn test_validate_options() {
        assert!(validate_options(&[group("Size", 3.5), group("Sauce", 0.0)]).is_ok());
        assert_eq!(
            validate_options(&[group("Size", -1.0)]).unwrap_err().code,
            ErrorCode::InvalidPrice
        );
        assert_eq!(
            validate_options(&[group("Size", 1.0), group("Size", 2.0)])
                .unwrap_err()
                .code,
            ErrorCode::InvalidOption
        );
        assert_eq!(
            validate_options(&[group(" ", 1.0)]).unwrap_err().code,
            ErrorCode::RequiredField
        );
    }
}
