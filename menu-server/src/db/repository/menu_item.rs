//! Menu Item Repository

use std::sync::Arc;

use serde_json::json;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::util::{new_id, now_millis};

use crate::db::{BaseRepository, Collection, DocumentStore, Filter, Query, RepoError, RepoResult};

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::MenuItems),
        }
    }

    pub async fn create(
        &self,
        restaurant_id: &str,
        data: MenuItemCreate,
    ) -> RepoResult<MenuItem> {
        let now = now_millis();
        let item = MenuItem {
            id: new_id(),
            restaurant_id: restaurant_id.to_string(),
            category_id: data.category_id,
            name: data.name,
            name_ar: data.name_ar,
            description: data.description,
            description_ar: data.description_ar,
            price: data.price,
            image: data.image,
            ingredients: data.ingredients,
            allergens: data.allergens,
            options: data.options,
            is_available: data.is_available.unwrap_or(true),
            is_popular: data.is_popular.unwrap_or(false),
            sort_order: data.sort_order.unwrap_or(0),
            preparation_time: data.preparation_time,
            created_at: now,
            updated_at: now,
        };
        self.base.insert(&item).await
    }

    fn restaurant_query(restaurant_id: &str, category_id: Option<&str>) -> Query {
        let mut query = Query::new().filter(Filter::eq("restaurantId", restaurant_id));
        if let Some(category_id) = category_id {
            query = query.filter(Filter::eq("categoryId", category_id));
        }
        query
    }

    /// Available items ordered by sort_order, optionally within one category
    pub async fn find_available_by_restaurant(
        &self,
        restaurant_id: &str,
        category_id: Option<&str>,
    ) -> RepoResult<Vec<MenuItem>> {
        let query = Self::restaurant_query(restaurant_id, category_id)
            .filter(Filter::eq("isAvailable", true))
            .sort_asc("sortOrder");
        self.base.find(&query).await
    }

    /// All items including unavailable ones, for the admin view
    pub async fn find_all_by_restaurant(
        &self,
        restaurant_id: &str,
        category_id: Option<&str>,
    ) -> RepoResult<Vec<MenuItem>> {
        let query = Self::restaurant_query(restaurant_id, category_id).sort_asc("sortOrder");
        self.base.find(&query).await
    }

    /// Batch lookup; ids that do not exist are simply absent from the result
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<MenuItem>> {
        let query = Query::new().filter(Filter::is_in("id", ids.iter().cloned()));
        self.base.find(&query).await
    }

    pub async fn find_in_restaurant(
        &self,
        restaurant_id: &str,
        id: &str,
    ) -> RepoResult<Option<MenuItem>> {
        let item: Option<MenuItem> = self.base.find_by_id(id).await?;
        Ok(item.filter(|i| i.restaurant_id == restaurant_id))
    }

    pub async fn update(
        &self,
        restaurant_id: &str,
        id: &str,
        data: MenuItemUpdate,
    ) -> RepoResult<MenuItem> {
        let mut patch =
            serde_json::to_value(&data).map_err(|e| RepoError::Validation(e.to_string()))?;
        patch["updatedAt"] = json!(now_millis());
        self.base
            .update_where(id, &[Filter::eq("restaurantId", restaurant_id)], &patch)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    pub async fn delete(&self, restaurant_id: &str, id: &str) -> RepoResult<bool> {
        if self.find_in_restaurant(restaurant_id, id).await?.is_none() {
            return Ok(false);
        }
        self.base.delete(id).await
    }

    pub async fn count_by_restaurant(&self, restaurant_id: &str) -> RepoResult<u64> {
        self.base
            .count(&[Filter::eq("restaurantId", restaurant_id)])
            .await
    }
}
