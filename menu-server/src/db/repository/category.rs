//! Category Repository

use std::sync::Arc;

use serde_json::json;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::{new_id, now_millis};

use crate::db::{BaseRepository, Collection, DocumentStore, Filter, Query, RepoError, RepoResult};

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Categories),
        }
    }

    pub async fn create(
        &self,
        restaurant_id: &str,
        data: CategoryCreate,
    ) -> RepoResult<Category> {
        let now = now_millis();
        let category = Category {
            id: new_id(),
            restaurant_id: restaurant_id.to_string(),
            name: data.name,
            name_ar: data.name_ar,
            description: data.description,
            description_ar: data.description_ar,
            image: data.image,
            sort_order: data.sort_order.unwrap_or(0),
            is_active: data.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.base.insert(&category).await
    }

    /// Active categories ordered by sort_order
    pub async fn find_active_by_restaurant(
        &self,
        restaurant_id: &str,
    ) -> RepoResult<Vec<Category>> {
        let query = Query::new()
            .filter(Filter::eq("restaurantId", restaurant_id))
            .filter(Filter::eq("isActive", true))
            .sort_asc("sortOrder");
        self.base.find(&query).await
    }

    /// All categories including inactive ones, for the admin view
    pub async fn find_all_by_restaurant(
        &self,
        restaurant_id: &str,
    ) -> RepoResult<Vec<Category>> {
        let query = Query::new()
            .filter(Filter::eq("restaurantId", restaurant_id))
            .sort_asc("sortOrder");
        self.base.find(&query).await
    }

    /// Category by id, only if it belongs to the restaurant
    pub async fn find_in_restaurant(
        &self,
        restaurant_id: &str,
        id: &str,
    ) -> RepoResult<Option<Category>> {
        let category: Option<Category> = self.base.find_by_id(id).await?;
        Ok(category.filter(|c| c.restaurant_id == restaurant_id))
    }

    pub async fn update(
        &self,
        restaurant_id: &str,
        id: &str,
        data: CategoryUpdate,
    ) -> RepoResult<Category> {
        let mut patch =
            serde_json::to_value(&data).map_err(|e| RepoError::Validation(e.to_string()))?;
        patch["updatedAt"] = json!(now_millis());
        self.base
            .update_where(id, &[Filter::eq("restaurantId", restaurant_id)], &patch)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Hard delete a category
    ///
    /// Refused with [`RepoError::InUse`] while menu items reference it.
    pub async fn delete(&self, restaurant_id: &str, id: &str) -> RepoResult<bool> {
        if self.find_in_restaurant(restaurant_id, id).await?.is_none() {
            return Ok(false);
        }

        let in_use = self
            .base
            .store()
            .count(Collection::MenuItems, &[Filter::eq("categoryId", id)])
            .await?;
        if in_use > 0 {
            return Err(RepoError::InUse(in_use));
        }

        self.base.delete(id).await
    }

    pub async fn count_by_restaurant(&self, restaurant_id: &str) -> RepoResult<u64> {
        self.base
            .count(&[Filter::eq("restaurantId", restaurant_id)])
            .await
    }
}
