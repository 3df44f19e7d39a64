//! Restaurant Repository

use std::sync::Arc;

use serde_json::json;
use shared::models::{Restaurant, RestaurantUpdate};
use shared::util::now_millis;

use crate::db::{BaseRepository, Collection, DocumentStore, Filter, Query, RepoResult};

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

impl RestaurantRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Restaurants),
        }
    }

    /// Insert a fully built restaurant; a taken slug yields `Duplicate("slug")`
    pub async fn create(&self, restaurant: Restaurant) -> RepoResult<Restaurant> {
        self.base.insert(&restaurant).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        self.base.find_by_id(id).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Restaurant>> {
        self.base
            .find_one(vec![Filter::eq("slug", slug.to_lowercase())])
            .await
    }

    /// All restaurants, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Restaurant>> {
        self.base.find(&Query::new().sort_desc("createdAt")).await
    }

    pub async fn update(&self, id: &str, data: RestaurantUpdate) -> RepoResult<Restaurant> {
        let mut patch = serde_json::to_value(&data)
            .map_err(|e| crate::db::RepoError::Validation(e.to_string()))?;
        patch["updatedAt"] = json!(now_millis());
        self.base.update(id, &patch).await
    }

    /// Super-admin switch for `isActive` (and optionally `acceptOrders`)
    pub async fn set_status(
        &self,
        id: &str,
        is_active: bool,
        accept_orders: Option<bool>,
    ) -> RepoResult<Restaurant> {
        let mut settings = json!({ "isActive": is_active });
        if let Some(accept) = accept_orders {
            settings["acceptOrders"] = json!(accept);
        }
        let patch = json!({ "settings": settings, "updatedAt": now_millis() });
        self.base.update(id, &patch).await
    }

    pub async fn set_owner(&self, id: &str, owner_id: &str) -> RepoResult<Restaurant> {
        self.base
            .update(id, &json!({ "ownerId": owner_id, "updatedAt": now_millis() }))
            .await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.base.delete(id).await
    }

    pub async fn count(&self, filters: &[Filter]) -> RepoResult<u64> {
        self.base.count(filters).await
    }
}
