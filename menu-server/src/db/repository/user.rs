//! User Repository

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use shared::models::{Role, User};
use shared::util::now_millis;

use crate::db::{BaseRepository, Collection, DocumentStore, Filter, Query, RepoError, RepoResult};

/// Partial user update (merge patch)
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Users),
        }
    }

    /// Insert a user; email is stored lowercased and must be unique
    pub async fn create(&self, mut user: User) -> RepoResult<User> {
        if user.role.requires_restaurant() != user.restaurant_id.is_some() {
            return Err(RepoError::Validation(format!(
                "role {} does not match restaurant assignment",
                user.role
            )));
        }
        user.email = user.email.trim().to_lowercase();
        self.base.insert(&user).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.base
            .find_one(vec![Filter::eq("email", email.trim().to_lowercase())])
            .await
    }

    /// Users of a restaurant, oldest first
    pub async fn find_by_restaurant(&self, restaurant_id: &str) -> RepoResult<Vec<User>> {
        let query = Query::new()
            .filter(Filter::eq("restaurantId", restaurant_id))
            .sort_asc("createdAt");
        self.base.find(&query).await
    }

    pub async fn find_in_restaurant(
        &self,
        restaurant_id: &str,
        id: &str,
    ) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.find_by_id(id).await?;
        Ok(user.filter(|u| u.restaurant_id.as_deref() == Some(restaurant_id)))
    }

    pub async fn update(&self, restaurant_id: &str, id: &str, data: UserPatch) -> RepoResult<User> {
        let mut patch =
            serde_json::to_value(&data).map_err(|e| RepoError::Validation(e.to_string()))?;
        patch["updatedAt"] = json!(now_millis());
        self.base
            .update_where(id, &[Filter::eq("restaurantId", restaurant_id)], &patch)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    pub async fn delete(&self, restaurant_id: &str, id: &str) -> RepoResult<bool> {
        if self.find_in_restaurant(restaurant_id, id).await?.is_none() {
            return Ok(false);
        }
        self.base.delete(id).await
    }

    pub async fn touch_last_login(&self, id: &str) -> RepoResult<()> {
        let now = now_millis();
        self.base
            .update_where::<User>(id, &[], &json!({ "lastLogin": now, "updatedAt": now }))
            .await?;
        Ok(())
    }

    /// Activate the restaurant's admin accounts (pending-approval flow)
    pub async fn activate_restaurant_admins(&self, restaurant_id: &str) -> RepoResult<u64> {
        self.base
            .store()
            .update_many(
                Collection::Users,
                &[
                    Filter::eq("restaurantId", restaurant_id),
                    Filter::eq("role", Role::RestaurantAdmin.as_str()),
                ],
                json!({ "isActive": true, "updatedAt": now_millis() }),
            )
            .await
    }

    pub async fn count(&self, filters: &[Filter]) -> RepoResult<u64> {
        self.base.count(filters).await
    }
}
