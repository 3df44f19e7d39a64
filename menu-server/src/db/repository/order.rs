//! Order Repository

use std::sync::Arc;

use serde_json::json;
use shared::models::{Order, OrderStatus};

use crate::db::{BaseRepository, Collection, DocumentStore, Filter, Query, RepoResult};

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Orders),
        }
    }

    /// Insert a priced order; a taken order number yields `Duplicate("orderNumber")`
    pub async fn create(&self, order: &Order) -> RepoResult<Order> {
        self.base.insert(order).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        self.base.find_by_id(id).await
    }

    /// Restaurant orders, newest first
    pub async fn find_by_restaurant(
        &self,
        restaurant_id: &str,
        status: Option<OrderStatus>,
        limit: usize,
    ) -> RepoResult<Vec<Order>> {
        let mut query = Query::new().filter(Filter::eq("restaurantId", restaurant_id));
        if let Some(status) = status {
            query = query.filter(Filter::eq("status", status.as_str()));
        }
        self.base
            .find(&query.sort_desc("createdAt").limit(limit))
            .await
    }

    pub async fn find_all_by_restaurant(&self, restaurant_id: &str) -> RepoResult<Vec<Order>> {
        let query = Query::new().filter(Filter::eq("restaurantId", restaurant_id));
        self.base.find(&query).await
    }

    /// Every order on the platform (super-admin statistics)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        self.base.find(&Query::new()).await
    }

    /// Compare-and-set on `status`
    ///
    /// Returns `None` when the order no longer has status `from`.
    pub async fn transition(
        &self,
        id: &str,
        from: OrderStatus,
        to: OrderStatus,
        now: i64,
    ) -> RepoResult<Option<Order>> {
        self.base
            .update_where(
                id,
                &[Filter::eq("status", from.as_str())],
                &json!({ "status": to.as_str(), "updatedAt": now }),
            )
            .await
    }
}
