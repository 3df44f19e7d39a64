//! Restaurant / Menu Directory
//!
//! Read-only lookups behind the public storefront. Results are scoped to one
//! restaurant and ordered by `sortOrder`, ties in creation order.

use serde::Serialize;
use shared::models::{Category, MenuItem, Restaurant};

use crate::AppResult;
use crate::db::repository::{CategoryRepository, MenuItemRepository, RestaurantRepository};

/// Everything the menu page renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPage {
    pub restaurant: Restaurant,
    pub categories: Vec<Category>,
    pub menu_items: Vec<MenuItem>,
}

#[derive(Clone)]
pub struct DirectoryService {
    restaurants: RestaurantRepository,
    categories: CategoryRepository,
    menu_items: MenuItemRepository,
}

impl DirectoryService {
    pub fn new(
        restaurants: RestaurantRepository,
        categories: CategoryRepository,
        menu_items: MenuItemRepository,
    ) -> Self {
        Self {
            restaurants,
            categories,
            menu_items,
        }
    }

    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Restaurant>> {
        Ok(self.restaurants.find_by_slug(slug).await?)
    }

    /// Active categories of the restaurant
    pub async fn find_categories_by_restaurant(
        &self,
        restaurant_id: &str,
    ) -> AppResult<Vec<Category>> {
        Ok(self
            .categories
            .find_active_by_restaurant(restaurant_id)
            .await?)
    }

    /// Available menu items of the restaurant, optionally in one category
    pub async fn find_menu_items_by_restaurant(
        &self,
        restaurant_id: &str,
        category_id: Option<&str>,
    ) -> AppResult<Vec<MenuItem>> {
        Ok(self
            .menu_items
            .find_available_by_restaurant(restaurant_id, category_id)
            .await?)
    }

    /// Restaurant plus its visible menu, `None` for an unknown slug
    pub async fn menu_page(&self, slug: &str) -> AppResult<Option<MenuPage>> {
        let Some(restaurant) = self.find_by_slug(slug).await? else {
            return Ok(None);
        };
        let (categories, menu_items) = tokio::try_join!(
            self.find_categories_by_restaurant(&restaurant.id),
            self.find_menu_items_by_restaurant(&restaurant.id, None),
        )?;
        Ok(Some(MenuPage {
            restaurant,
            categories,
            menu_items,
        }))
    }
}
