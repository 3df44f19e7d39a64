//! 统计
//!
//! 金额按 `rust_decimal` 累加；已取消订单不计入营收与热销。

use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Order, OrderStatus};
use shared::util::start_of_day_millis;

use crate::AppResult;
use crate::db::Filter;
use crate::db::repository::{
    CategoryRepository, MenuItemRepository, OrderRepository, RestaurantRepository, UserRepository,
};
use crate::orders::money::{to_decimal, to_f64};

/// Number of entries in `popularItems`
const POPULAR_ITEMS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularItem {
    pub menu_item_id: String,
    pub name: String,
    pub quantity: u64,
}

/// GET /api/dashboard/stats 响应
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_orders: u64,
    pub today_revenue: f64,
    pub total_orders: u64,
    pub total_revenue: f64,
    /// Distinct customer phone numbers
    pub total_customers: u64,
    pub counts_by_status: BTreeMap<String, u64>,
    pub popular_items: Vec<PopularItem>,
    pub menu_item_count: u64,
    pub category_count: u64,
}

/// GET /api/super-admin/stats 响应
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_restaurants: u64,
    pub active_restaurants: u64,
    pub inactive_restaurants: u64,
    pub total_users: u64,
    pub total_orders: u64,
    pub total_revenue: f64,
}

fn revenue<'a>(orders: impl Iterator<Item = &'a Order>) -> f64 {
    let sum: Decimal = orders
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| to_decimal(o.total))
        .sum();
    to_f64(sum)
}

/// Aggregate one restaurant's orders as of `now` (epoch millis)
pub fn summarize_orders(orders: &[Order], now: i64) -> DashboardStats {
    let midnight = start_of_day_millis(now);
    let today: Vec<&Order> = orders.iter().filter(|o| o.created_at >= midnight).collect();

    let mut counts_by_status: BTreeMap<String, u64> = OrderStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    for order in orders {
        *counts_by_status
            .entry(order.status.as_str().to_string())
            .or_default() += 1;
    }

    let customers: HashSet<&str> = orders
        .iter()
        .map(|o| o.customer_info.phone.as_str())
        .collect();

    let mut quantities: HashMap<&str, (&str, u64)> = HashMap::new();
    for line in orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .flat_map(|o| &o.items)
    {
        let entry = quantities
            .entry(line.menu_item_id.as_str())
            .or_insert((line.name.as_str(), 0));
        entry.1 += u64::from(line.quantity);
    }
    let mut popular_items: Vec<PopularItem> = quantities
        .into_iter()
        .map(|(id, (name, quantity))| PopularItem {
            menu_item_id: id.to_string(),
            name: name.to_string(),
            quantity,
        })
        .collect();
    popular_items.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then_with(|| a.name.cmp(&b.name))
    });
    popular_items.truncate(POPULAR_ITEMS_LIMIT);

    DashboardStats {
        today_orders: today.len() as u64,
        today_revenue: revenue(today.iter().copied()),
        total_orders: orders.len() as u64,
        total_revenue: revenue(orders.iter()),
        total_customers: customers.len() as u64,
        counts_by_status,
        popular_items,
        menu_item_count: 0,
        category_count: 0,
    }
}

pub async fn restaurant_dashboard(
    orders: &OrderRepository,
    menu_items: &MenuItemRepository,
    categories: &CategoryRepository,
    restaurant_id: &str,
    now: i64,
) -> AppResult<DashboardStats> {
    let all_orders = orders.find_all_by_restaurant(restaurant_id).await?;
    let mut stats = summarize_orders(&all_orders, now);
    stats.menu_item_count = menu_items.count_by_restaurant(restaurant_id).await?;
    stats.category_count = categories.count_by_restaurant(restaurant_id).await?;
    Ok(stats)
}

pub async fn platform_stats(
    restaurants: &RestaurantRepository,
    users: &UserRepository,
    orders: &OrderRepository,
) -> AppResult<PlatformStats> {
    let total_restaurants = restaurants.count(&[]).await?;
    let active_restaurants = restaurants
        .count(&[Filter::eq("settings.isActive", true)])
        .await?;
    let all_orders = orders.find_all().await?;

    Ok(PlatformStats {
        total_restaurants,
        active_restaurants,
        inactive_restaurants: total_restaurants.saturating_sub(active_restaurants),
        total_users: users.count(&[]).await?,
        total_orders: all_orders.len() as u64,
        total_revenue: revenue(all_orders.iter()),
    })
}
