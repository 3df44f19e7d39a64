//! 订单服务
//!
//! 顾客下单时由服务端按菜单重新定价；员工按状态机推进订单。

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::Deserialize;
use shared::error::ErrorCode;
use shared::models::order::UnknownOrderStatus;
use shared::models::{
    CustomerInfo, LineItem, MenuItem, Order, OrderStatus, OrderType, OptionType, PaymentStatus,
    Restaurant, SelectedOption,
};
use shared::util::{new_id, now_millis};

use super::money::{calculate_totals, to_f64, unit_price};
use super::number::generate_order_number;
use crate::auth::Identity;
use crate::db::RepoError;
use crate::db::repository::{MenuItemRepository, OrderRepository, RestaurantRepository};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::{AppError, AppResult};

/// Maximum quantity per line
pub const MAX_QUANTITY: i64 = 9999;

/// Attempts at allocating a unique order number
const ORDER_NUMBER_ATTEMPTS: usize = 3;

/// Customer order payload
///
/// Client-supplied names and prices are ignored; only ids, quantities and
/// option selections are read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceOrderRequest {
    pub restaurant_id: String,
    pub customer_info: CustomerInput,
    pub items: Vec<OrderItemInput>,
    pub order_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub table_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderItemInput {
    pub menu_item_id: String,
    pub quantity: i64,
    pub selected_options: Vec<OptionSelection>,
    pub special_instructions: Option<String>,
}

/// Option group name plus chosen choice name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionSelection {
    pub name: String,
    pub choice: String,
}

#[derive(Clone)]
pub struct OrderService {
    restaurants: RestaurantRepository,
    menu_items: MenuItemRepository,
    orders: OrderRepository,
    tax_rate: f64,
}

impl OrderService {
    pub fn new(
        restaurants: RestaurantRepository,
        menu_items: MenuItemRepository,
        orders: OrderRepository,
        tax_rate: f64,
    ) -> Self {
        Self {
            restaurants,
            menu_items,
            orders,
            tax_rate,
        }
    }

    /// 顾客下单
    ///
    /// 校验输入 → 检查餐厅状态 → 按菜单重新定价 → 生成订单号并持久化。
    pub async fn place_order(&self, req: PlaceOrderRequest) -> AppResult<Order> {
        let order_type = validate_request(&req)?;

        let restaurant = self
            .restaurants
            .find_by_id(&req.restaurant_id)
            .await?
            .ok_or_else(|| {
                AppError::business_rule(ErrorCode::RestaurantNotFound, "Restaurant not found")
            })?;
        check_restaurant_accepts(&restaurant, order_type)?;

        let ids: Vec<String> = req
            .items
            .iter()
            .map(|i| i.menu_item_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let menu: HashMap<String, MenuItem> = self
            .menu_items
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();

        let mut lines = Vec::with_capacity(req.items.len());
        for input in &req.items {
            let item = menu
                .get(&input.menu_item_id)
                .filter(|m| m.restaurant_id == restaurant.id && m.is_available)
                .ok_or_else(|| {
                    AppError::business_rule(
                        ErrorCode::MenuItemUnavailable,
                        "Menu item is not available",
                    )
                    .with_detail("menuItemId", input.menu_item_id.clone())
                })?;
            lines.push(price_line(item, input)?);
        }

        let totals = calculate_totals(&lines, self.tax_rate);
        let now = now_millis();
        let order = Order {
            id: new_id(),
            order_number: String::new(),
            restaurant_id: restaurant.id.clone(),
            customer_info: CustomerInfo {
                name: req.customer_info.name.trim().to_string(),
                phone: req.customer_info.phone.trim().to_string(),
                email: req.customer_info.email.clone(),
                table_number: req.customer_info.table_number.clone(),
            },
            items: lines,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
            status: OrderStatus::Pending,
            order_type,
            payment_status: PaymentStatus::Pending,
            notes: req.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        self.persist(order, || generate_order_number(Utc::now()))
            .await
    }

    /// Insert under a fresh order number, retrying on a number collision
    async fn persist(
        &self,
        mut order: Order,
        mut next_number: impl FnMut() -> String,
    ) -> AppResult<Order> {
        for attempt in 1..=ORDER_NUMBER_ATTEMPTS {
            order.order_number = next_number();
            match self.orders.create(&order).await {
                Ok(created) => {
                    tracing::info!(
                        order_id = %created.id,
                        order_number = %created.order_number,
                        restaurant_id = %created.restaurant_id,
                        total = created.total,
                        "Order placed"
                    );
                    return Ok(created);
                }
                Err(RepoError::Duplicate(field)) if field == "orderNumber" => {
                    tracing::warn!(attempt, "Order number collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::internal("Could not allocate a unique order number"))
    }

    /// 推进订单状态
    ///
    /// 仅允许状态机中的合法迁移；并发修改时以先提交者为准。
    pub async fn update_status(
        &self,
        identity: &Identity,
        order_id: &str,
        status: &str,
    ) -> AppResult<Order> {
        let target: OrderStatus = status.parse().map_err(|e: UnknownOrderStatus| {
            AppError::business_rule(ErrorCode::InvalidOrderStatus, e.to_string()).with_detail(
                "allowed",
                OrderStatus::ALL
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>(),
            )
        })?;

        let order = self.get_order(identity, order_id).await?;

        if !order.status.can_transition_to(target) {
            return Err(AppError::business_rule(
                ErrorCode::InvalidStatusTransition,
                format!("Cannot change order status from {} to {}", order.status, target),
            )
            .with_detail("from", order.status.as_str())
            .with_detail("to", target.as_str()));
        }

        let updated = self
            .orders
            .transition(&order.id, order.status, target, now_millis())
            .await?
            .ok_or_else(|| {
                AppError::business_rule(
                    ErrorCode::OrderStatusConflict,
                    "Order status was changed concurrently",
                )
            })?;

        tracing::info!(
            order_id = %updated.id,
            from = %order.status,
            to = %updated.status,
            user_id = %identity.user_id,
            "Order status updated"
        );
        Ok(updated)
    }

    /// 单个订单 (超级管理员可跨餐厅查看)
    pub async fn get_order(&self, identity: &Identity, order_id: &str) -> AppResult<Order> {
        let order = self.orders.find_by_id(order_id).await?.ok_or_else(|| {
            AppError::business_rule(ErrorCode::OrderNotFound, "Order not found")
        })?;
        if !identity.is_super_admin() {
            identity.ensure_tenant(&order.restaurant_id)?;
        }
        Ok(order)
    }

    /// 当前餐厅的订单，最新在前
    pub async fn list_orders(
        &self,
        identity: &Identity,
        status: Option<&str>,
        limit: usize,
    ) -> AppResult<Vec<Order>> {
        let restaurant_id = identity.tenant_id()?;
        let status = status
            .map(|s| {
                s.parse::<OrderStatus>().map_err(|e| {
                    AppError::business_rule(ErrorCode::InvalidOrderStatus, e.to_string())
                })
            })
            .transpose()?;
        Ok(self
            .orders
            .find_by_restaurant(restaurant_id, status, limit)
            .await?)
    }
}

/// Step 1: shape of the request, before touching storage
fn validate_request(req: &PlaceOrderRequest) -> AppResult<OrderType> {
    validate_required_text(&req.restaurant_id, "restaurantId", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.customer_info.name, "customerInfo.name", MAX_NAME_LEN)?;
    validate_required_text(&req.customer_info.phone, "customerInfo.phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.customer_info.email, "customerInfo.email", MAX_EMAIL_LEN)?;
    validate_optional_text(
        &req.customer_info.table_number,
        "customerInfo.tableNumber",
        MAX_SHORT_TEXT_LEN,
    )?;
    validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;

    if req.items.is_empty() {
        return Err(AppError::business_rule(
            ErrorCode::OrderEmpty,
            "Order must contain at least one item",
        ));
    }
    for item in &req.items {
        validate_required_text(&item.menu_item_id, "items.menuItemId", MAX_SHORT_TEXT_LEN)?;
        if !(1..=MAX_QUANTITY).contains(&item.quantity) {
            return Err(AppError::business_rule(
                ErrorCode::InvalidQuantity,
                format!("Quantity must be between 1 and {MAX_QUANTITY}"),
            )
            .with_detail("menuItemId", item.menu_item_id.clone()));
        }
        validate_optional_text(
            &item.special_instructions,
            "items.specialInstructions",
            MAX_NOTE_LEN,
        )?;
    }

    match req.order_type.as_deref() {
        None => Ok(OrderType::default()),
        Some(raw) => raw
            .parse()
            .map_err(|e: String| AppError::business_rule(ErrorCode::InvalidOrderType, e)),
    }
}

fn check_restaurant_accepts(restaurant: &Restaurant, order_type: OrderType) -> AppResult<()> {
    let settings = &restaurant.settings;
    if !settings.is_active {
        return Err(AppError::business_rule(
            ErrorCode::RestaurantInactive,
            "Restaurant is not active",
        ));
    }
    if !settings.accept_orders {
        return Err(AppError::business_rule(
            ErrorCode::RestaurantNotAcceptingOrders,
            "Restaurant is not accepting orders",
        ));
    }
    let available = match order_type {
        OrderType::DineIn => true,
        OrderType::Takeaway => settings.pickup_enabled,
        OrderType::Delivery => settings.delivery_enabled,
    };
    if !available {
        return Err(AppError::business_rule(
            ErrorCode::OrderTypeUnavailable,
            format!("{} orders are not available", order_type.as_str()),
        ));
    }
    Ok(())
}

/// Build the authoritative line from the stored menu item
fn price_line(item: &MenuItem, input: &OrderItemInput) -> AppResult<LineItem> {
    let selected = resolve_options(item, &input.selected_options)?;
    let quantity = u32::try_from(input.quantity)
        .map_err(|_| AppError::business_rule(ErrorCode::InvalidQuantity, "Invalid quantity"))?;
    Ok(LineItem {
        menu_item_id: item.id.clone(),
        name: item.name.clone(),
        price: to_f64(unit_price(item.price, &selected)),
        quantity,
        selected_options: selected,
        special_instructions: input.special_instructions.clone(),
    })
}

fn invalid_option(item: &MenuItem, message: impl Into<String>) -> AppError {
    AppError::business_rule(ErrorCode::InvalidOption, message)
        .with_detail("menuItemId", item.id.clone())
}

/// Match selections against the item's option groups, pricing them from the menu
fn resolve_options(
    item: &MenuItem,
    selections: &[OptionSelection],
) -> AppResult<Vec<SelectedOption>> {
    let mut resolved: Vec<SelectedOption> = Vec::with_capacity(selections.len());
    for selection in selections {
        let group = item.option_group(&selection.name).ok_or_else(|| {
            invalid_option(item, format!("Unknown option group: {}", selection.name))
        })?;
        let choice = group.choice(&selection.choice).ok_or_else(|| {
            invalid_option(
                item,
                format!("Unknown choice {} for {}", selection.choice, group.name),
            )
        })?;
        if resolved
            .iter()
            .any(|s| s.name == group.name && s.choice == choice.name)
        {
            return Err(invalid_option(
                item,
                format!("Duplicate choice {} for {}", choice.name, group.name),
            ));
        }
        resolved.push(SelectedOption {
            name: group.name.clone(),
            choice: choice.name.clone(),
            price: choice.price,
        });
    }

    for group in &item.options {
        let chosen = resolved.iter().filter(|s| s.name == group.name).count();
        if group.option_type == OptionType::Single && chosen > 1 {
            return Err(invalid_option(
                item,
                format!("Only one choice allowed for {}", group.name),
            ));
        }
        if group.required && chosen == 0 {
            return Err(invalid_option(
                item,
                format!("A choice is required for {}", group.name),
            ));
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OptionChoice, OptionGroup};

    fn item_with_options() -> MenuItem {
        MenuItem {
            id: "m1".into(),
            restaurant_id: "r1".into(),
            category_id: "c1".into(),
            name: "Burger".into(),
            name_ar: None,
            description: None,
            description_ar: None,
            price: 10.0,
            image: None,
            ingredients: vec![],
            allergens: vec![],
            options: vec![
                OptionGroup {
                    name: "Size".into(),
                    option_type: OptionType::Single,
                    required: true,
                    choices: vec![
                        OptionChoice {
                            name: "Regular".into(),
                            price: 0.0,
                        },
                        OptionChoice {
                            name: "Large".into(),
                            price: 2.5,
                        },
                    ],
                },
                OptionGroup {
                    name: "Extras".into(),
                    option_type: OptionType::Multiple,
                    required: false,
                    choices: vec![
                        OptionChoice {
                            name: "Cheese".into(),
                            price: 1.0,
                        },
                        OptionChoice {
                            name: "Bacon".into(),
                            price: 1.5,
                        },
                    ],
                },
            ],
            is_available: true,
            is_popular: false,
            sort_order: 0,
            preparation_time: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn sel(name: &str, choice: &str) -> OptionSelection {
        OptionSelection {
            name: name.into(),
            choice: choice.into(),
        }
    }

    fn input(quantity: i64, options: Vec<OptionSelection>) -> OrderItemInput {
        OrderItemInput {
            menu_item_id: "m1".into(),
            quantity,
            selected_options: options,
            special_instructions: None,
        }
    }

    #[test]
    fn test_price_line_uses_menu_prices() {
        let item = item_with_options();
        let line = price_line(
            &item,
            &input(2, vec![sel("Size", "Large"), sel("Extras", "Cheese"), sel("Extras", "Bacon")]),
        )
        .unwrap();
        assert_eq!(line.name, "Burger");
        assert_eq!(line.price, 15.0);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.selected_options.len(), 3);
    }

    #[test]
    fn test_required_group_must_be_answered() {
        let err = price_line(&item_with_options(), &input(1, vec![])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOption);
    }

    #[test]
    fn test_single_group_takes_one_choice() {
        let err = price_line(
            &item_with_options(),
            &input(1, vec![sel("Size", "Regular"), sel("Size", "Large")]),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOption);
    }

    #[test]
    fn test_unknown_option_rejected() {
        for bad in [sel("Sauce", "Hot"), sel("Size", "Huge")] {
            let err = price_line(&item_with_options(), &input(1, vec![sel("Size", "Regular"), bad]))
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidOption);
        }
    }

    fn request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            restaurant_id: "r1".into(),
            customer_info: CustomerInput {
                name: "Sara".into(),
                phone: "0500000000".into(),
                ..Default::default()
            },
            items: vec![input(1, vec![])],
            order_type: None,
            notes: None,
        }
    }

    #[test]
    fn test_validate_defaults_to_dine_in() {
        assert_eq!(validate_request(&request()).unwrap(), OrderType::DineIn);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut req = request();
        req.customer_info.name = "  ".into();
        assert_eq!(validate_request(&req).unwrap_err().code, ErrorCode::RequiredField);

        let mut req = request();
        req.items.clear();
        assert_eq!(validate_request(&req).unwrap_err().code, ErrorCode::OrderEmpty);

        for q in [0, -1, MAX_QUANTITY + 1] {
            let mut req = request();
            req.items[0].quantity = q;
            assert_eq!(validate_request(&req).unwrap_err().code, ErrorCode::InvalidQuantity);
        }

        let mut req = request();
        req.order_type = Some("drive-through".into());
        assert_eq!(validate_request(&req).unwrap_err().code, ErrorCode::InvalidOrderType);

        let mut req = request();
        req.notes = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert_eq!(validate_request(&req).unwrap_err().code, ErrorCode::ValidationFailed);
    }

    fn service() -> OrderService {
        let store: std::sync::Arc<dyn crate::db::DocumentStore> =
            std::sync::Arc::new(crate::db::MemoryStore::new());
        OrderService::new(
            RestaurantRepository::new(store.clone()),
            MenuItemRepository::new(store.clone()),
            OrderRepository::new(store),
            0.15,
        )
    }

    fn stored_order() -> Order {
        Order {
            id: new_id(),
            order_number: String::new(),
            restaurant_id: "r1".into(),
            customer_info: CustomerInfo {
                name: "Sara".into(),
                phone: "0500000000".into(),
                email: None,
                table_number: None,
            },
            items: vec![],
            subtotal: 10.0,
            tax: 1.5,
            total: 11.5,
            status: OrderStatus::Pending,
            order_type: OrderType::DineIn,
            payment_status: PaymentStatus::Pending,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[tokio::test]
    async fn test_order_number_collision_retries() {
        let service = service();
        let mut first = stored_order();
        first.order_number = "ORD-20260307-AAAAAAAAAAAA".into();
        service.orders.create(&first).await.unwrap();

        let mut numbers = vec!["ORD-20260307-BBBBBBBBBBBB", "ORD-20260307-AAAAAAAAAAAA"];
        let created = service
            .persist(stored_order(), || numbers.pop().unwrap().to_string())
            .await
            .unwrap();
        assert_eq!(created.order_number, "ORD-20260307-BBBBBBBBBBBB");
        assert!(numbers.is_empty());
    }

    #[tokio::test]
    async fn test_order_number_gives_up_after_attempts() {
        let service = service();
        let mut first = stored_order();
        first.order_number = "ORD-20260307-AAAAAAAAAAAA".into();
        service.orders.create(&first).await.unwrap();

        let mut calls = 0;
        let err = service
            .persist(stored_order(), || {
                calls += 1;
                "ORD-20260307-AAAAAAAAAAAA".to_string()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(calls, ORDER_NUMBER_ATTEMPTS);
        assert_eq!(service.orders.find_all().await.unwrap().len(), 1);
    }
}
