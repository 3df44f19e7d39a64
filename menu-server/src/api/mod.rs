//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录与当前用户
//! - [`restaurants`] - 注册、公开餐厅/菜单、店铺设置
//! - [`storefront`] - 租户菜单页 (`/menu/{slug}`)
//! - [`categories`] - 分类管理
//! - [`menu_items`] - 菜品管理
//! - [`orders`] - 下单与订单状态
//! - [`staff`] - 员工管理
//! - [`dashboard`] - 餐厅统计
//! - [`super_admin`] - 平台管理

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod restaurants;
pub mod staff;
pub mod storefront;
pub mod super_admin;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
