//! 订单模块
//!
//! - [`money`]: 基于 `rust_decimal` 的金额计算
//! - [`number`]: 订单号生成
//! - [`service`]: 下单汇总与状态流转

pub mod money;
pub mod number;
pub mod service;

pub use service::{
    CustomerInput, OptionSelection, OrderItemInput, OrderService, PlaceOrderRequest,
};
