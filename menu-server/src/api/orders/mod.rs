//! Order API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/orders | POST | 顾客下单 | 无 |
//! | /api/orders | GET | 当前餐厅订单 (`?status=`) | 店主/员工 |
//! | /api/orders/{id} | GET | 订单详情 | 店主/员工/超级管理员 |
//! | /api/orders/{id} | PUT | 更新订单状态 | 店主/员工/超级管理员 |

mod handler;

pub use handler::{ListQuery, StatusUpdate};

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::middleware::roles;
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 公共路由
    let public_routes = Router::new().route("/", post(handler::place));

    let manage_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id).put(handler::update_status))
        .layer(middleware::from_fn(require_role(roles::ORDER_MANAGERS)));

    public_routes.merge(manage_routes)
}
