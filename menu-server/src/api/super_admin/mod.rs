//! Super Admin API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/super-admin/restaurants | GET | 全部餐厅，最新在前 |
//! | /api/super-admin/restaurants | POST | 创建餐厅 (直接启用，可附店主账号) |
//! | /api/super-admin/restaurants/{id}/status | PUT | 启用/停用餐厅 |
//! | /api/super-admin/stats | GET | 平台统计 |

mod handler;

pub use handler::{OwnerInput, RestaurantCreate, StatusChange};

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::middleware::roles;
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/super-admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/restaurants",
            get(handler::list_restaurants).post(handler::create_restaurant),
        )
        .route("/restaurants/{id}/status", put(handler::set_status))
        .route("/stats", get(handler::get_stats))
        .layer(middleware::from_fn(require_role(roles::SUPER_ADMIN)))
}
