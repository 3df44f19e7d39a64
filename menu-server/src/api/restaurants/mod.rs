//! Restaurant API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/restaurants/register | POST | 自助注册 (待审核，限流) | 无 |
//! | /api/restaurants/settings | GET/PUT | 店铺设置 | restaurant_admin |
//! | /api/restaurants/{slug} | GET | 餐厅 + 分类 + 菜单 | 无 |
//! | /api/restaurants/{slug}/categories | GET | 启用的分类 | 无 |
//! | /api/restaurants/{slug}/menu | GET | 可售菜品 (`?category=`) | 无 |

mod handler;

pub use handler::{RegisterRequest, RegisterResponse};

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::middleware::roles;
use crate::auth::rate_limit::register_rate_limit;
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/restaurants", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    // 公共路由
    let public_routes = Router::new()
        .route("/{slug}", get(handler::get_by_slug))
        .route("/{slug}/categories", get(handler::list_categories))
        .route("/{slug}/menu", get(handler::list_menu));

    let register_routes = Router::new()
        .route("/register", post(handler::register))
        .layer(middleware::from_fn_with_state(state.clone(), register_rate_limit));

    // 店主路由
    let owner_routes = Router::new()
        .route(
            "/settings",
            get(handler::get_settings).put(handler::update_settings),
        )
        .layer(middleware::from_fn(require_role(roles::RESTAURANT_ADMIN)));

    public_routes.merge(register_routes).merge(owner_routes)
}
