//! Category API 模块 (restaurant_admin)
//!
//! 所有操作限定在当前用户所属餐厅；其他餐厅的 id 一律 404。

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::middleware::roles;
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_role(roles::RESTAURANT_ADMIN)))
}
