//! Staff API 模块 (restaurant_admin)
//!
//! 店主管理本餐厅的店主/员工账号。

mod handler;

pub use handler::{StaffCreate, StaffUpdate};

use axum::{Router, middleware, routing::get};

use crate::auth::middleware::roles;
use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/staff", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_role(roles::RESTAURANT_ADMIN)))
}
