//! Dashboard API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/dashboard/stats | GET | 当前餐厅统计 | 店主/员工 |

use axum::{Json, Router, extract::State, middleware, routing::get};
use shared::util::now_millis;

use crate::auth::middleware::roles;
use crate::auth::{Identity, require_role};
use crate::core::ServerState;
use crate::services::stats::{self, DashboardStats};
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/dashboard",
        Router::new()
            .route("/stats", get(get_stats))
            .layer(middleware::from_fn(require_role(roles::RESTAURANT_STAFF))),
    )
}

/// GET /api/dashboard/stats - 餐厅统计
pub async fn get_stats(
    State(state): State<ServerState>,
    identity: Identity,
) -> AppResult<Json<DashboardStats>> {
    let restaurant_id = identity.tenant_id()?;
    let stats = stats::restaurant_dashboard(
        &state.orders,
        &state.menu_items,
        &state.categories,
        restaurant_id,
        now_millis(),
    )
    .await?;
    Ok(Json(stats))
}
