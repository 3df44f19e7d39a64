//! Storefront (租户菜单页)
//!
//! 子域名请求经 [`crate::tenant`] 改写后落在 `/menu/{slug}`。
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /menu/{slug} | GET | 菜单页数据 |
//! | /menu/{slug}/{*rest} | GET | 同上 (子路径由前端处理) |

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::get,
};
use shared::error::ErrorCode;

use crate::core::ServerState;
use crate::services::MenuPage;
use crate::tenant::middleware::TenantSlug;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/menu/{slug}", get(menu_page))
        .route("/menu/{slug}/{*rest}", get(menu_subpage))
}

/// GET /menu/{slug} - 菜单页
pub async fn menu_page(
    State(state): State<ServerState>,
    tenant: Option<Extension<TenantSlug>>,
    Path(slug): Path<String>,
) -> AppResult<Json<MenuPage>> {
    if let Some(Extension(TenantSlug(host_slug))) = &tenant {
        tracing::debug!(host_slug = %host_slug, slug = %slug, "Serving subdomain storefront");
    }
    let page = state
        .directory
        .menu_page(&slug)
        .await?
        .ok_or_else(|| {
            AppError::business_rule(ErrorCode::RestaurantNotFound, "Restaurant not found")
        })?;
    Ok(Json(page))
}

/// GET /menu/{slug}/{*rest} - 菜单子页面
pub async fn menu_subpage(
    state: State<ServerState>,
    tenant: Option<Extension<TenantSlug>>,
    Path((slug, _rest)): Path<(String, String)>,
) -> AppResult<Json<MenuPage>> {
    menu_page(state, tenant, Path(slug)).await
}
