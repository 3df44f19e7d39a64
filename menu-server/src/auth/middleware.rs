//! 认证中间件
//!
//! 为 JWT 认证和基于角色的授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;
use shared::error::ErrorCode;
use shared::models::Role;

use crate::AppError;
use crate::auth::{Identity, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::services::onboarding::RESERVED_SLUGS;

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`Identity`] 注入请求扩展。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (健康检查、菜单页)
/// - 公共 API，见 [`is_public_api_route`]
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") || is_public_api_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("auth_missing", uri = req.uri().path());
            return Err(AppError::not_authenticated());
        }
    };

    match state.get_jwt_service().validate_token(token) {
        Ok(claims) => {
            let identity = Identity::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!("auth_failed", error = %e, uri = req.uri().path());
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// 无需登录的 API
///
/// - `POST /api/auth/login`
/// - `POST /api/restaurants/register`
/// - `POST /api/orders` (顾客下单)
/// - `GET /api/restaurants/{slug}[/...]` (公开餐厅与菜单，保留字如 `settings` 除外)
pub fn is_public_api_route(method: &Method, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    if method == Method::POST {
        return matches!(
            path,
            "/api/auth/login" | "/api/restaurants/register" | "/api/orders"
        );
    }
    if method == Method::GET
        && let Some(rest) = path.strip_prefix("/api/restaurants/")
    {
        let slug = rest.split('/').next().unwrap_or_default();
        return !slug.is_empty() && !RESERVED_SLUGS.contains(&slug);
    }
    false
}

type BoxedResponseFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>;

/// 角色检查中间件 - 要求调用者属于给定角色之一
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/staff", get(handler::list))
///     .layer(middleware::from_fn(require_role(&[Role::RestaurantAdmin])));
/// ```
///
/// # 错误
///
/// 未认证返回 401，角色不符返回 403 RoleRequired
pub fn require_role(
    roles: &'static [Role],
) -> impl Fn(Request, Next) -> BoxedResponseFuture + Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let identity = req
                .extensions()
                .get::<Identity>()
                .ok_or_else(AppError::not_authenticated)?;

            if !identity.has_role(roles) {
                security_log!(
                    "role_denied",
                    user_id = identity.user_id.as_str(),
                    user_role = identity.role.as_str(),
                    uri = req.uri().path()
                );
                return Err(AppError::business_rule(
                    ErrorCode::RoleRequired,
                    "Insufficient role for this action",
                ));
            }

            Ok(next.run(req).await)
        })
    }
}

/// 常用角色组合
pub mod roles {
    use shared::models::Role;

    pub const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];
    pub const RESTAURANT_ADMIN: &[Role] = &[Role::RestaurantAdmin];
    pub const RESTAURANT_STAFF: &[Role] = &[Role::RestaurantAdmin, Role::RestaurantStaff];
    pub const ORDER_MANAGERS: &[Role] = &[
        Role::RestaurantAdmin,
        Role::RestaurantStaff,
        Role::SuperAdmin,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_api_route(&Method::POST, "/api/auth/login"));
        assert!(is_public_api_route(&Method::POST, "/api/restaurants/register"));
        assert!(is_public_api_route(&Method::POST, "/api/orders"));
        assert!(is_public_api_route(&Method::GET, "/api/restaurants/asala"));
        assert!(is_public_api_route(&Method::GET, "/api/restaurants/asala/menu"));
    }

    #[test]
    fn test_protected_routes() {
        assert!(!is_public_api_route(&Method::GET, "/api/orders"));
        assert!(!is_public_api_route(&Method::GET, "/api/restaurants/settings"));
        assert!(!is_public_api_route(&Method::PUT, "/api/restaurants/settings"));
        assert!(!is_public_api_route(&Method::GET, "/api/restaurants"));
        assert!(!is_public_api_route(&Method::PUT, "/api/orders/o1"));
        assert!(!is_public_api_route(&Method::GET, "/api/auth/me"));
    }

    #[test]
    fn test_reserved_slugs_never_public() {
        for slug in RESERVED_SLUGS {
            let path = format!("/api/restaurants/{slug}");
            assert!(!is_public_api_route(&Method::GET, &path), "{path}");
        }
        assert!(!is_public_api_route(&Method::GET, "/api/restaurants/register"));
    }
}
