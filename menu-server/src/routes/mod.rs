//! 应用组装
//!
//! 路由注册、中间件栈，以及包裹在最外层的租户改写。

use std::convert::Infallible;

use axum::Router;
use axum::extract::Request;
use axum::middleware as axum_middleware;
use axum::response::Response;
use http::{HeaderName, HeaderValue};
use tower::{Layer, Service};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;
use crate::tenant::middleware::resolve_tenant;

pub mod logging;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        // uuid strings are always valid header values
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware)
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(api::health::router())
        // Auth API - login is public and rate limited
        .merge(api::auth::router(state))
        // Restaurants API - register + public directory + owner settings
        .merge(api::restaurants::router(state))
        // Storefront - tenant menu page
        .merge(api::storefront::router())
        // Menu management - restaurant admin
        .merge(api::categories::router())
        .merge(api::menu_items::router())
        // Orders - public checkout, staff status updates
        .merge(api::orders::router())
        // Staff management - restaurant admin
        .merge(api::staff::router())
        // Dashboard - restaurant admin/staff
        .merge(api::dashboard::router())
        // Platform - super admin
        .merge(api::super_admin::router())
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router(&state)
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Request logging
        .layer(axum_middleware::from_fn(logging::logging_middleware))
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - injects Identity, skips public routes
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state)
}

/// The service the HTTP server runs
///
/// Tenant resolution wraps the router so subdomain rewrites happen before
/// route matching.
pub fn build_service(
    state: ServerState,
) -> impl Service<Request, Response = Response, Error = Infallible, Future: Send + 'static>
+ Clone
+ Send
+ 'static {
    axum_middleware::from_fn(resolve_tenant).layer(build_app(state))
}
