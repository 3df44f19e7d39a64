//! Auth API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/auth/login | POST | 登录 (限流) | 无 |
//! | /api/auth/me | GET | 当前用户 | 需要 |

mod handler;

pub use handler::{LoginRequest, LoginResponse, UserProfile};

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::rate_limit::login_rate_limit;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/auth", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let login = Router::new()
        .route("/login", post(handler::login))
        .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    Router::new().route("/me", get(handler::me)).merge(login)
}
