//! 认证与授权
//!
//! - [`JwtService`]: 令牌签发与校验
//! - [`Identity`]: 已认证的调用者 (用户、角色、所属餐厅)
//! - [`require_auth`] / [`require_role`]: 路由中间件
//! - [`password`]: Argon2 密码哈希
//! - [`RateLimiter`]: 登录/注册限流

pub mod extractor;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod rate_limit;

pub use identity::Identity;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_role};
pub use rate_limit::RateLimiter;
