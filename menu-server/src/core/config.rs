use crate::auth::JwtConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in {1} environment")]
    MissingSecret(&'static str, String),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_HOST | 0.0.0.0 | 监听地址 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_URL | sqlite://data/menu.db | SQLite 地址，`memory` 使用内存存储 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | - | 设置后按日滚动写入文件 |
/// | JWT_SECRET | 开发环境自动填充 | 生产环境必填 (≥ 32 字符) |
/// | JWT_EXPIRATION_MINUTES | 10080 | 令牌有效期 (7 天) |
/// | TAX_RATE | 0.15 | 订单税率 |
/// | ORDERS_LIST_LIMIT | 100 | 后台订单列表上限 |
/// | LOGIN_RATE_LIMIT | 10 | 每 IP 每分钟登录/注册次数，0 关闭 |
/// | SUPER_ADMIN_EMAIL / SUPER_ADMIN_PASSWORD | - | 启动时创建超级管理员 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=memory HTTP_PORT=8080 cargo run -p menu-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    pub database_url: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 税率 (小数，例如 0.15)
    pub tax_rate: f64,
    pub orders_list_limit: usize,
    pub login_rate_limit: u32,
    pub super_admin_email: Option<String>,
    pub super_admin_password: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的项使用默认值；生产环境缺少 `JWT_SECRET` 时返回错误。
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let jwt_secret = require_secret("JWT_SECRET", &environment)?;
        if environment != "development" && jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: "must be at least 32 characters long".into(),
            });
        }

        let tax_rate: f64 = parse_env("TAX_RATE", 0.15);
        if !(0.0..1.0).contains(&tax_rate) {
            return Err(ConfigError::Invalid {
                name: "TAX_RATE",
                reason: format!("must be in [0, 1), got {tax_rate}"),
            });
        }

        Ok(Self {
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: parse_env("HTTP_PORT", 3000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/menu.db".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: parse_env("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_minutes: parse_env("JWT_EXPIRATION_MINUTES", 7 * 24 * 60),
                issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "menu-server".into()),
                audience: std::env::var("JWT_AUDIENCE")
                    .unwrap_or_else(|_| "menu-clients".into()),
            },
            tax_rate,
            orders_list_limit: parse_env("ORDERS_LIST_LIMIT", 100),
            login_rate_limit: parse_env("LOGIN_RATE_LIMIT", 10),
            super_admin_email: std::env::var("SUPER_ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            super_admin_password: std::env::var("SUPER_ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// 测试用配置：内存存储、固定密钥，不读取环境变量
    pub fn for_tests() -> Self {
        Self {
            http_host: "127.0.0.1".into(),
            http_port: 0,
            database_url: "memory".into(),
            environment: "test".into(),
            log_level: "debug".into(),
            log_json: false,
            log_dir: None,
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-long-enough-0123456789".into(),
                expiration_minutes: 60,
                issuer: "menu-server".into(),
                audience: "menu-clients".into(),
            },
            tax_rate: 0.15,
            orders_list_limit: 100,
            login_rate_limit: 0,
            super_admin_email: None,
            super_admin_password: None,
        }
    }

    /// 是否使用内存存储
    pub fn uses_memory_store(&self) -> bool {
        self.database_url == "memory"
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Secret env var: required outside development, placeholder in development.
fn require_secret(name: &'static str, environment: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ if environment == "development" => {
            tracing::warn!("{name} not set, using development placeholder");
            Ok(format!("dev-{name}-not-for-production-use-only"))
        }
        _ => Err(ConfigError::MissingSecret(name, environment.to_string())),
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
