//! Menu Server - 多租户餐厅点餐平台
//!
//! # 架构概述
//!
//! - **租户解析** (`tenant`): Host 头 → 餐厅 slug，重写到 `/menu/{slug}`
//! - **数据存储** (`db`): JSON 文档存储 (SQLite / 内存) 与类型化仓库
//! - **认证** (`auth`): JWT + Argon2，按角色授权
//! - **订单** (`orders`): 下单汇总、金额计算、状态机
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! menu-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT、身份、角色中间件、密码
//! ├── tenant/        # Host → slug 解析与路径重写
//! ├── db/            # 文档存储与仓库
//! ├── orders/        # 订单服务、金额、编号
//! ├── services/      # 目录查询、统计
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 应用组装与中间件栈
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod routes;
pub mod services;
pub mod tenant;
pub mod utils;

// Re-export 公共类型
pub use auth::{Identity, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 字段语法 (`key = value`, `key = %value`)
#[macro_export]
macro_rules! security_log {
    ($event:expr) => {
        tracing::warn!(target: "security", event = $event)
    };
    ($event:expr, $($fields:tt)+) => {
        tracing::warn!(target: "security", event = $event, $($fields)+)
    };
}

/// 按配置初始化日志 (stdout 或按日滚动文件)
pub fn setup_environment(config: &Config) {
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
}
