use thiserror::Error;

use crate::core::config::ConfigError;
use crate::db::RepoError;

/// 启动与运行期错误 (请求级错误使用 [`AppError`](crate::AppError))
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("数据库错误: {0}")]
    Database(#[from] RepoError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
