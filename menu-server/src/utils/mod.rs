//! Utility modules

pub mod extract;
pub mod logger;
pub mod validation;

pub use extract::Json;
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
