//! Shared types for the menu platform
//!
//! Domain models, the unified error system and small utilities used by
//! the server crate and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
