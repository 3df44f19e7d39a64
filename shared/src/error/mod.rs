//! Unified error system
//!
//! - [`ErrorCode`]: standardized numeric error codes
//! - [`ErrorCategory`]: classification of codes by domain
//! - [`AppError`]: error type carrying a code, a message and optional details
//! - [`ApiResponse`]: JSON envelope for every response
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant / restaurant errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors (categories, menu items)
//! - 8xxx: User / staff errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::RestaurantNotFound);
//! let err = AppError::validation("Customer phone is required")
//!     .with_detail("field", "customerInfo.phone");
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
