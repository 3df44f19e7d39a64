//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant / restaurant errors
//! - 4xxx: Order errors
//! - 6xxx: Menu errors
//! - 8xxx: User / staff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a plain `u16` so clients can switch on the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field is missing
    RequiredField = 7,
    /// Value is out of range
    ValueOutOfRange = 8,
    /// Too many requests from one client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid email or password
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled or pending approval
    AccountDisabled = 1005,
    /// Password too short
    PasswordTooShort = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role is required
    RoleRequired = 2002,
    /// Caller has no restaurant scope
    TenantRequired = 2003,
    /// Resource belongs to another restaurant
    TenantMismatch = 2004,
    /// Cannot delete own account
    CannotDeleteSelf = 2005,

    // ==================== 3xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 3001,
    /// Restaurant is not active
    RestaurantInactive = 3002,
    /// Restaurant is not accepting orders
    RestaurantNotAcceptingOrders = 3003,
    /// Slug already taken
    SlugAlreadyExists = 3004,
    /// Slug is malformed
    InvalidSlug = 3005,
    /// Order type disabled for this restaurant
    OrderTypeUnavailable = 3006,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Unknown order status value
    InvalidOrderStatus = 4003,
    /// Status transition not allowed
    InvalidStatusTransition = 4004,
    /// Order status changed concurrently
    OrderStatusConflict = 4005,
    /// Menu item missing or unavailable
    MenuItemUnavailable = 4006,
    /// Selected option does not match the menu item
    InvalidOption = 4007,
    /// Quantity out of bounds
    InvalidQuantity = 4008,
    /// Unknown order type
    InvalidOrderType = 4009,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has invalid price
    InvalidPrice = 6002,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category still referenced by menu items
    CategoryHasMenuItems = 6102,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Email already registered
    EmailAlreadyExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, please try again later",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled or pending approval",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Insufficient role for this operation",
            ErrorCode::TenantRequired => "Account is not linked to a restaurant",
            ErrorCode::TenantMismatch => "Resource belongs to another restaurant",
            ErrorCode::CannotDeleteSelf => "Cannot delete own account",

            // Restaurant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantInactive => "Restaurant is not active",
            ErrorCode::RestaurantNotAcceptingOrders => {
                "Restaurant is not accepting orders at the moment"
            }
            ErrorCode::SlugAlreadyExists => "Restaurant slug is already taken",
            ErrorCode::InvalidSlug => "Restaurant slug is invalid",
            ErrorCode::OrderTypeUnavailable => "Order type is not available for this restaurant",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidOrderStatus => "Invalid order status",
            ErrorCode::InvalidStatusTransition => "Order status transition is not allowed",
            ErrorCode::OrderStatusConflict => "Order status was changed by another request",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",
            ErrorCode::InvalidOption => "Invalid menu item option",
            ErrorCode::InvalidQuantity => "Invalid item quantity",
            ErrorCode::InvalidOrderType => "Invalid order type",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::InvalidPrice => "Menu item has invalid price",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryHasMenuItems => "Category still has menu items",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailAlreadyExists => "Email is already registered",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a numeric value does not map to an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),
            1006 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2003 => Ok(ErrorCode::TenantRequired),
            2004 => Ok(ErrorCode::TenantMismatch),
            2005 => Ok(ErrorCode::CannotDeleteSelf),

            // Restaurant
            3001 => Ok(ErrorCode::RestaurantNotFound),
            3002 => Ok(ErrorCode::RestaurantInactive),
            3003 => Ok(ErrorCode::RestaurantNotAcceptingOrders),
            3004 => Ok(ErrorCode::SlugAlreadyExists),
            3005 => Ok(ErrorCode::InvalidSlug),
            3006 => Ok(ErrorCode::OrderTypeUnavailable),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidOrderStatus),
            4004 => Ok(ErrorCode::InvalidStatusTransition),
            4005 => Ok(ErrorCode::OrderStatusConflict),
            4006 => Ok(ErrorCode::MenuItemUnavailable),
            4007 => Ok(ErrorCode::InvalidOption),
            4008 => Ok(ErrorCode::InvalidQuantity),
            4009 => Ok(ErrorCode::InvalidOrderType),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::InvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryHasMenuItems),

            // User
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::EmailAlreadyExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
