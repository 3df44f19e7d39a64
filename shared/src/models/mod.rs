//! Domain models
//!
//! Documents are persisted as camelCase JSON. Timestamps are UTC epoch
//! milliseconds; money is `f64` rounded to two decimals at computation time.

pub mod category;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod user;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use menu_item::{
    MenuItem, MenuItemCreate, MenuItemUpdate, OptionChoice, OptionGroup, OptionType,
};
pub use order::{
    CustomerInfo, LineItem, Order, OrderStatus, OrderType, PaymentStatus, SelectedOption,
};
pub use restaurant::{
    Address, ContactInfo, OperatingHours, Restaurant, RestaurantSettings, RestaurantUpdate,
    SettingsUpdate, Theme,
};
pub use user::{Role, User, UserView};

pub(crate) fn default_true() -> bool {
    true
}
