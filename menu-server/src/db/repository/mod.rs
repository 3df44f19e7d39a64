//! Repository Module
//!
//! Typed CRUD over the document store. Every tenant-owned query takes the
//! restaurant id explicitly.

pub mod category;
pub mod menu_item;
pub mod order;
pub mod restaurant;
pub mod user;

pub use category::CategoryRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use restaurant::RestaurantRepository;
pub use user::{UserPatch, UserRepository};
