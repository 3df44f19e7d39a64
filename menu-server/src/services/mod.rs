//! 业务服务
//!
//! - [`DirectoryService`]: 公开的餐厅与菜单查询
//! - [`onboarding`]: 餐厅注册与开通
//! - [`stats`]: 仪表盘与平台统计

pub mod directory;
pub mod onboarding;
pub mod stats;

pub use directory::{DirectoryService, MenuPage};
