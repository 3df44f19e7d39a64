use std::sync::Arc;
use std::time::{Duration, Instant};

use shared::models::{Role, User};
use shared::util::{new_id, now_millis};

use crate::auth::{JwtService, RateLimiter, password};
use crate::core::{Config, Result, ServerError};
use crate::db::repository::{
    CategoryRepository, MenuItemRepository, OrderRepository, RestaurantRepository, UserRepository,
};
use crate::db::{DocumentStore, MemoryStore, SqliteStore};
use crate::orders::OrderService;
use crate::services::DirectoryService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求克隆的成本极低。
///
/// # 服务组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | store | 文档存储 (SQLite 或内存) |
/// | jwt_service | JWT 认证服务 |
/// | restaurants / categories / menu_items / orders / users | 类型化仓库 |
/// | directory | 餐厅与菜单查询 |
/// | order_service | 下单与状态流转 |
/// | rate_limiter | 登录/注册限流 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub jwt_service: Arc<JwtService>,
    pub restaurants: RestaurantRepository,
    pub categories: CategoryRepository,
    pub menu_items: MenuItemRepository,
    pub orders: OrderRepository,
    pub users: UserRepository,
    pub directory: DirectoryService,
    pub order_service: OrderService,
    pub rate_limiter: RateLimiter,
    pub started_at: Instant,
}

impl ServerState {
    /// 使用给定的存储构造状态 (测试和 [`initialize()`](Self::initialize) 共用)
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let restaurants = RestaurantRepository::new(store.clone());
        let categories = CategoryRepository::new(store.clone());
        let menu_items = MenuItemRepository::new(store.clone());
        let orders = OrderRepository::new(store.clone());
        let users = UserRepository::new(store.clone());

        let directory =
            DirectoryService::new(restaurants.clone(), categories.clone(), menu_items.clone());
        let order_service = OrderService::new(
            restaurants.clone(),
            menu_items.clone(),
            orders.clone(),
            config.tax_rate,
        );

        Self {
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
            rate_limiter: RateLimiter::new(config.login_rate_limit),
            config: Arc::new(config),
            store,
            restaurants,
            categories,
            menu_items,
            orders,
            users,
            directory,
            order_service,
            started_at: Instant::now(),
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 存储 (`DATABASE_URL=memory` 使用内存存储，否则 SQLite + 迁移)
    /// 2. 仓库与服务
    /// 3. 超级管理员账号 (如已配置)
    pub async fn initialize(config: &Config) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = if config.uses_memory_store() {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(SqliteStore::connect(&config.database_url).await?)
        };

        let state = Self::with_store(config.clone(), store);
        state.bootstrap_super_admin().await?;
        Ok(state)
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 创建配置中的超级管理员 (已存在则跳过)
    pub async fn bootstrap_super_admin(&self) -> Result<()> {
        let (Some(email), Some(password)) = (
            self.config.super_admin_email.as_deref(),
            self.config.super_admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        if self.users.find_by_email(email).await?.is_some() {
            tracing::debug!(email = %email, "Super admin already exists");
            return Ok(());
        }

        let password_hash = password::hash_password(password)
            .map_err(|e| ServerError::Internal(anyhow::anyhow!("hash password: {e}")))?;
        let now = now_millis();
        let user = User {
            id: new_id(),
            email: email.to_string(),
            password_hash,
            name: "Super Admin".to_string(),
            phone: None,
            role: Role::SuperAdmin,
            restaurant_id: None,
            permissions: Role::SuperAdmin.default_permissions(),
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(user).await?;
        tracing::info!(email = %email, "Super admin account created");
        Ok(())
    }

    /// 启动后台任务 (限流表清理)
    pub fn start_background_tasks(&self) {
        let limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                limiter.cleanup();
            }
        });
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
