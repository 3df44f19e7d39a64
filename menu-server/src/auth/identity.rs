//! 调用者身份
//!
//! 由 [`require_auth`](super::require_auth) 从 JWT Claims 构造并注入请求扩展。
//! 写操作的租户 ID 一律取自这里，而不是请求体。

use shared::models::Role;

use crate::AppError;
use crate::auth::Claims;
use crate::security_log;
use shared::error::ErrorCode;

/// 已认证的调用者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub restaurant_id: Option<String>,
}

impl TryFrom<Claims> for Identity {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role: Role = claims.role.parse()?;
        if role.requires_restaurant() && claims.restaurant_id.is_none() {
            return Err(format!("role {role} requires restaurantId"));
        }
        Ok(Self {
            user_id: claims.sub,
            email: claims.email,
            role,
            restaurant_id: claims.restaurant_id,
        })
    }
}

impl Identity {
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// 调用者所属餐厅 ID
    ///
    /// # 错误
    ///
    /// 未绑定餐厅的身份 (超级管理员) 返回 403 TenantRequired
    pub fn tenant_id(&self) -> Result<&str, AppError> {
        self.restaurant_id.as_deref().ok_or_else(|| {
            AppError::business_rule(
                ErrorCode::TenantRequired,
                "This action requires a restaurant account",
            )
        })
    }

    /// 校验资源属于调用者的餐厅
    pub fn ensure_tenant(&self, restaurant_id: &str) -> Result<(), AppError> {
        let own = self.tenant_id()?;
        if own != restaurant_id {
            security_log!(
                "tenant_mismatch",
                user_id = self.user_id.as_str(),
                own_restaurant = own,
                target_restaurant = restaurant_id
            );
            return Err(AppError::business_rule(
                ErrorCode::TenantMismatch,
                "Resource belongs to another restaurant",
            ));
        }
        Ok(())
    }
}
