//! 角色管理（Admin / User / Relayer）
//!
//! 分组注册表本身不做权限判断，调用方先通过 [`AccessControl::require_admin`] 拿到
//! [`AdminCapability`]，再执行需要管理员权限的操作。
//! Relayer 代用户提交元交易，由 [`AccessControl::resolve_sender`] 换成真实发起人。

use crate::error::{InhabitError, Result};
use ethers::types::Address;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Admin,
    User,
    Relayer,
}

/// 管理员凭证，只能由 AccessControl 签发
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminCapability {
    account: Address,
}

impl AdminCapability {
    pub fn account(&self) -> Address {
        self.account
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    roles: HashMap<Address, HashSet<Role>>,
}

impl AccessControl {
    /// 部署者默认拥有管理员角色
    pub fn new(deployer: Address) -> Self {
        let mut access = Self::default();
        access.grant(deployer, Role::Admin);
        access
    }

    pub fn has_role(&self, account: &Address, role: Role) -> bool {
        self.roles.get(account).map_or(false, |roles| roles.contains(&role))
    }

    pub fn is_admin(&self, account: &Address) -> bool {
        self.has_role(account, Role::Admin)
    }

    pub fn is_user(&self, account: &Address) -> bool {
        self.has_role(account, Role::User)
    }

    pub fn is_relayer(&self, account: &Address) -> bool {
        self.has_role(account, Role::Relayer)
    }

    pub fn require_admin(&self, caller: Address) -> Result<AdminCapability> {
        if !self.is_admin(&caller) {
            warn!("❌ 非管理员调用: {:?}", caller);
            return Err(InhabitError::Unauthorized(caller));
        }
        Ok(AdminCapability { account: caller })
    }

    pub fn add_admin(&mut self, caller: Address, account: Address) -> Result<()> {
        self.require_admin(caller)?;
        if account.is_zero() {
            return Err(InhabitError::ZeroAddress);
        }
        self.grant(account, Role::Admin);
        info!("✅ {:?} 授予 {:?} 管理员角色", caller, account);
        Ok(())
    }

    pub fn add_user(&mut self, caller: Address, account: Address) -> Result<()> {
        self.require_admin(caller)?;
        if account.is_zero() {
            return Err(InhabitError::ZeroAddress);
        }
        self.grant(account, Role::User);
        info!("✅ {:?} 授予 {:?} 用户角色", caller, account);
        Ok(())
    }

    pub fn remove_user(&mut self, caller: Address, account: Address) -> Result<()> {
        self.require_admin(caller)?;
        self.revoke(&account, Role::User);
        info!("✅ {:?} 移除 {:?} 用户角色", caller, account);
        Ok(())
    }

    pub fn add_relayer(&mut self, caller: Address, relayer: Address) -> Result<()> {
        self.require_admin(caller)?;
        if relayer.is_zero() {
            return Err(InhabitError::ZeroAddress);
        }
        self.grant(relayer, Role::Relayer);
        info!("✅ {:?} 添加 relayer {:?}", caller, relayer);
        Ok(())
    }

    pub fn remove_relayer(&mut self, caller: Address, relayer: Address) -> Result<()> {
        self.require_admin(caller)?;
        self.revoke(&relayer, Role::Relayer);
        info!("✅ {:?} 移除 relayer {:?}", caller, relayer);
        Ok(())
    }

    /// 元交易的真实发起人：只有 relayer 可以代 signer 提交
    pub fn resolve_sender(&self, caller: Address, signer: Address) -> Result<Address> {
        if !self.is_relayer(&caller) {
            warn!("❌ 非 relayer 代提交: {:?} -> {:?}", caller, signer);
            return Err(InhabitError::NotRelayer(caller));
        }
        if signer.is_zero() {
            return Err(InhabitError::ZeroAddress);
        }
        Ok(signer)
    }

    /// 放弃自己的管理员角色，未持有时为空操作
    pub fn renounce_admin(&mut self, caller: Address) {
        self.revoke(&caller, Role::Admin);
        info!("🔔 {:?} 放弃管理员角色", caller);
    }

    fn grant(&mut self, account: Address, role: Role) {
        self.roles.entry(account).or_default().insert(role);
    }

    fn revoke(&mut self, account: &Address, role: Role) {
        if let Some(roles) = self.roles.get_mut(account) {
            roles.remove(&role);
            if roles.is_empty() {
                self.roles.remove(account);
            }
        }
    }
}
