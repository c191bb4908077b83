use crate::error::{InhabitError, Result};
use crate::fee;
use crate::types::{total_share_bps, Distribution, Group, Recipient, MAX_TOTAL_BASIS_POINTS};
use ethers::types::Address;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// 推荐分组注册表
///
/// 以 key 存储分组，同时维护单调递增的计数器用于按序号查询。分组只能被停用，不会被删除。
/// 所有变更在校验全部通过后才写入，失败时注册表保持原样。
#[derive(Debug, Clone, Default)]
pub struct GroupRegistry {
    groups: HashMap<String, Group>,
    keys: Vec<String>,
    max_recipients: Option<usize>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 限制单个分组的收款人数量
    pub fn with_max_recipients(max_recipients: Option<usize>) -> Self {
        Self {
            max_recipients,
            ..Self::default()
        }
    }

    pub fn max_recipients(&self) -> Option<usize> {
        self.max_recipients
    }

    pub fn group_count(&self) -> usize {
        self.keys.len()
    }

    pub fn get_group(&self, key: &str) -> Option<&Group> {
        self.groups.get(key)
    }

    pub fn group_by_index(&self, index: usize) -> Result<&Group> {
        self.keys
            .get(index)
            .and_then(|key| self.groups.get(key))
            .ok_or(InhabitError::IndexOutOfBounds(index))
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.keys.iter().filter_map(|key| self.groups.get(key))
    }

    pub fn create_group(&mut self, key: &str, active: bool, recipients: Vec<Recipient>) -> Result<&Group> {
        if key.is_empty() {
            return Err(InhabitError::EmptyKey);
        }
        if self.groups.contains_key(key) {
            warn!("❌ 分组已存在: {}", key);
            return Err(InhabitError::GroupAlreadyExists(key.to_string()));
        }
        validate_new_recipients(&[], &recipients)?;
        self.check_capacity(recipients.len())?;
        check_total(&recipients)?;

        let group = Group {
            key: key.to_string(),
            active,
            recipients,
        };
        info!(
            "✅ 创建分组 {} (active={}, 收款人数={}, 总基点={})",
            key,
            active,
            group.recipients.len(),
            group.total_share_bps()
        );
        self.keys.push(key.to_string());
        Ok(&*self.groups.entry(key.to_string()).or_insert(group))
    }

    pub fn add_recipients(&mut self, key: &str, new_recipients: Vec<Recipient>) -> Result<&Group> {
        let group = self.group_mut(key)?;
        if new_recipients.is_empty() {
            return Err(InhabitError::EmptyArray);
        }
        validate_new_recipients(&group.recipients, &new_recipients)?;

        let mut next = group.recipients.clone();
        next.extend(new_recipients);
        let count = next.len();
        check_total(&next)?;
        self.check_capacity(count)?;

        let group = self.group_mut(key)?;
        group.recipients = next;
        info!("✅ 分组 {} 新增收款人，当前 {} 人", key, count);
        Ok(&*group)
    }

    /// 更新已有收款人的分成，保持原有顺序
    pub fn update_recipients(&mut self, key: &str, updates: Vec<Recipient>) -> Result<&Group> {
        let group = self.group_mut(key)?;
        if updates.is_empty() {
            return Err(InhabitError::EmptyArray);
        }

        let mut next = group.recipients.clone();
        let mut seen = HashSet::new();
        for update in &updates {
            if update.account.is_zero() {
                return Err(InhabitError::ZeroAddress);
            }
            if !seen.insert(update.account) {
                return Err(InhabitError::DuplicateRecipient(update.account));
            }
            let position = next
                .iter()
                .position(|r| r.account == update.account)
                .ok_or(InhabitError::RecipientNotFound(update.account))?;
            next[position].share_bps = update.share_bps;
        }
        check_total(&next)?;

        group.recipients = next;
        info!("✅ 分组 {} 更新 {} 个收款人的分成", key, updates.len());
        Ok(&*group)
    }

    pub fn remove_recipients(&mut self, key: &str, accounts: Vec<Address>) -> Result<&Group> {
        let group = self.group_mut(key)?;
        if accounts.is_empty() {
            return Err(InhabitError::EmptyArray);
        }

        let mut removed = HashSet::new();
        for account in &accounts {
            if account.is_zero() {
                return Err(InhabitError::ZeroAddress);
            }
            if group.position_of(account).is_none() {
                return Err(InhabitError::RecipientNotFound(*account));
            }
            if !removed.insert(*account) {
                return Err(InhabitError::DuplicateRecipient(*account));
            }
        }

        group.recipients.retain(|r| !removed.contains(&r.account));
        info!("✅ 分组 {} 移除 {} 个收款人", key, removed.len());
        Ok(&*group)
    }

    pub fn update_group_status(&mut self, key: &str, active: bool) -> Result<&Group> {
        let group = self.group_mut(key)?;
        if group.active == active {
            warn!("❌ 分组 {} 状态未变化 (active={})", key, active);
            return Err(InhabitError::SameState);
        }
        group.active = active;
        info!("✅ 分组 {} 状态更新为 active={}", key, active);
        Ok(&*group)
    }

    /// 按分组计算分账；空 key 表示不走推荐，全部归金库
    pub fn distribute(&self, amount: u128, key: &str) -> Result<Distribution> {
        if key.is_empty() {
            return Ok(fee::undistributed(amount));
        }
        let group = self
            .groups
            .get(key)
            .ok_or_else(|| InhabitError::GroupNotFound(key.to_string()))?;
        fee::distribute(amount, group)
    }

    fn group_mut(&mut self, key: &str) -> Result<&mut Group> {
        self.groups
            .get_mut(key)
            .ok_or_else(|| InhabitError::GroupNotFound(key.to_string()))
    }

    fn check_capacity(&self, count: usize) -> Result<()> {
        match self.max_recipients {
            Some(max) if count > max => Err(InhabitError::TooManyRecipients { count, max }),
            _ => Ok(()),
        }
    }
}

/// 单个分成超过 100% 时直接拒绝，不必再求和
fn check_total(recipients: &[Recipient]) -> Result<()> {
    if let Some(oversized) = recipients
        .iter()
        .find(|r| r.share_bps as u64 > MAX_TOTAL_BASIS_POINTS)
    {
        return Err(InhabitError::PercentageExceeded {
            total: oversized.share_bps as u64,
        });
    }
    let total = total_share_bps(recipients);
    if total > MAX_TOTAL_BASIS_POINTS {
        return Err(InhabitError::PercentageExceeded { total });
    }
    Ok(())
}

/// 新收款人不能是零地址，也不能与已有或同批次的收款人重复
fn validate_new_recipients(existing: &[Recipient], incoming: &[Recipient]) -> Result<()> {
    let mut seen: HashSet<Address> = existing.iter().map(|r| r.account).collect();
    for recipient in incoming {
        if recipient.account.is_zero() {
            return Err(InhabitError::ZeroAddress);
        }
        if !seen.insert(recipient.account) {
            return Err(InhabitError::DuplicateRecipient(recipient.account));
        }
    }
    Ok(())
}
