use super::model::{Campaign, CampaignCollection, CollectionParams};
use crate::access::AdminCapability;
use crate::error::{InhabitError, Result};
use crate::types::PaymentToken;
use ethers::types::Address;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};
use validator::Validate;

/// 活动注册表，同时维护 NFT 购买可用的支付币种
#[derive(Debug, Clone, Default)]
pub struct CampaignRegistry {
    campaigns: BTreeMap<u64, Campaign>,
    campaign_count: u64,
    accepted_tokens: BTreeSet<PaymentToken>,
}

impl CampaignRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn campaign_count(&self) -> u64 {
        self.campaign_count
    }

    pub fn get_campaign(&self, id: u64) -> Option<&Campaign> {
        self.campaigns.get(&id)
    }

    /// 活动 id 从 1 开始递增
    pub fn create_campaign(&mut self, cap: &AdminCapability, goal: u128, collections: Vec<CollectionParams>) -> Result<u64> {
        if goal == 0 {
            return Err(InhabitError::InvalidAmount);
        }
        if collections.is_empty() {
            return Err(InhabitError::EmptyArray);
        }
        for params in &collections {
            params.validate()?;
            if params.price == 0 {
                return Err(InhabitError::InvalidAmount);
            }
        }

        self.campaign_count += 1;
        let id = self.campaign_count;
        let count = collections.len();
        self.campaigns.insert(
            id,
            Campaign {
                id,
                goal,
                funds_raised: 0,
                active: true,
                collections: collections.into_iter().map(CampaignCollection::new).collect(),
            },
        );
        info!("✅ {:?} 创建活动 #{} 目标 {}，合集 {} 个", cap.account(), id, goal, count);
        Ok(id)
    }

    pub fn update_campaign_status(&mut self, cap: &AdminCapability, id: u64, active: bool) -> Result<()> {
        let campaign = self.campaigns.get_mut(&id).ok_or(InhabitError::CampaignNotFound(id))?;
        if campaign.active == active {
            return Err(InhabitError::SameState);
        }
        campaign.active = active;
        info!("✅ {:?} 更新活动 #{} active={}", cap.account(), id, active);
        Ok(())
    }

    pub fn add_to_tokens(&mut self, cap: &AdminCapability, token: PaymentToken) -> Result<()> {
        if token.address().is_zero() {
            return Err(InhabitError::ZeroAddress);
        }
        if !self.accepted_tokens.insert(token) {
            return Err(InhabitError::TokenAlreadyAdded(token.address()));
        }
        info!("✅ {:?} 添加活动支付币种 {:?}", cap.account(), token);
        Ok(())
    }

    pub fn remove_from_tokens(&mut self, cap: &AdminCapability, token: PaymentToken) -> Result<()> {
        if !self.accepted_tokens.remove(&token) {
            return Err(InhabitError::TokenNotFound(token.address()));
        }
        info!("✅ {:?} 移除活动支付币种 {:?}", cap.account(), token);
        Ok(())
    }

    pub fn is_token_accepted(&self, token: &PaymentToken) -> bool {
        self.accepted_tokens.contains(token)
    }

    /// 购买前的全部校验，返回应付金额；通过后 record_mint 不会失败
    pub fn prepare_purchase(&self, id: u64, index: usize, token: PaymentToken) -> Result<u128> {
        let campaign = self.campaigns.get(&id).ok_or(InhabitError::CampaignNotFound(id))?;
        if !campaign.active {
            warn!("❌ 活动 #{} 未激活", id);
            return Err(InhabitError::CampaignNotActive(id));
        }
        let collection = campaign
            .collections
            .get(index)
            .ok_or(InhabitError::CollectionNotFound(index))?;
        if !collection.params.state {
            return Err(InhabitError::CollectionNotActive(index));
        }
        if collection.remaining() == 0 {
            warn!("❌ 活动 #{} 合集 {} 已售罄", id, collection.params.symbol);
            return Err(InhabitError::SupplyExceeded);
        }
        if !self.is_token_accepted(&token) {
            return Err(InhabitError::TokenNotAccepted(token.address()));
        }

        let cost = collection.params.price;
        campaign
            .funds_raised
            .checked_add(cost)
            .ok_or(InhabitError::ArithmeticOverflow)?;
        Ok(cost)
    }

    /// 记录铸造并返回 token id（每个合集从 1 开始）
    pub fn record_mint(&mut self, id: u64, index: usize, buyer: Address, cost: u128) -> Result<u64> {
        let campaign = self.campaigns.get_mut(&id).ok_or(InhabitError::CampaignNotFound(id))?;
        let funds_raised = campaign
            .funds_raised
            .checked_add(cost)
            .ok_or(InhabitError::ArithmeticOverflow)?;
        let collection = campaign
            .collections
            .get_mut(index)
            .ok_or(InhabitError::CollectionNotFound(index))?;
        if collection.remaining() == 0 {
            return Err(InhabitError::SupplyExceeded);
        }

        collection.minted += 1;
        let token_id = collection.minted;
        collection.owners.insert(token_id, buyer);
        campaign.funds_raised = funds_raised;
        info!(
            "🎉 活动 #{} 合集 {} 铸造 #{} 给 {:?}，累计募资 {}",
            id, collection.params.symbol, token_id, buyer, funds_raised
        );
        Ok(token_id)
    }

    pub fn owner_of(&self, id: u64, index: usize, token_id: u64) -> Option<Address> {
        self.campaigns
            .get(&id)
            .and_then(|c| c.collections.get(index))
            .and_then(|c| c.owners.get(&token_id))
            .copied()
    }
}
