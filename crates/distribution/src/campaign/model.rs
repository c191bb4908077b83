use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utils::CollectionPreset;
use validator::Validate;

/// 活动下的 NFT 合集参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CollectionParams {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(min = 1, max = 16))]
    pub symbol: String,
    #[validate(url)]
    pub uri: String,
    #[validate(range(min = 1))]
    pub supply: u64,
    /// 单价，按支付币种的最小单位
    pub price: u128,
    pub state: bool,
}

impl From<&CollectionPreset> for CollectionParams {
    fn from(preset: &CollectionPreset) -> Self {
        Self {
            name: preset.name.to_string(),
            symbol: preset.symbol.to_string(),
            uri: preset.uri.to_string(),
            supply: preset.supply,
            price: preset.price,
            state: preset.state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignCollection {
    pub params: CollectionParams,
    pub minted: u64,
    /// token id -> 持有人
    pub owners: BTreeMap<u64, Address>,
}

impl CampaignCollection {
    pub fn new(params: CollectionParams) -> Self {
        Self {
            params,
            minted: 0,
            owners: BTreeMap::new(),
        }
    }

    pub fn remaining(&self) -> u64 {
        self.params.supply.saturating_sub(self.minted)
    }
}

/// 募资活动
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Campaign {
    pub id: u64,
    pub goal: u128,
    pub funds_raised: u128,
    pub active: bool,
    pub collections: Vec<CampaignCollection>,
}

impl Campaign {
    pub fn goal_reached(&self) -> bool {
        self.funds_raised >= self.goal
    }
}
