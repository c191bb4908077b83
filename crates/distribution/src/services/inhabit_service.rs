use crate::campaign::{Campaign, CollectionParams};
use crate::error::Result;
use crate::fee;
use crate::platform::{NftReceipt, Platform, PurchaseReceipt};
use crate::types::{Distribution, Group, PaymentToken, Recipient};
use crate::vendor::TokenConfig;
use async_trait::async_trait;
use ethers::types::Address;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use utils::{AppConfig, CAMPAIGN_TOKEN_SYMBOLS};

pub type DynInhabitService = Arc<dyn InhabitServiceTrait + Send + Sync>;

/// 对外服务接口：需要管理员权限的操作先校验 caller
#[async_trait]
pub trait InhabitServiceTrait {
    // 分组
    async fn create_group(&self, caller: Address, key: String, active: bool, recipients: Vec<Recipient>) -> Result<Group>;
    async fn add_recipients(&self, caller: Address, key: String, recipients: Vec<Recipient>) -> Result<Group>;
    async fn update_recipients(&self, caller: Address, key: String, recipients: Vec<Recipient>) -> Result<Group>;
    async fn remove_recipients(&self, caller: Address, key: String, accounts: Vec<Address>) -> Result<Group>;
    async fn update_group_status(&self, caller: Address, key: String, active: bool) -> Result<Group>;
    async fn get_group(&self, key: String) -> Option<Group>;
    async fn group_by_index(&self, index: usize) -> Result<Group>;
    async fn group_count(&self) -> usize;

    // 分账
    async fn calculate_fee(&self, amount: u128, basis_points: u16) -> Result<u128>;
    async fn preview_distribution(&self, amount: u128, key: String) -> Result<Distribution>;

    // 售卖
    async fn add_token(&self, caller: Address, config: TokenConfig) -> Result<()>;
    async fn update_token_status(&self, caller: Address, token: Address, active: bool) -> Result<()>;
    async fn set_price(&self, caller: Address, price: u128) -> Result<()>;
    async fn add_collection(&self, caller: Address, address: Address, price: u128, active: bool) -> Result<usize>;
    async fn update_collection_status(&self, caller: Address, index: usize, active: bool) -> Result<()>;
    async fn quote(&self, index: usize, amount: u128) -> Result<u128>;
    async fn buy_with_token(
        &self,
        buyer: Address,
        key: String,
        token: Address,
        index: usize,
        amount: u128,
    ) -> Result<PurchaseReceipt>;
    async fn buy_native(&self, buyer: Address, key: String, index: usize, amount: u128) -> Result<PurchaseReceipt>;

    // 活动
    async fn create_campaign(&self, caller: Address, goal: u128, collections: Vec<CollectionParams>) -> Result<u64>;
    async fn update_campaign_status(&self, caller: Address, id: u64, active: bool) -> Result<()>;
    async fn get_campaign(&self, id: u64) -> Option<Campaign>;
    async fn add_to_tokens(&self, caller: Address, token: PaymentToken) -> Result<()>;
    async fn remove_from_tokens(&self, caller: Address, token: PaymentToken) -> Result<()>;
    async fn is_token_accepted(&self, token: PaymentToken) -> bool;
    async fn buy_nft(
        &self,
        buyer: Address,
        campaign_id: u64,
        index: usize,
        token: PaymentToken,
        key: String,
    ) -> Result<NftReceipt>;
    /// relayer 代 signer 提交的元交易购买，付款方是 signer
    async fn relay_buy_nft(
        &self,
        relayer: Address,
        signer: Address,
        campaign_id: u64,
        index: usize,
        token: PaymentToken,
        key: String,
    ) -> Result<NftReceipt>;

    // 账本
    async fn fund(&self, caller: Address, token: PaymentToken, to: Address, amount: u128) -> Result<()>;
    async fn balance_of(&self, token: PaymentToken, account: Address) -> u128;

    // 角色
    async fn add_admin(&self, caller: Address, account: Address) -> Result<()>;
    async fn add_user(&self, caller: Address, account: Address) -> Result<()>;
    async fn remove_user(&self, caller: Address, account: Address) -> Result<()>;
    async fn renounce_admin(&self, caller: Address);
    async fn is_admin(&self, account: Address) -> bool;
    async fn is_user(&self, account: Address) -> bool;
    async fn add_relayer(&self, caller: Address, relayer: Address) -> Result<()>;
    async fn remove_relayer(&self, caller: Address, relayer: Address) -> Result<()>;
    async fn is_relayer(&self, account: Address) -> bool;
}

#[derive(Clone)]
pub struct InhabitService {
    state: Arc<Mutex<Platform>>,
}

impl InhabitService {
    pub fn new(platform: Platform) -> Self {
        Self {
            state: Arc::new(Mutex::new(platform)),
        }
    }

    /// 按配置初始化：部署者同时是 relayer，活动默认接受所选网络上的 USDC / USDT
    pub fn from_config(deployer: Address, config: &AppConfig) -> anyhow::Result<Self> {
        let network = config.network_config()?;
        let treasury = config.treasury()?;
        let mut platform = Platform::new(deployer, treasury, config.max_recipients_per_group);

        platform.access.add_relayer(deployer, deployer)?;
        let cap = platform.access.require_admin(deployer)?;
        for symbol in CAMPAIGN_TOKEN_SYMBOLS {
            if let Some(token) = network.payment_token(symbol) {
                platform.campaigns.add_to_tokens(&cap, PaymentToken::from_address(token.address))?;
            }
        }

        info!(
            "🧠 初始化 InhabitService: network={} ({:?}, {} 个确认), treasury={:?}, max_recipients={:?}",
            network.name, network.kind, network.block_confirmations, treasury, config.max_recipients_per_group
        );
        Ok(Self::new(platform))
    }

    pub fn into_dyn(self) -> DynInhabitService {
        Arc::new(self)
    }
}

#[async_trait]
impl InhabitServiceTrait for InhabitService {
    async fn create_group(&self, caller: Address, key: String, active: bool, recipients: Vec<Recipient>) -> Result<Group> {
        let mut state = self.state.lock().await;
        state.access.require_admin(caller)?;
        let group = state.groups.create_group(&key, active, recipients)?;
        Ok(group.clone())
    }

    async fn add_recipients(&self, caller: Address, key: String, recipients: Vec<Recipient>) -> Result<Group> {
        let mut state = self.state.lock().await;
        state.access.require_admin(caller)?;
        let group = state.groups.add_recipients(&key, recipients)?;
        Ok(group.clone())
    }

    async fn update_recipients(&self, caller: Address, key: String, recipients: Vec<Recipient>) -> Result<Group> {
        let mut state = self.state.lock().await;
        state.access.require_admin(caller)?;
        let group = state.groups.update_recipients(&key, recipients)?;
        Ok(group.clone())
    }

    async fn remove_recipients(&self, caller: Address, key: String, accounts: Vec<Address>) -> Result<Group> {
        let mut state = self.state.lock().await;
        state.access.require_admin(caller)?;
        let group = state.groups.remove_recipients(&key, accounts)?;
        Ok(group.clone())
    }

    async fn update_group_status(&self, caller: Address, key: String, active: bool) -> Result<Group> {
        let mut state = self.state.lock().await;
        state.access.require_admin(caller)?;
        let group = state.groups.update_group_status(&key, active)?;
        Ok(group.clone())
    }

    async fn get_group(&self, key: String) -> Option<Group> {
        self.state.lock().await.groups.get_group(&key).cloned()
    }

    async fn group_by_index(&self, index: usize) -> Result<Group> {
        self.state.lock().await.groups.group_by_index(index).cloned()
    }

    async fn group_count(&self) -> usize {
        self.state.lock().await.groups.group_count()
    }

    async fn calculate_fee(&self, amount: u128, basis_points: u16) -> Result<u128> {
        fee::calculate_fee(amount, basis_points)
    }

    async fn preview_distribution(&self, amount: u128, key: String) -> Result<Distribution> {
        self.state.lock().await.groups.distribute(amount, &key)
    }

    async fn add_token(&self, caller: Address, config: TokenConfig) -> Result<()> {
        let mut state = self.state.lock().await;
        let cap = state.access.require_admin(caller)?;
        state.vendor.add_token(&cap, config)
    }

    async fn update_token_status(&self, caller: Address, token: Address, active: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        let cap = state.access.require_admin(caller)?;
        state.vendor.update_token_status(&cap, token, active)
    }

    async fn set_price(&self, caller: Address, price: u128) -> Result<()> {
        let mut state = self.state.lock().await;
        let cap = state.access.require_admin(caller)?;
        state.vendor.set_price(&cap, price)
    }

    async fn add_collection(&self, caller: Address, address: Address, price: u128, active: bool) -> Result<usize> {
        let mut state = self.state.lock().await;
        let cap = state.access.require_admin(caller)?;
        state.vendor.add_collection(&cap, address, price, active)
    }

    async fn update_collection_status(&self, caller: Address, index: usize, active: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        let cap = state.access.require_admin(caller)?;
        state.vendor.update_collection_status(&cap, index, active)
    }

    async fn quote(&self, index: usize, amount: u128) -> Result<u128> {
        self.state.lock().await.vendor.quote(index, amount)
    }

    async fn buy_with_token(
        &self,
        buyer: Address,
        key: String,
        token: Address,
        index: usize,
        amount: u128,
    ) -> Result<PurchaseReceipt> {
        self.state.lock().await.buy_with_token(buyer, &key, token, index, amount)
    }

    async fn buy_native(&self, buyer: Address, key: String, index: usize, amount: u128) -> Result<PurchaseReceipt> {
        self.state.lock().await.buy_native(buyer, &key, index, amount)
    }

    async fn create_campaign(&self, caller: Address, goal: u128, collections: Vec<CollectionParams>) -> Result<u64> {
        let mut state = self.state.lock().await;
        let cap = state.access.require_admin(caller)?;
        state.campaigns.create_campaign(&cap, goal, collections)
    }

    async fn update_campaign_status(&self, caller: Address, id: u64, active: bool) -> Result<()> {
        let mut state = self.state.lock().await;
        let cap = state.access.require_admin(caller)?;
        state.campaigns.update_campaign_status(&cap, id, active)
    }

    async fn get_campaign(&self, id: u64) -> Option<Campaign> {
        self.state.lock().await.campaigns.get_campaign(id).cloned()
    }

    async fn add_to_tokens(&self, caller: Address, token: PaymentToken) -> Result<()> {
        let mut state = self.state.lock().await;
        let cap = state.access.require_admin(caller)?;
        state.campaigns.add_to_tokens(&cap, token)
    }

    async fn remove_from_tokens(&self, caller: Address, token: PaymentToken) -> Result<()> {
        let mut state = self.state.lock().await;
        let cap = state.access.require_admin(caller)?;
        state.campaigns.remove_from_tokens(&cap, token)
    }

    async fn is_token_accepted(&self, token: PaymentToken) -> bool {
        self.state.lock().await.campaigns.is_token_accepted(&token)
    }

    async fn buy_nft(
        &self,
        buyer: Address,
        campaign_id: u64,
        index: usize,
        token: PaymentToken,
        key: String,
    ) -> Result<NftReceipt> {
        self.state.lock().await.buy_nft(buyer, campaign_id, index, token, &key)
    }

    async fn relay_buy_nft(
        &self,
        relayer: Address,
        signer: Address,
        campaign_id: u64,
        index: usize,
        token: PaymentToken,
        key: String,
    ) -> Result<NftReceipt> {
        let mut state = self.state.lock().await;
        let buyer = state.access.resolve_sender(relayer, signer)?;
        state.buy_nft(buyer, campaign_id, index, token, &key)
    }

    async fn fund(&self, caller: Address, token: PaymentToken, to: Address, amount: u128) -> Result<()> {
        let mut state = self.state.lock().await;
        state.access.require_admin(caller)?;
        state.ledger.mint(token, to, amount)?;
        info!("🏦 {:?} 向 {:?} 注入 {} ({:?})", caller, to, amount, token);
        Ok(())
    }

    async fn balance_of(&self, token: PaymentToken, account: Address) -> u128 {
        self.state.lock().await.ledger.balance_of(token, &account)
    }

    async fn add_admin(&self, caller: Address, account: Address) -> Result<()> {
        self.state.lock().await.access.add_admin(caller, account)
    }

    async fn add_user(&self, caller: Address, account: Address) -> Result<()> {
        self.state.lock().await.access.add_user(caller, account)
    }

    async fn remove_user(&self, caller: Address, account: Address) -> Result<()> {
        self.state.lock().await.access.remove_user(caller, account)
    }

    async fn renounce_admin(&self, caller: Address) {
        self.state.lock().await.access.renounce_admin(caller)
    }

    async fn is_admin(&self, account: Address) -> bool {
        self.state.lock().await.access.is_admin(&account)
    }

    async fn is_user(&self, account: Address) -> bool {
        self.state.lock().await.access.is_user(&account)
    }

    async fn add_relayer(&self, caller: Address, relayer: Address) -> Result<()> {
        self.state.lock().await.access.add_relayer(caller, relayer)
    }

    async fn remove_relayer(&self, caller: Address, relayer: Address) -> Result<()> {
        self.state.lock().await.access.remove_relayer(caller, relayer)
    }

    async fn is_relayer(&self, account: Address) -> bool {
        self.state.lock().await.access.is_relayer(&account)
    }
}
