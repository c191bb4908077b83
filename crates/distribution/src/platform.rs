//! 购买流程：校验 → 按分组分账 → 账本原子结算

use crate::access::AccessControl;
use crate::campaign::CampaignRegistry;
use crate::error::Result;
use crate::group::GroupRegistry;
use crate::ledger::{Ledger, LedgerBatch};
use crate::types::{Distribution, PaymentToken, Transfer, NATIVE};
use crate::vendor::Vendor;
use ethers::types::Address;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseReceipt {
    pub buyer: Address,
    pub group_key: String,
    pub token: PaymentToken,
    pub collection_index: usize,
    /// 购买数量（合集代币）
    pub amount: u128,
    /// 实际支付金额
    pub cost: u128,
    pub distribution: Distribution,
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NftReceipt {
    pub buyer: Address,
    pub campaign_id: u64,
    pub collection_index: usize,
    pub token_id: u64,
    pub token: PaymentToken,
    pub cost: u128,
    pub distribution: Distribution,
    pub transfers: Vec<Transfer>,
}

/// 平台全部状态
#[derive(Debug, Clone)]
pub struct Platform {
    pub access: AccessControl,
    pub groups: GroupRegistry,
    pub vendor: Vendor,
    pub campaigns: CampaignRegistry,
    pub ledger: Ledger,
    treasury: Address,
}

impl Platform {
    pub fn new(deployer: Address, treasury: Address, max_recipients: Option<usize>) -> Self {
        Self {
            access: AccessControl::new(deployer),
            groups: GroupRegistry::with_max_recipients(max_recipients),
            vendor: Vendor::new(),
            campaigns: CampaignRegistry::new(),
            ledger: Ledger::new(),
            treasury,
        }
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }

    /// 用 ERC20 购买合集代币
    pub fn buy_with_token(
        &mut self,
        buyer: Address,
        group_key: &str,
        token: Address,
        collection_index: usize,
        amount: u128,
    ) -> Result<PurchaseReceipt> {
        let (payment, cost) = self.vendor.prepare_purchase(token, false, collection_index, amount)?;
        self.vendor_checkout(buyer, group_key, payment, collection_index, amount, cost)
    }

    /// 用原生币购买合集代币
    pub fn buy_native(
        &mut self,
        buyer: Address,
        group_key: &str,
        collection_index: usize,
        amount: u128,
    ) -> Result<PurchaseReceipt> {
        let (payment, cost) = self.vendor.prepare_purchase(*NATIVE, true, collection_index, amount)?;
        self.vendor_checkout(buyer, group_key, payment, collection_index, amount, cost)
    }

    pub fn buy_nft(
        &mut self,
        buyer: Address,
        campaign_id: u64,
        collection_index: usize,
        token: PaymentToken,
        group_key: &str,
    ) -> Result<NftReceipt> {
        let cost = self.campaigns.prepare_purchase(campaign_id, collection_index, token)?;
        let (distribution, transfers) = self.checkout(buyer, group_key, token, cost, LedgerBatch::new())?;
        let token_id = self.campaigns.record_mint(campaign_id, collection_index, buyer, cost)?;

        Ok(NftReceipt {
            buyer,
            campaign_id,
            collection_index,
            token_id,
            token,
            cost,
            distribution,
            transfers,
        })
    }

    fn vendor_checkout(
        &mut self,
        buyer: Address,
        group_key: &str,
        payment: PaymentToken,
        collection_index: usize,
        amount: u128,
        cost: u128,
    ) -> Result<PurchaseReceipt> {
        let collection = self.vendor.collection(collection_index)?.address;
        // 合集代币与付款在同一批次内入账
        let delivery = LedgerBatch::new().credit(PaymentToken::Erc20(collection), buyer, amount);
        let (distribution, transfers) = self.checkout(buyer, group_key, payment, cost, delivery)?;

        Ok(PurchaseReceipt {
            buyer,
            group_key: group_key.to_string(),
            token: payment,
            collection_index,
            amount,
            cost,
            distribution,
            transfers,
        })
    }

    fn checkout(
        &mut self,
        buyer: Address,
        group_key: &str,
        token: PaymentToken,
        cost: u128,
        batch: LedgerBatch,
    ) -> Result<(Distribution, Vec<Transfer>)> {
        let distribution = self.groups.distribute(cost, group_key)?;
        let transfers = distribution.transfers(self.treasury);
        self.ledger.apply(batch.pay(buyer, token, &transfers)?)?;

        info!(
            "💰 {:?} 支付 {} ({:?})，分组 '{}' 分出 {}，金库 {}",
            buyer,
            cost,
            token,
            group_key,
            distribution.total_paid(),
            distribution.remainder
        );
        Ok((distribution, transfers))
    }
}
