use ethers::types::Address;
use serde::{Deserialize, Serialize};

pub use utils::NATIVE;

/// 10000 基点 = 100%
pub const BASIS_POINTS_DENOMINATOR: u128 = 10_000;
pub const MAX_TOTAL_BASIS_POINTS: u64 = 10_000;

/// 分账收款人
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// 收款地址
    pub account: Address,
    /// 分成比例（基点）
    pub share_bps: u16,
}

impl Recipient {
    pub fn new(account: Address, share_bps: u16) -> Self {
        Self { account, share_bps }
    }
}

/// 推荐分组（也称 campaign group）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub key: String,
    pub active: bool,
    pub recipients: Vec<Recipient>,
}

impl Group {
    pub fn total_share_bps(&self) -> u64 {
        total_share_bps(&self.recipients)
    }

    pub fn position_of(&self, account: &Address) -> Option<usize> {
        self.recipients.iter().position(|r| &r.account == account)
    }
}

/// 饱和累加，收款人再多也不会溢出
pub(crate) fn total_share_bps(recipients: &[Recipient]) -> u64 {
    recipients
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.share_bps as u64))
}

/// 支付币种：原生币或ERC20合约
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaymentToken {
    Native,
    Erc20(Address),
}

impl PaymentToken {
    /// 占位地址 0xEeee...EEeE 映射为原生币
    pub fn from_address(address: Address) -> Self {
        if address == *NATIVE {
            PaymentToken::Native
        } else {
            PaymentToken::Erc20(address)
        }
    }

    pub fn address(&self) -> Address {
        match self {
            PaymentToken::Native => *NATIVE,
            PaymentToken::Erc20(address) => *address,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: u128,
    pub token: PaymentToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Payout {
    pub recipient: Recipient,
    pub amount: u128,
}

/// 单次购买的分账结果，不落库
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub payouts: Vec<Payout>,
    /// 归金库所有的余数（未分配比例 + 取整误差）
    pub remainder: u128,
}

impl Distribution {
    pub fn total_paid(&self) -> u128 {
        self.payouts.iter().map(|p| p.amount).sum()
    }

    pub fn payout_of(&self, account: &Address) -> Option<u128> {
        self.payouts.iter().find(|p| &p.recipient.account == account).map(|p| p.amount)
    }

    /// 展开为实际转账列表，余数转入金库；零金额不产生转账
    pub fn transfers(&self, treasury: Address) -> Vec<Transfer> {
        self.payouts
            .iter()
            .map(|p| Transfer {
                to: p.recipient.account,
                amount: p.amount,
            })
            .chain(std::iter::once(Transfer {
                to: treasury,
                amount: self.remainder,
            }))
            .filter(|t| t.amount > 0)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub to: Address,
    pub amount: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_token_from_sentinel_address() {
        assert_eq!(PaymentToken::from_address(*NATIVE), PaymentToken::Native);
        let usdc = Address::from_low_u64_be(0x05dc);
        assert_eq!(PaymentToken::from_address(usdc), PaymentToken::Erc20(usdc));
        assert_eq!(PaymentToken::Native.address(), *NATIVE);
    }
}
