use crate::error::{InhabitError, Result};
use crate::types::{PaymentToken, Transfer};
use ethers::types::Address;
use std::collections::HashMap;
use tracing::{debug, info};

/// 单笔记账：某币种下某地址的增减额
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    pub token: PaymentToken,
    pub account: Address,
    pub amount: u128,
}

/// 一次原子提交的借贷集合
#[derive(Debug, Clone, Default)]
pub struct LedgerBatch {
    debits: Vec<Movement>,
    credits: Vec<Movement>,
}

impl LedgerBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debit(mut self, token: PaymentToken, account: Address, amount: u128) -> Self {
        self.debits.push(Movement { token, account, amount });
        self
    }

    pub fn credit(mut self, token: PaymentToken, account: Address, amount: u128) -> Self {
        self.credits.push(Movement { token, account, amount });
        self
    }

    /// 付款人向多个收款人转账
    pub fn pay(mut self, payer: Address, token: PaymentToken, transfers: &[Transfer]) -> Result<Self> {
        let total = transfers
            .iter()
            .try_fold(0u128, |acc, t| acc.checked_add(t.amount))
            .ok_or(InhabitError::ArithmeticOverflow)?;
        self = self.debit(token, payer, total);
        for transfer in transfers {
            self = self.credit(token, transfer.to, transfer.amount);
        }
        Ok(self)
    }
}

/// 内存账本：按 (币种, 地址) 记录余额
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<(PaymentToken, Address), u128>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, token: PaymentToken, account: &Address) -> u128 {
        self.balances.get(&(token, *account)).copied().unwrap_or(0)
    }

    pub fn mint(&mut self, token: PaymentToken, to: Address, amount: u128) -> Result<()> {
        self.apply(LedgerBatch::new().credit(token, to, amount))
    }

    /// 先在副本上结算全部借贷，全部成功后才写回；任何一步失败账本不变
    pub fn apply(&mut self, batch: LedgerBatch) -> Result<()> {
        let mut staged: HashMap<(PaymentToken, Address), u128> = HashMap::new();

        for debit in &batch.debits {
            let key = (debit.token, debit.account);
            let available = *staged.entry(key).or_insert_with(|| self.balance_of(debit.token, &debit.account));
            let next = available.checked_sub(debit.amount).ok_or(InhabitError::InsufficientBalance {
                required: debit.amount,
                available,
            })?;
            staged.insert(key, next);
        }
        for credit in &batch.credits {
            let key = (credit.token, credit.account);
            let current = *staged.entry(key).or_insert_with(|| self.balance_of(credit.token, &credit.account));
            let next = current.checked_add(credit.amount).ok_or(InhabitError::ArithmeticOverflow)?;
            staged.insert(key, next);
        }

        for ((token, account), balance) in staged {
            debug!("📒 {:?} {:?} 余额 -> {}", token, account, balance);
            self.balances.insert((token, account), balance);
        }
        Ok(())
    }

    /// 付款并按转账列表入账，返回实际扣款总额
    pub fn settle(&mut self, payer: Address, token: PaymentToken, transfers: &[Transfer]) -> Result<u128> {
        let batch = LedgerBatch::new().pay(payer, token, transfers)?;
        let total: u128 = transfers.iter().map(|t| t.amount).sum();
        self.apply(batch)?;
        info!("✅ 结算完成: 付款人 {:?} 支付 {} ({:?})，共 {} 笔转账", payer, total, token, transfers.len());
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn test_mint_and_balance() {
        let mut ledger = Ledger::new();
        let token = PaymentToken::Erc20(account(100));
        ledger.mint(token, account(1), 50).unwrap();
        ledger.mint(token, account(1), 25).unwrap();
        assert_eq!(ledger.balance_of(token, &account(1)), 75);
        assert_eq!(ledger.balance_of(PaymentToken::Native, &account(1)), 0);
    }

    #[test]
    fn test_settle_moves_funds() {
        let mut ledger = Ledger::new();
        let token = PaymentToken::Native;
        ledger.mint(token, account(1), 100).unwrap();

        let transfers = vec![
            Transfer { to: account(2), amount: 70 },
            Transfer { to: account(3), amount: 30 },
        ];
        assert_eq!(ledger.settle(account(1), token, &transfers).unwrap(), 100);
        assert_eq!(ledger.balance_of(token, &account(1)), 0);
        assert_eq!(ledger.balance_of(token, &account(2)), 70);
        assert_eq!(ledger.balance_of(token, &account(3)), 30);
    }

    #[test]
    fn test_settle_is_all_or_nothing() {
        let mut ledger = Ledger::new();
        let token = PaymentToken::Native;
        ledger.mint(token, account(1), 50).unwrap();

        let transfers = vec![
            Transfer { to: account(2), amount: 40 },
            Transfer { to: account(3), amount: 40 },
        ];
        let err = ledger.settle(account(1), token, &transfers).unwrap_err();
        assert_eq!(err, InhabitError::InsufficientBalance { required: 80, available: 50 });
        assert_eq!(ledger.balance_of(token, &account(1)), 50);
        assert_eq!(ledger.balance_of(token, &account(2)), 0);
    }

    #[test]
    fn test_overflowing_credit_leaves_ledger_untouched() {
        let mut ledger = Ledger::new();
        let token = PaymentToken::Native;
        ledger.mint(token, account(1), 10).unwrap();
        ledger.mint(token, account(2), u128::MAX).unwrap();

        let batch = LedgerBatch::new().debit(token, account(1), 10).credit(token, account(2), 10);
        assert_eq!(ledger.apply(batch).unwrap_err(), InhabitError::ArithmeticOverflow);
        assert_eq!(ledger.balance_of(token, &account(1)), 10);
    }

    #[test]
    fn test_self_transfer_nets_out() {
        let mut ledger = Ledger::new();
        let token = PaymentToken::Native;
        ledger.mint(token, account(1), 10).unwrap();
        ledger
            .settle(account(1), token, &[Transfer { to: account(1), amount: 10 }])
            .unwrap();
        assert_eq!(ledger.balance_of(token, &account(1)), 10);
    }
}
