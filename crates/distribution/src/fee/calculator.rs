use crate::error::{InhabitError, Result};
use crate::types::{Distribution, Group, Payout, BASIS_POINTS_DENOMINATOR};
use tracing::debug;

/// 按基点计算手续费：floor(amount * basis_points / 10000)
///
/// 不对 basis_points 做上限裁剪，超过 10000 时结果会大于 amount。
/// 拆成商和余数两段相乘，basis_points <= 10000 时不会溢出。
pub fn calculate_fee(amount: u128, basis_points: u16) -> Result<u128> {
    let bps = basis_points as u128;
    let quotient = amount / BASIS_POINTS_DENOMINATOR;
    let rest = amount % BASIS_POINTS_DENOMINATOR;

    quotient
        .checked_mul(bps)
        .and_then(|v| v.checked_add(rest * bps / BASIS_POINTS_DENOMINATOR))
        .ok_or(InhabitError::ArithmeticOverflow)
}

/// 按分组内收款人的存储顺序逐个计算分成，剩余部分计入余数
pub fn distribute(amount: u128, group: &Group) -> Result<Distribution> {
    if !group.active {
        return Err(InhabitError::GroupNotActive(group.key.clone()));
    }

    let mut payouts = Vec::with_capacity(group.recipients.len());
    let mut remainder = amount;
    for recipient in &group.recipients {
        let payout = calculate_fee(amount, recipient.share_bps)?;
        remainder = remainder.checked_sub(payout).ok_or(InhabitError::ArithmeticOverflow)?;
        debug!("💸 分组 {} 收款人 {:?} 分得 {}", group.key, recipient.account, payout);
        payouts.push(Payout {
            recipient: *recipient,
            amount: payout,
        });
    }

    Ok(Distribution { payouts, remainder })
}

/// 不走推荐分组时全部金额归金库
pub fn undistributed(amount: u128) -> Distribution {
    Distribution {
        payouts: vec![],
        remainder: amount,
    }
}
