use super::*;
use crate::error::{ErrorKind, InhabitError};
use crate::types::Recipient;
use ethers::types::Address;

fn account(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

fn r1() -> Address {
    account(1)
}
fn r2() -> Address {
    account(2)
}
fn r3() -> Address {
    account(3)
}

fn registry_with_g1() -> GroupRegistry {
    let mut registry = GroupRegistry::new();
    registry
        .create_group(
            "g1",
            true,
            vec![Recipient::new(r1(), 5000), Recipient::new(r2(), 3000), Recipient::new(r3(), 2000)],
        )
        .unwrap();
    registry
}

#[test]
fn test_scenario_full_split() {
    let registry = registry_with_g1();
    let distribution = registry.distribute(1000, "g1").unwrap();

    let payouts: Vec<(Address, u128)> = distribution
        .payouts
        .iter()
        .map(|p| (p.recipient.account, p.amount))
        .collect();
    assert_eq!(payouts, vec![(r1(), 500), (r2(), 300), (r3(), 200)]);
    assert_eq!(distribution.remainder, 0);
}

#[test]
fn test_scenario_rounding_remainder() {
    let mut registry = GroupRegistry::new();
    registry.create_group("g2", true, vec![Recipient::new(r1(), 7000)]).unwrap();

    let distribution = registry.distribute(3, "g2").unwrap();
    assert_eq!(distribution.payout_of(&r1()), Some(2));
    assert_eq!(distribution.remainder, 1);
}

#[test]
fn test_scenario_percentage_exceeded() {
    let mut registry = GroupRegistry::new();
    let err = registry
        .create_group(
            "g3",
            true,
            vec![Recipient::new(r1(), 5000), Recipient::new(r2(), 5000), Recipient::new(r3(), 2000)],
        )
        .unwrap_err();
    assert_eq!(err, InhabitError::PercentageExceeded { total: 12000 });
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(registry.group_count(), 0);
    assert!(registry.get_group("g3").is_none());
}

#[test]
fn test_scenario_same_state_rejected() {
    let mut registry = registry_with_g1();
    let err = registry.update_group_status("g1", true).unwrap_err();
    assert_eq!(err, InhabitError::SameState);
    assert_eq!(err.kind(), ErrorKind::StateConflict);
}

#[test]
fn test_scenario_unknown_group() {
    let registry = registry_with_g1();
    let err = registry.distribute(100, "unknown").unwrap_err();
    assert_eq!(err, InhabitError::GroupNotFound("unknown".to_string()));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_scenario_remove_preserves_order() {
    let mut registry = registry_with_g1();
    registry.remove_recipients("g1", vec![r1()]).unwrap();

    let group = registry.get_group("g1").unwrap();
    assert_eq!(group.recipients, vec![Recipient::new(r2(), 3000), Recipient::new(r3(), 2000)]);
}

#[test]
fn test_create_group_validation() {
    let mut registry = registry_with_g1();

    assert_eq!(
        registry.create_group("", true, vec![Recipient::new(r1(), 100)]).unwrap_err(),
        InhabitError::EmptyKey
    );
    assert_eq!(
        registry.create_group("g1", true, vec![]).unwrap_err(),
        InhabitError::GroupAlreadyExists("g1".to_string())
    );
    assert_eq!(
        registry
            .create_group("g4", true, vec![Recipient::new(Address::zero(), 100)])
            .unwrap_err(),
        InhabitError::ZeroAddress
    );
    assert_eq!(
        registry
            .create_group("g4", true, vec![Recipient::new(r1(), 100), Recipient::new(r1(), 200)])
            .unwrap_err(),
        InhabitError::DuplicateRecipient(r1())
    );
    assert_eq!(registry.group_count(), 1);
}

#[test]
fn test_group_counter_and_index_lookup() {
    let mut registry = registry_with_g1();
    registry.create_group("g2", false, vec![Recipient::new(r1(), 10000)]).unwrap();

    assert_eq!(registry.group_count(), 2);
    assert_eq!(registry.group_by_index(0).unwrap().key, "g1");
    assert_eq!(registry.group_by_index(1).unwrap().key, "g2");
    assert_eq!(registry.group_by_index(2).unwrap_err(), InhabitError::IndexOutOfBounds(2));

    let keys: Vec<&str> = registry.groups().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["g1", "g2"]);
}

#[test]
fn test_add_recipients() {
    let mut registry = GroupRegistry::new();
    registry.create_group("g", true, vec![Recipient::new(r1(), 5000)]).unwrap();

    assert_eq!(registry.add_recipients("g", vec![]).unwrap_err(), InhabitError::EmptyArray);
    assert_eq!(
        registry.add_recipients("g", vec![Recipient::new(r1(), 100)]).unwrap_err(),
        InhabitError::DuplicateRecipient(r1())
    );
    assert_eq!(
        registry.add_recipients("g", vec![Recipient::new(r2(), 6000)]).unwrap_err(),
        InhabitError::PercentageExceeded { total: 11000 }
    );
    assert_eq!(
        registry.add_recipients("missing", vec![Recipient::new(r2(), 100)]).unwrap_err(),
        InhabitError::GroupNotFound("missing".to_string())
    );

    let group = registry.add_recipients("g", vec![Recipient::new(r2(), 5000)]).unwrap();
    assert_eq!(group.total_share_bps(), 10000);
    assert_eq!(group.recipients[1].account, r2());
}

#[test]
fn test_update_recipients() {
    let mut registry = registry_with_g1();

    assert_eq!(
        registry.update_recipients("g1", vec![Recipient::new(account(9), 100)]).unwrap_err(),
        InhabitError::RecipientNotFound(account(9))
    );
    assert_eq!(
        registry.update_recipients("g1", vec![Recipient::new(r3(), 3000)]).unwrap_err(),
        InhabitError::PercentageExceeded { total: 11000 }
    );
    assert_eq!(
        registry.update_recipients("g1", vec![Recipient::new(Address::zero(), 1)]).unwrap_err(),
        InhabitError::ZeroAddress
    );
    // 失败的批量更新不会留下部分修改
    assert_eq!(
        registry
            .update_recipients("g1", vec![Recipient::new(r1(), 1000), Recipient::new(account(9), 1)])
            .unwrap_err(),
        InhabitError::RecipientNotFound(account(9))
    );
    assert_eq!(registry.get_group("g1").unwrap().recipients[0].share_bps, 5000);

    let group = registry
        .update_recipients("g1", vec![Recipient::new(r2(), 1000), Recipient::new(r1(), 4000)])
        .unwrap();
    let accounts: Vec<Address> = group.recipients.iter().map(|r| r.account).collect();
    assert_eq!(accounts, vec![r1(), r2(), r3()]);
    assert_eq!(group.total_share_bps(), 7000);
}

#[test]
fn test_remove_recipients_errors() {
    let mut registry = registry_with_g1();

    assert_eq!(registry.remove_recipients("g1", vec![]).unwrap_err(), InhabitError::EmptyArray);
    assert_eq!(
        registry.remove_recipients("g1", vec![Address::zero()]).unwrap_err(),
        InhabitError::ZeroAddress
    );
    assert_eq!(
        registry.remove_recipients("g1", vec![r2(), account(9)]).unwrap_err(),
        InhabitError::RecipientNotFound(account(9))
    );
    assert_eq!(
        registry.remove_recipients("g1", vec![r2(), r2()]).unwrap_err(),
        InhabitError::DuplicateRecipient(r2())
    );
    assert_eq!(registry.get_group("g1").unwrap().recipients.len(), 3);
}

#[test]
fn test_status_toggle_and_inactive_distribution() {
    let mut registry = registry_with_g1();

    registry.update_group_status("g1", false).unwrap();
    assert_eq!(
        registry.distribute(1000, "g1").unwrap_err(),
        InhabitError::GroupNotActive("g1".to_string())
    );

    registry.update_group_status("g1", true).unwrap();
    assert!(registry.distribute(1000, "g1").is_ok());

    assert_eq!(
        registry.update_group_status("nope", true).unwrap_err(),
        InhabitError::GroupNotFound("nope".to_string())
    );
}

#[test]
fn test_empty_key_means_no_split() {
    let registry = registry_with_g1();
    let distribution = registry.distribute(777, "").unwrap();
    assert!(distribution.payouts.is_empty());
    assert_eq!(distribution.remainder, 777);
}

#[test]
fn test_recipient_cap() {
    let mut registry = GroupRegistry::with_max_recipients(Some(2));
    assert_eq!(registry.max_recipients(), Some(2));

    assert_eq!(
        registry
            .create_group(
                "big",
                true,
                vec![Recipient::new(r1(), 1), Recipient::new(r2(), 1), Recipient::new(r3(), 1)],
            )
            .unwrap_err(),
        InhabitError::TooManyRecipients { count: 3, max: 2 }
    );

    registry
        .create_group("g", true, vec![Recipient::new(r1(), 1), Recipient::new(r2(), 1)])
        .unwrap();
    assert_eq!(
        registry.add_recipients("g", vec![Recipient::new(r3(), 1)]).unwrap_err(),
        InhabitError::TooManyRecipients { count: 3, max: 2 }
    );
}

#[test]
fn test_unbounded_registry_accepts_many_recipients() {
    let mut registry = GroupRegistry::new();
    let recipients: Vec<Recipient> = (1..=500).map(|i| Recipient::new(account(i), 20)).collect();
    registry.create_group("crowd", true, recipients).unwrap();

    let distribution = registry.distribute(1_000_000, "crowd").unwrap();
    assert_eq!(distribution.payouts.len(), 500);
    assert_eq!(distribution.total_paid() + distribution.remainder, 1_000_000);
}

#[test]
fn test_group_deserializes_from_json() {
    let json = r#"{
        "key": "ambassadors",
        "active": true,
        "recipients": [
            { "account": "0x7753e5f36f20b14ffb6b6a61319eb66f63abdb0b", "share_bps": 7000 }
        ]
    }"#;
    let group: crate::types::Group = serde_json::from_str(json).unwrap();
    assert_eq!(group.recipients[0].share_bps, 7000);
    assert_eq!(group.total_share_bps(), 7000);
}

#[test]
fn test_update_recipients_rejects_repeated_account() {
    let mut registry = registry_with_g1();
    assert_eq!(
        registry
            .update_recipients("g1", vec![Recipient::new(r1(), 1000), Recipient::new(r1(), 4000)])
            .unwrap_err(),
        InhabitError::DuplicateRecipient(r1())
    );
    assert_eq!(registry.get_group("g1").unwrap().recipients[0].share_bps, 5000);
}

#[test]
fn test_single_share_over_full_is_rejected() {
    let mut registry = GroupRegistry::new();
    let recipients: Vec<Recipient> = (1..=65_538).map(|i| Recipient::new(account(i), u16::MAX)).collect();
    assert_eq!(
        registry.create_group("huge", true, recipients).unwrap_err(),
        InhabitError::PercentageExceeded { total: u16::MAX as u64 }
    );

    registry.create_group("g", true, vec![Recipient::new(r1(), 100)]).unwrap();
    assert_eq!(
        registry.update_recipients("g", vec![Recipient::new(r1(), 10_001)]).unwrap_err(),
        InhabitError::PercentageExceeded { total: 10_001 }
    );
    assert_eq!(registry.group_count(), 1);
}

#[test]
fn test_share_total_beyond_u32_reports_percentage_exceeded() {
    // 430000 * 10000 超出 u32 范围
    let mut registry = GroupRegistry::new();
    let recipients: Vec<Recipient> = (1..=430_000).map(|i| Recipient::new(account(i), 10_000)).collect();
    assert_eq!(
        registry.create_group("crowd", true, recipients).unwrap_err(),
        InhabitError::PercentageExceeded { total: 4_300_000_000 }
    );
    assert!(registry.get_group("crowd").is_none());
}
