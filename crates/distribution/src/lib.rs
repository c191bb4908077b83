pub mod access;
pub mod campaign;
pub mod error;
pub mod fee;
pub mod group;
pub mod ledger;
pub mod platform;
pub mod services;
pub mod types;
pub mod vendor;

pub use access::{AccessControl, AdminCapability, Role};
pub use campaign::{Campaign, CampaignRegistry, CollectionParams};
pub use error::{ErrorKind, InhabitError, Result};
pub use fee::{calculate_fee, distribute};
pub use group::GroupRegistry;
pub use ledger::Ledger;
pub use platform::{NftReceipt, Platform, PurchaseReceipt};
pub use services::{DynInhabitService, InhabitService, InhabitServiceTrait};
pub use types::*;
pub use vendor::{TokenConfig, Vendor, VendorCollection, WAD};
