use ethers::types::Address;
use serde::Serialize;
use thiserror::Error;

/// 错误大类，调用方据此决定如何向上反馈
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
    StateConflict,
    Authorization,
}

/// 分账、分组、售卖与活动相关的错误类型定义
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InhabitError {
    #[error("Group key must not be empty")]
    EmptyKey,

    #[error("Zero address is not allowed")]
    ZeroAddress,

    #[error("Input array must not be empty")]
    EmptyArray,

    #[error("Recipient {0:?} already present")]
    DuplicateRecipient(Address),

    #[error("Total percentage exceeded: {total} basis points (max 10000)")]
    PercentageExceeded { total: u64 },

    #[error("Too many recipients: {count} (max {max})")]
    TooManyRecipients { count: usize, max: usize },

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid collection params: {0}")]
    InvalidCollection(String),

    #[error("Token {0:?} is not accepted for this payment")]
    TokenNotAccepted(Address),

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u128, available: u128 },

    #[error("Collection supply exceeded")]
    SupplyExceeded,

    #[error("Collection {0} is not active")]
    CollectionNotActive(usize),

    #[error("distribution: Group Not Already Stored ({0})")]
    GroupNotFound(String),

    #[error("Recipient {0:?} not found in group")]
    RecipientNotFound(Address),

    #[error("Index {0} out of bounds")]
    IndexOutOfBounds(usize),

    #[error("Token {0:?} not found")]
    TokenNotFound(Address),

    #[error("Collection {0} not found")]
    CollectionNotFound(usize),

    #[error("Campaign {0} not found")]
    CampaignNotFound(u64),

    #[error("New state is the same as the current state")]
    SameState,

    #[error("distribution: Group Not Already Available ({0})")]
    GroupNotActive(String),

    #[error("Campaign {0} is not active")]
    CampaignNotActive(u64),

    #[error("Token {0:?} already added")]
    TokenAlreadyAdded(Address),

    #[error("Group {0} already exists")]
    GroupAlreadyExists(String),

    #[error("Restricted to admins. ({0:?})")]
    Unauthorized(Address),

    #[error("Restricted to relayers. ({0:?})")]
    NotRelayer(Address),
}

impl InhabitError {
    pub fn kind(&self) -> ErrorKind {
        use InhabitError::*;
        match self {
            EmptyKey
            | ZeroAddress
            | EmptyArray
            | DuplicateRecipient(_)
            | PercentageExceeded { .. }
            | TooManyRecipients { .. }
            | InvalidAmount
            | InvalidCollection(_)
            | TokenNotAccepted(_)
            | ArithmeticOverflow
            | InsufficientBalance { .. }
            | SupplyExceeded
            | CollectionNotActive(_) => ErrorKind::Validation,
            GroupNotFound(_)
            | RecipientNotFound(_)
            | IndexOutOfBounds(_)
            | TokenNotFound(_)
            | CollectionNotFound(_)
            | CampaignNotFound(_) => ErrorKind::NotFound,
            SameState | GroupNotActive(_) | CampaignNotActive(_) | TokenAlreadyAdded(_) | GroupAlreadyExists(_) => {
                ErrorKind::StateConflict
            }
            Unauthorized(_) | NotRelayer(_) => ErrorKind::Authorization,
        }
    }
}

impl From<validator::ValidationErrors> for InhabitError {
    fn from(err: validator::ValidationErrors) -> Self {
        InhabitError::InvalidCollection(err.to_string())
    }
}

/// Result类型别名
pub type Result<T> = std::result::Result<T, InhabitError>;
