//! 网络配置表
//!
//! 每个网络一条记录：所属环境、等待的区块确认数、可用的支付代币以及预设的NFT集合。

use ethers::types::Address;
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// 原生币的占位地址
pub const NATIVE_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

pub const DEVELOPMENT_CHAINS: [&str; 2] = ["hardhat", "localhost"];
pub const STAGING_CHAINS: [&str; 1] = ["celoAlfajores"];
pub const PRODUCTION_CHAINS: [&str; 1] = ["celo"];

/// 活动购买默认接受的稳定币
pub const CAMPAIGN_TOKEN_SYMBOLS: [&str; 2] = ["USDC", "USDT"];

/// 未配置确认数的网络默认只等待一个区块
pub const DEFAULT_BLOCK_CONFIRMATIONS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Development,
    Staging,
    Production,
}

impl NetworkKind {
    pub fn of(name: &str) -> Option<Self> {
        if DEVELOPMENT_CHAINS.contains(&name) {
            Some(NetworkKind::Development)
        } else if STAGING_CHAINS.contains(&name) {
            Some(NetworkKind::Staging)
        } else if PRODUCTION_CHAINS.contains(&name) {
            Some(NetworkKind::Production)
        } else {
            None
        }
    }

    /// 非开发网络部署后需要在浏览器上验证合约
    pub fn requires_verification(&self) -> bool {
        !matches!(self, NetworkKind::Development)
    }
}

/// 支付代币信息
#[derive(Debug, Clone, Serialize)]
pub struct PaymentTokenInfo {
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u8,
}

/// NFT集合预设参数
#[derive(Debug, Clone, Serialize)]
pub struct CollectionPreset {
    pub name: &'static str,
    pub symbol: &'static str,
    pub uri: &'static str,
    pub supply: u64,
    pub price: u128,
    pub state: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub kind: NetworkKind,
    pub block_confirmations: u64,
    pub payment_tokens: Vec<PaymentTokenInfo>,
    pub collections: Vec<CollectionPreset>,
}

impl NetworkConfig {
    pub fn for_network(name: &str) -> Option<&'static NetworkConfig> {
        NETWORKS.get(name)
    }

    pub fn all() -> impl Iterator<Item = &'static NetworkConfig> {
        NETWORKS.values()
    }

    pub fn payment_token(&self, symbol: &str) -> Option<&PaymentTokenInfo> {
        self.payment_tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }
}

fn addr(raw: &str) -> Address {
    // 表内地址均为常量，解析失败只可能是拼写错误
    Address::from_str(raw).unwrap_or_else(|e| panic!("invalid address constant {}: {}", raw, e))
}

pub const IPFS_GATEWAY: &str = "https://black-fast-chipmunk-543.mypinata.cloud/ipfs/";

/// 默认募资目标：100,000 USDC（6 位精度）
pub const DEFAULT_CAMPAIGN_GOAL: u128 = 100_000_000_000;

fn celo_collections() -> Vec<CollectionPreset> {
    vec![
        CollectionPreset {
            name: "INHABIT Ñuiyanzhi TITI",
            symbol: "TITI",
            uri: "https://black-fast-chipmunk-543.mypinata.cloud/ipfs/bafkreihqsoyx6iiqxjp2qughd54xz2gtgddj2ivjgwfqfnitvkkmkmg6au",
            supply: 2483,
            price: 50_000_000,
            state: true,
        },
        CollectionPreset {
            name: "INHABIT Ñuiyanzhi PAUJIL",
            symbol: "PAUJIL",
            uri: "https://black-fast-chipmunk-543.mypinata.cloud/ipfs/bafkreig63uzhbc2p3nddkkqtw3ildtgbcc7buoyd6flnz6qyzk2m3beuxe",
            supply: 124,
            price: 500_000_000,
            state: true,
        },
        CollectionPreset {
            name: "INHABIT Ñuiyanzhi CARACOLI",
            symbol: "CARACOLI",
            uri: "https://black-fast-chipmunk-543.mypinata.cloud/ipfs/bafkreiczdctjncnwxrnuuaz66wgv37a4u7ycrqnkt2n73cu4bafdv5z5oa",
            supply: 19,
            price: 2_000_000_000,
            state: true,
        },
        CollectionPreset {
            name: "INHABIT Ñuiyanzhi JAGUAR",
            symbol: "JAGUAR",
            uri: "https://black-fast-chipmunk-543.mypinata.cloud/ipfs/bafkreih4fccggynla475clgzrj2rs2ulggxvi7lwyavhjcyjeuxjduetoq",
            supply: 5,
            price: 5_000_000_000,
            state: true,
        },
    ]
}

fn alfajores_collections() -> Vec<CollectionPreset> {
    vec![
        CollectionPreset {
            name: "INHABIT Ñuiyanzhi TITI",
            symbol: "TITI",
            uri: "https://black-fast-chipmunk-543.mypinata.cloud/ipfs/bafkreiforhajyhg5i564fnvfe7ixnfzyqhmbjbekq4yiiyo2kq6jt2cnuy",
            supply: 2483,
            price: 1_000_000,
            state: true,
        },
        CollectionPreset {
            name: "INHABIT Ñuiyanzhi PAUJIL",
            symbol: "PAUJIL",
            uri: "https://black-fast-chipmunk-543.mypinata.cloud/ipfs/bafkreiafxsk2q2ywrtu6bttgloemtbdab4vea3urys6npshzqdlzi5ki7q",
            supply: 124,
            price: 2_000_000,
            state: true,
        },
        CollectionPreset {
            name: "INHABIT Ñuiyanzhi CARACOLI",
            symbol: "CARACOLI",
            uri: "https://black-fast-chipmunk-543.mypinata.cloud/ipfs/bafkreigbiy2eypcsnuqbnwlxarhekmvpzx5osvu6yp5ilvdavvf6jingge",
            supply: 19,
            price: 3_000_000,
            state: true,
        },
        CollectionPreset {
            name: "INHABIT Ñuiyanzhi JAGUAR",
            symbol: "JAGUAR",
            uri: "https://black-fast-chipmunk-543.mypinata.cloud/ipfs/bafkreiae3gykborfjm565gnxlswd7yaiqn66s4kbntrsjlqaemrgjduhqi",
            supply: 5,
            price: 4_000_000,
            state: true,
        },
    ]
}

lazy_static! {
    pub static ref NATIVE: Address = addr(NATIVE_ADDRESS);
    pub static ref TREASURY_ADDRESS: Address = addr("0xd243438f6d14E2097e96D81e56E08C7D847a67A6");

    static ref NETWORKS: BTreeMap<&'static str, NetworkConfig> = {
        let mut m = BTreeMap::new();
        for name in DEVELOPMENT_CHAINS {
            m.insert(
                name,
                NetworkConfig {
                    name,
                    kind: NetworkKind::Development,
                    block_confirmations: DEFAULT_BLOCK_CONFIRMATIONS,
                    payment_tokens: vec![],
                    collections: alfajores_collections(),
                },
            );
        }
        m.insert(
            "celoAlfajores",
            NetworkConfig {
                name: "celoAlfajores",
                kind: NetworkKind::Staging,
                block_confirmations: 3,
                payment_tokens: vec![
                    PaymentTokenInfo {
                        symbol: "cUSD",
                        address: addr("0x874069Fa1Eb16D44d622F2e0Ca25eeA172369bC1"),
                        decimals: 18,
                    },
                    PaymentTokenInfo {
                        symbol: "USDC",
                        address: addr("0x2F25deB3848C207fc8E0c34035B3Ba7fC157602B"),
                        decimals: 6,
                    },
                    PaymentTokenInfo {
                        symbol: "USDT",
                        address: addr("0xBba91F588d031469ABCCA566FE80fB1Ad8Ee3287"),
                        decimals: 6,
                    },
                ],
                collections: alfajores_collections(),
            },
        );
        m.insert(
            "celo",
            NetworkConfig {
                name: "celo",
                kind: NetworkKind::Production,
                block_confirmations: 3,
                payment_tokens: vec![],
                collections: celo_collections(),
            },
        );
        m
    };
}
