use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use distribution::{InhabitService, InhabitServiceTrait};
use distribution::types::Group;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use utils::{AppConfig, Logger, NetworkConfig};

#[derive(Parser, Debug)]
#[clap(name = "inhabit", about = "Inhabit 推荐分账工具")]
struct Cli {
    #[clap(flatten)]
    config: AppConfig,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 按基点计算手续费
    Fee {
        #[clap(long)]
        amount: u128,
        #[clap(long)]
        bps: u16,
    },
    /// 从 JSON 文件加载分组并预览一次分账
    Distribute {
        #[clap(long)]
        groups: PathBuf,
        /// 分组 key，留空则全部归金库
        #[clap(long, default_value = "")]
        key: String,
        #[clap(long)]
        amount: u128,
    },
    /// 列出网络配置
    Networks,
    /// 打印 --network 所选网络预设的 NFT 合集
    CampaignPresets,
}

#[derive(Serialize)]
struct DistributionReport {
    key: String,
    amount: u128,
    treasury: ethers::types::Address,
    distribution: distribution::Distribution,
    transfers: Vec<distribution::Transfer>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 根据 CARGO_ENV 加载对应的环境配置文件
    utils::EnvLoader::load_env_file().ok();
    let cli = Cli::parse();
    let _guard = Logger::init(&cli.config);
    info!("🚀 inhabit 启动 (network={})", cli.config.network);

    match cli.command {
        Command::Fee { amount, bps } => {
            let fee = distribution::calculate_fee(amount, bps)?;
            println!("{}", fee);
        }
        Command::Distribute { groups, key, amount } => {
            let report = preview(&cli.config, &groups, key, amount).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Networks => {
            for network in NetworkConfig::all() {
                println!(
                    "{:<14} {:<12} confirmations={} verify={} tokens={}",
                    network.name,
                    format!("{:?}", network.kind),
                    network.block_confirmations,
                    network.kind.requires_verification(),
                    network
                        .payment_tokens
                        .iter()
                        .map(|t| t.symbol)
                        .collect::<Vec<_>>()
                        .join(",")
                );
            }
        }
        Command::CampaignPresets => {
            let network = cli.config.network_config()?;
            println!("{}", serde_json::to_string_pretty(&network.collections)?);
        }
    }

    Ok(())
}

/// 分组文件中的 key 依次写入一个临时注册表后再计算
async fn preview(config: &AppConfig, path: &Path, key: String, amount: u128) -> Result<DistributionReport> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("🔴 无法读取分组文件 {:?}", path))?;
    let groups: Vec<Group> = serde_json::from_str(&raw).context("🔴 分组文件格式错误")?;

    let treasury = config.treasury()?;
    let service = InhabitService::from_config(treasury, config)?.into_dyn();
    for group in groups {
        service
            .create_group(treasury, group.key.clone(), group.active, group.recipients)
            .await
            .with_context(|| format!("🔴 分组 {} 无效", group.key))?;
    }
    info!("✅ 已加载 {} 个分组", service.group_count().await);

    let distribution = service.preview_distribution(amount, key.clone()).await?;
    let transfers = distribution.transfers(treasury);
    Ok(DistributionReport {
        key,
        amount,
        treasury,
        distribution,
        transfers,
    })
}
