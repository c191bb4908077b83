use anyhow::{anyhow, Result};
use ethers::types::Address;
use std::path::PathBuf;
use std::str::FromStr;

use crate::network::{NetworkConfig, TREASURY_ADDRESS};

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq)]
#[clap(rename_all = "lowercase")]
pub enum CargoEnv {
    Development,
    Production,
}

/// 环境配置加载器
pub struct EnvLoader;

impl EnvLoader {
    /// 根据 CARGO_ENV 加载对应的环境配置文件
    pub fn load_env_file() -> Result<(), Box<dyn std::error::Error>> {
        // 1. 获取环境变量 CARGO_ENV
        let cargo_env = std::env::var("CARGO_ENV").unwrap_or_else(|_| "development".to_string());
        println!("cargo_env: {}", cargo_env);
        // 2. 构建配置文件路径
        let env_file = Self::env_file_for(&cargo_env);
        println!("env_file: {}", env_file);
        // 3. 检查文件是否存在
        if !std::path::Path::new(env_file).exists() {
            eprintln!("⚠️  配置文件 {} 不存在，尝试加载默认的 .env 文件", env_file);
            if std::path::Path::new(".env").exists() {
                dotenvy::from_filename(".env")?;
                println!("✅ 已加载默认配置文件: .env");
            } else {
                eprintln!("❌ 未找到任何配置文件，使用默认配置");
            }
            return Ok(());
        }

        // 4. 加载指定的环境配置文件
        dotenvy::from_filename(env_file)?;
        println!("✅ 已加载环境配置文件: {} (CARGO_ENV={})", env_file, cargo_env);

        Ok(())
    }

    pub fn env_file_for(cargo_env: &str) -> &'static str {
        match cargo_env {
            "production" | "Production" | "prod" => ".env.production",
            "development" | "Development" | "dev" => ".env.development",
            "test" | "Test" => ".env.test",
            _ => {
                println!("⚠️  未知的 CARGO_ENV: {}，使用默认的 .env.development", cargo_env);
                ".env.development"
            }
        }
    }
}

#[derive(clap::Parser, Clone, Debug)]
pub struct AppConfig {
    #[clap(long, env, value_enum, default_value = "development")]
    pub cargo_env: CargoEnv,

    /// 目标网络名称 (hardhat / localhost / celoAlfajores / celo)
    #[clap(long, env, default_value = "hardhat")]
    pub network: String,

    /// 收取分账余数的金库地址，缺省时使用网络预设
    #[clap(long, env)]
    pub treasury_address: Option<String>,

    /// 单个分组允许的最大收款人数量，缺省不限制
    #[clap(long, env)]
    pub max_recipients_per_group: Option<usize>,

    #[clap(long, env)]
    pub log_dir: Option<PathBuf>,

    /// 日志过滤指令，语法同 RUST_LOG
    #[clap(long, env, default_value = DEFAULT_LOG_FILTER)]
    pub rust_log: String,
}

pub const DEFAULT_LOG_FILTER: &str = "info,distribution=debug,inhabit=debug";

impl AppConfig {
    /// 手动创建配置实例（用于测试）
    pub fn new_for_test() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            network: "hardhat".to_string(),
            treasury_address: None,
            max_recipients_per_group: None,
            log_dir: None,
            rust_log: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// 解析金库地址：显式配置优先，否则回退到预设地址
    pub fn treasury(&self) -> Result<Address> {
        match &self.treasury_address {
            Some(raw) => Address::from_str(raw.trim()).map_err(|e| anyhow!("无效的金库地址 {}: {}", raw, e)),
            None => Ok(*TREASURY_ADDRESS),
        }
    }

    pub fn network_config(&self) -> Result<&'static NetworkConfig> {
        NetworkConfig::for_network(&self.network).ok_or_else(|| anyhow!("未知网络: {}", self.network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_env_file_selection() {
        assert_eq!(EnvLoader::env_file_for("prod"), ".env.production");
        assert_eq!(EnvLoader::env_file_for("Development"), ".env.development");
        assert_eq!(EnvLoader::env_file_for("test"), ".env.test");
        assert_eq!(EnvLoader::env_file_for("staging"), ".env.development");
    }

    #[test]
    fn test_treasury_falls_back_to_preset() {
        let config = AppConfig::new_for_test();
        assert_eq!(config.treasury().unwrap(), *TREASURY_ADDRESS);
    }

    #[test]
    fn test_treasury_override() {
        let mut config = AppConfig::new_for_test();
        config.treasury_address = Some("0x7753E5f36f20B14fFb6b6a61319Eb66f63abdb0b".to_string());
        let treasury = config.treasury().unwrap();
        assert_eq!(treasury, Address::from_str("0x7753E5f36f20B14fFb6b6a61319Eb66f63abdb0b").unwrap());

        config.treasury_address = Some("not-an-address".to_string());
        assert!(config.treasury().is_err());
    }

    #[test]
    fn test_parse_from_args() {
        let config = AppConfig::parse_from([
            "inhabit",
            "--cargo-env",
            "development",
            "--network",
            "celo",
            "--max-recipients-per-group",
            "25",
        ]);
        assert_eq!(config.network, "celo");
        assert_eq!(config.max_recipients_per_group, Some(25));
        assert_eq!(config.network_config().unwrap().block_confirmations, 3);
    }

    #[test]
    fn test_unknown_network_is_rejected() {
        let mut config = AppConfig::new_for_test();
        config.network = "mainnet".to_string();
        assert!(config.network_config().is_err());
    }
}
