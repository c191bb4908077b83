//! 日志初始化：开发环境写 stderr（stdout 留给命令输出），生产环境按天滚动写文件

use std::path::PathBuf;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{AppConfig, CargoEnv, DEFAULT_LOG_FILTER};

const LOG_FILE_PREFIX: &str = "inhabit.log";

/// 日志输出位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    Directory(PathBuf),
}

impl LogTarget {
    pub fn for_config(config: &AppConfig) -> Self {
        match config.cargo_env {
            CargoEnv::Development => LogTarget::Stderr,
            CargoEnv::Production => {
                LogTarget::Directory(config.log_dir.clone().unwrap_or_else(|| PathBuf::from("logs")))
            }
        }
    }

    fn writer(&self) -> (NonBlocking, WorkerGuard) {
        match self {
            LogTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
            LogTarget::Directory(dir) => {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    eprintln!("⚠️ 无法创建日志目录 {:?}: {}，改为输出到 stderr", dir, e);
                    return tracing_appender::non_blocking(std::io::stderr());
                }
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
            }
        }
    }
}

pub struct Logger;

impl Logger {
    /// 安装全局 subscriber，返回的 guard 必须活到进程结束
    pub fn init(config: &AppConfig) -> WorkerGuard {
        let target = LogTarget::for_config(config);
        let (writer, guard) = target.writer();

        tracing_subscriber::registry()
            .with(Self::filter(&config.rust_log))
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(target == LogTarget::Stderr)
                    .with_line_number(true)
                    .with_target(false),
            )
            .init();

        guard
    }

    /// 解析 rust_log，失败时退回默认过滤
    pub fn filter(directives: &str) -> EnvFilter {
        EnvFilter::try_new(directives).unwrap_or_else(|e| {
            eprintln!("⚠️ 无效的日志过滤 {:?}: {}，使用 {}", directives, e, DEFAULT_LOG_FILTER);
            EnvFilter::new(DEFAULT_LOG_FILTER)
        })
    }
}
