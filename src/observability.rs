//! 日志初始化

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 安装全局 tracing 订阅者，日志写入 stderr，stdout 留给报告输出
///
/// `RUST_LOG` 优先；未设置时按 verbose 选择 debug 或 info。
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kpi_engine={}", default_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
