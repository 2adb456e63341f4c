//! Uptime Vitals 主程序入口
//!
//! 宿主进程：加载配置、装配组件，启动巡检循环与日志轮转循环，
//! 收到ctrl-c后停止两个循环退出

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use uptime_vitals::alert::{AlertDispatcher, AlertGateway, NoOpGateway, TwilioGateway};
use uptime_vitals::config::{ConfigLoader, TomlConfigLoader, WorkerConfig};
use uptime_vitals::logging::{init_logging, LogConfig};
use uptime_vitals::probe::HttpProbeExecutor;
use uptime_vitals::store::{FileDataStore, FileLogStore};
use uptime_vitals::worker::{LogRotator, OutcomeProcessor, SweepScheduler};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "uptime-vitals", version, about = "站点可用性监控工作器")]
struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        env = "UPTIME_VITALS_CONFIG",
        default_value = "uptime-vitals.toml"
    )]
    config: PathBuf,

    /// 覆盖配置中的日志级别
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 配置文件不存在时回退到默认配置，方便本地直接试运行
    let config = if args.config.exists() {
        TomlConfigLoader::new()
            .load_from_file(&args.config)
            .await
            .context("加载配置文件失败")?
    } else {
        WorkerConfig::default()
    };

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().unwrap_or_else(|| config.log_level.clone()),
        json_format: config.json_logs,
    };
    init_logging(&log_config).context("初始化日志系统失败")?;

    info!("Uptime Vitals v{} 启动", uptime_vitals::VERSION);

    // 装配存储与告警组件
    let store = Arc::new(FileDataStore::new(&config.data_dir));
    let logs = Arc::new(FileLogStore::new(&config.logs_dir));

    let gateway: Arc<dyn AlertGateway> = match &config.twilio {
        Some(twilio) => {
            info!("告警网关: Twilio");
            Arc::new(TwilioGateway::new(twilio.clone()).context("创建Twilio网关失败")?)
        }
        None => {
            info!("未配置Twilio，告警仅记录日志");
            Arc::new(NoOpGateway)
        }
    };

    let processor = Arc::new(OutcomeProcessor::new(
        store.clone(),
        logs.clone(),
        AlertDispatcher::new(gateway),
    ));
    let executor = Arc::new(HttpProbeExecutor::new()?);

    // 巡检循环与日志轮转循环相互独立
    let scheduler = SweepScheduler::new(
        store,
        executor,
        processor,
        Duration::from_secs(config.sweep_interval_seconds),
    );
    let rotator = LogRotator::new(
        logs,
        Duration::from_secs(config.log_rotation_interval_hours * 3600),
    );

    scheduler.start_sweeping().await;
    rotator.start_log_rotation().await;

    // 等待关闭信号
    signal::ctrl_c().await.context("监听ctrl-c信号失败")?;
    info!("收到关闭信号，正在停止工作器...");

    scheduler.stop().await;
    rotator.stop().await;

    info!("工作器已停止");
    Ok(())
}
