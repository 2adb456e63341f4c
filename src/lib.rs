//! Uptime Vitals - 站点可用性监控工作器
//!
//! 这是一个用Rust编写的站点可用性监控工作器，支持：
//! - 周期性巡检用户配置的检查项（HTTP/HTTPS探测）
//! - 状态变迁检测与短信告警
//! - 逐条JSON结果日志与周期性日志压缩轮转
//! - 基于文件的检查项与日志存储
//! - 结构化日志记录

pub mod alert;
pub mod check;
pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod store;
pub mod worker;

// 重新导出主要类型
pub use check::{CheckRecord, CheckState, HttpMethod, Protocol};
pub use error::UptimeVitalsError;
pub use probe::{ProbeExecutor, ProbeOutcome};
pub use worker::{LogRotator, OutcomeProcessor, SweepScheduler};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
