//! 配置模块
//!
//! 提供工作器配置的数据结构、TOML加载与验证

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, TomlConfigLoader};
pub use types::{validate_config, TwilioConfig, WorkerConfig};
