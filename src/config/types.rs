//! 配置数据结构定义
//!
//! 定义工作器的配置结构体和验证逻辑

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 工作器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkerConfig {
    /// 检查项记录存储根目录
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// 巡检结果日志根目录
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
    /// 巡检间隔（秒）
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// 日志轮转间隔（小时）
    #[serde(default = "default_rotation_interval")]
    pub log_rotation_interval_hours: u64,
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 是否输出JSON格式日志
    #[serde(default)]
    pub json_logs: bool,
    /// Twilio账号配置（缺省时告警走空实现）
    pub twilio: Option<TwilioConfig>,
}

/// Twilio账号配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwilioConfig {
    /// 账号SID
    pub account_sid: String,
    /// 鉴权token
    pub auth_token: String,
    /// 发送方号码（E.164格式）
    pub from_phone: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            logs_dir: default_logs_dir(),
            sweep_interval_seconds: default_sweep_interval(),
            log_rotation_interval_hours: default_rotation_interval(),
            log_level: default_log_level(),
            json_logs: false,
            twilio: None,
        }
    }
}

// 默认值函数
fn default_data_dir() -> PathBuf {
    PathBuf::from(".data")
}
fn default_logs_dir() -> PathBuf {
    PathBuf::from(".logs")
}
fn default_sweep_interval() -> u64 {
    60
}
fn default_rotation_interval() -> u64 {
    24
}
fn default_log_level() -> String {
    "info".to_string()
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &WorkerConfig) -> Result<(), String> {
    if config.sweep_interval_seconds == 0 {
        return Err("巡检间隔不能为0".to_string());
    }

    if config.log_rotation_interval_hours == 0 {
        return Err("日志轮转间隔不能为0".to_string());
    }

    // 验证日志级别
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.log_level, valid_log_levels
        ));
    }

    // 验证Twilio配置（如果启用）
    if let Some(ref twilio) = config.twilio {
        if twilio.account_sid.trim().is_empty() {
            return Err("Twilio账号SID不能为空".to_string());
        }
        if twilio.auth_token.trim().is_empty() {
            return Err("Twilio鉴权token不能为空".to_string());
        }
        if !twilio.from_phone.starts_with('+')
            || !twilio.from_phone[1..].chars().all(|c| c.is_ascii_digit())
        {
            return Err(format!("Twilio发送方号码格式无效: {}", twilio.from_phone));
        }
    }

    Ok(())
}
