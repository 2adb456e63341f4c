//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Uptime Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum UptimeVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 检查项校验相关错误
    #[error("检查项校验错误: {0}")]
    Validation(#[from] ValidationError),

    /// 持久化存储相关错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),

    /// 结果日志存储相关错误
    #[error("日志存储错误: {0}")]
    Log(#[from] LogError),

    /// 告警发送相关错误
    #[error("告警错误: {0}")]
    Alert(#[from] AlertError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },
}

/// 检查项校验错误类型
///
/// 校验失败只会跳过当前检查项，不会中断整轮巡检
#[derive(Error, Debug)]
pub enum ValidationError {
    /// 必填字段缺失或类型不正确
    #[error("字段缺失或格式不正确: {field}")]
    InvalidField { field: &'static str },

    /// 原始记录不是JSON对象
    #[error("检查项记录不是JSON对象")]
    NotAnObject,
}

/// 持久化存储错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    /// 记录不存在
    #[error("记录不存在: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// 记录已存在（创建时）
    #[error("记录已存在: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    /// 读写失败
    #[error("存储读写失败: {0}")]
    Io(#[from] std::io::Error),

    /// 记录序列化/反序列化失败
    #[error("记录编解码失败: {0}")]
    Codec(#[from] serde_json::Error),
}

/// 结果日志存储错误类型
#[derive(Error, Debug)]
pub enum LogError {
    /// 活动日志不存在或内容为空
    #[error("日志为空或不存在: {log_id}")]
    EmptyLog { log_id: String },

    /// 归档文件已存在
    #[error("归档文件已存在: {archive_id}")]
    ArchiveExists { archive_id: String },

    /// 压缩/解压失败
    #[error("压缩或解压失败: {0}")]
    Compression(String),

    /// 读写失败
    #[error("日志读写失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 告警错误类型
#[derive(Error, Debug)]
pub enum AlertError {
    /// 手机号格式不正确
    #[error("手机号格式不正确: {phone}")]
    InvalidPhone { phone: String },

    /// 网关请求失败
    #[error("告警网关请求失败: {0}")]
    GatewayError(String),

    /// 网关拒绝发送
    #[error("告警网关返回状态码: {status}")]
    GatewayStatus { status: u16 },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, UptimeVitalsError>;
