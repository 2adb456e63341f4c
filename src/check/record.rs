//! 检查项记录数据结构与校验
//!
//! 检查项由外部流程创建后落盘，巡检时从存储读回的原始记录可能残缺，
//! 必须先通过校验得到规范化记录，才允许进入探测流程

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// 探测协议
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// 明文HTTP
    Http,
    /// HTTPS
    Https,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Https => write!(f, "https"),
        }
    }
}

/// 探测使用的HTTP方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// 转换为大写方法名（用于请求构建与告警文案）
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 检查项的可用性状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    /// 端点可用
    Up,
    /// 端点不可用（新建记录的初始状态）
    #[default]
    Down,
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckState::Up => write!(f, "up"),
            CheckState::Down => write!(f, "down"),
        }
    }
}

/// 规范化后的检查项记录
///
/// 除巡检期间由结果处理器更新`state`/`last_checked`外，记录的
/// 创建与删除均由外部流程负责
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    /// 记录ID（在记录生命周期内保持稳定）
    pub id: String,
    /// 所属用户手机号（恰好10位数字，作为归属键）
    pub owner_phone: String,
    /// 探测协议
    pub protocol: Protocol,
    /// 目标地址（主机名+路径，不含scheme）
    pub url: String,
    /// 探测方法
    pub method: HttpMethod,
    /// 视为"可用"的HTTP状态码列表（非空）
    pub success_codes: Vec<u16>,
    /// 探测超时时间（秒，1到5）
    pub timeout_seconds: u64,
    /// 当前可用性状态
    #[serde(default)]
    pub state: CheckState,
    /// 上次巡检时间戳（epoch毫秒，0表示从未巡检过）
    #[serde(default)]
    pub last_checked: i64,
}

impl CheckRecord {
    /// 拼装探测目标地址
    pub fn target_url(&self) -> String {
        format!("{}://{}", self.protocol, self.url)
    }

    /// 判断记录是否经历过至少一次巡检
    ///
    /// 首次巡检不触发告警，避免把初始观测当成状态变迁
    pub fn has_been_checked(&self) -> bool {
        self.last_checked > 0
    }
}

/// 从存储读回的原始检查项记录
///
/// 所有字段均为可选，且类型不匹配与缺失同等对待，
/// 用于承接可能残缺的落盘数据
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RawCheckRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub owner_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub protocol: Option<Protocol>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub method: Option<HttpMethod>,
    #[serde(default, deserialize_with = "lenient")]
    pub success_codes: Option<Vec<u16>>,
    #[serde(default, deserialize_with = "lenient")]
    pub timeout_seconds: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<CheckState>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_checked: Option<i64>,
}

/// 宽松反序列化：字段类型不匹配时按缺失处理而非整体报错
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// 判断手机号是否为恰好10位ASCII数字
fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit())
}

/// 校验原始检查项记录并规范化
///
/// # 参数
/// * `value` - 从存储读回的原始JSON记录
///
/// # 返回
/// * `Result<CheckRecord, ValidationError>` - 规范化记录或拒绝原因
///
/// 任一必填字段缺失或越界即拒绝；`state`缺省为down，
/// `last_checked`缺省为0（从未巡检过）
pub fn validate_record(value: serde_json::Value) -> Result<CheckRecord, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::NotAnObject);
    }

    let raw: RawCheckRecord =
        serde_json::from_value(value).map_err(|_| ValidationError::NotAnObject)?;

    let id = match raw.id.map(|s| s.trim().to_string()) {
        Some(id) if !id.is_empty() => id,
        _ => return Err(ValidationError::InvalidField { field: "id" }),
    };

    let owner_phone = match raw.owner_phone.map(|s| s.trim().to_string()) {
        Some(phone) if is_valid_phone(&phone) => phone,
        _ => return Err(ValidationError::InvalidField {
            field: "owner_phone",
        }),
    };

    let protocol = raw
        .protocol
        .ok_or(ValidationError::InvalidField { field: "protocol" })?;

    let url = match raw.url.map(|s| s.trim().to_string()) {
        Some(url) if !url.is_empty() => url,
        _ => return Err(ValidationError::InvalidField { field: "url" }),
    };

    let method = raw
        .method
        .ok_or(ValidationError::InvalidField { field: "method" })?;

    let success_codes = match raw.success_codes {
        Some(codes) if !codes.is_empty() => codes,
        _ => return Err(ValidationError::InvalidField {
            field: "success_codes",
        }),
    };

    let timeout_seconds = match raw.timeout_seconds {
        Some(t) if (1..=5).contains(&t) => t,
        _ => return Err(ValidationError::InvalidField {
            field: "timeout_seconds",
        }),
    };

    Ok(CheckRecord {
        id,
        owner_phone,
        protocol,
        url,
        method,
        success_codes,
        timeout_seconds,
        state: raw.state.unwrap_or_default(),
        last_checked: raw.last_checked.filter(|t| *t > 0).unwrap_or(0),
    })
}
