//! 探测结果数据结构
//!
//! 一次探测恰好产生一个结果：收到响应、传输错误或超时三者取一

use serde::{Deserialize, Serialize};

/// 超时结果的标记文本
pub const TIMEOUT_MARKER: &str = "timeout";

/// 单次探测的结果
///
/// 不单独持久化，仅随巡检日志条目落盘
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// 是否发生错误（传输错误或超时）
    pub error: bool,
    /// 错误详情（超时时为固定标记）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// 收到的HTTP状态码（仅在拿到响应时存在）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u16>,
}

impl ProbeOutcome {
    /// 收到响应
    pub fn response(code: u16) -> Self {
        Self {
            error: false,
            detail: None,
            response_code: Some(code),
        }
    }

    /// 传输/连接错误
    pub fn transport_error(detail: impl Into<String>) -> Self {
        Self {
            error: true,
            detail: Some(detail.into()),
            response_code: None,
        }
    }

    /// 超时
    pub fn timeout() -> Self {
        Self {
            error: true,
            detail: Some(TIMEOUT_MARKER.to_string()),
            response_code: None,
        }
    }

    /// 判断结果是否为超时
    pub fn is_timeout(&self) -> bool {
        self.error && self.detail.as_deref() == Some(TIMEOUT_MARKER)
    }
}
