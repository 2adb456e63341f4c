//! HTTP探测执行器实现
//!
//! 每次调用恰好发起一个出站请求，并恰好产生一个探测结果，
//! 无论成功、传输错误还是超时

use crate::check::{CheckRecord, HttpMethod};
use crate::error::{Result, UptimeVitalsError};
use crate::probe::outcome::ProbeOutcome;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// 探测执行器trait，定义探测接口
///
/// 返回类型不带`Result`：一次探测必定恰好交付一个结果，
/// 网络失败与超时都是合法的观测值而非系统错误
#[async_trait]
pub trait ProbeExecutor: Send + Sync {
    /// 对检查项执行一次探测
    ///
    /// # 参数
    /// * `check` - 规范化后的检查项记录
    ///
    /// # 返回
    /// * `ProbeOutcome` - 本次探测的结果
    async fn probe(&self, check: &CheckRecord) -> ProbeOutcome;
}

/// HTTP探测执行器实现
pub struct HttpProbeExecutor {
    /// HTTP客户端（跨探测共享连接池）
    client: Client,
}

impl HttpProbeExecutor {
    /// 创建新的HTTP探测执行器
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(|e| UptimeVitalsError::Other(e.into()))?;

        Ok(Self { client })
    }

    /// 将检查项方法映射为reqwest方法
    fn request_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// 格式化请求错误信息，使其更加清晰易读
    fn format_request_error(error: &reqwest::Error) -> String {
        if error.is_timeout() {
            "Request timeout".to_string()
        } else if error.is_connect() {
            "Connection refused".to_string()
        } else if error.is_request() {
            "Invalid request".to_string()
        } else {
            let error_str = error.to_string();
            if error_str.contains("dns") || error_str.contains("DNS") {
                "DNS resolution failed".to_string()
            } else if error_str.contains("certificate")
                || error_str.contains("tls")
                || error_str.contains("ssl")
            {
                "SSL/TLS certificate error".to_string()
            } else {
                format!("Request failed: {error_str}")
            }
        }
    }
}

#[async_trait]
impl ProbeExecutor for HttpProbeExecutor {
    async fn probe(&self, check: &CheckRecord) -> ProbeOutcome {
        let target = check.target_url();
        let request = self
            .client
            .request(Self::request_method(check.method), &target);

        debug!("开始探测: {} {}", check.method.as_upper(), target);

        // 三个互斥分支恰好交付一个结果，线性控制流天然保证
        // 不会出现错误与迟到响应的二次交付
        let timeout_duration = Duration::from_secs(check.timeout_seconds);
        match timeout(timeout_duration, request.send()).await {
            Ok(Ok(response)) => ProbeOutcome::response(response.status().as_u16()),
            Ok(Err(e)) => ProbeOutcome::transport_error(Self::format_request_error(&e)),
            Err(_) => ProbeOutcome::timeout(),
        }
    }
}
