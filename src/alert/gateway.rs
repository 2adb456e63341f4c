//! 告警网关模块
//!
//! 网关只负责"把一条短消息送到一个手机号"，单次尽力而为，不重试

use crate::config::TwilioConfig;
use crate::error::AlertError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// 告警网关trait
#[async_trait]
pub trait AlertGateway: Send + Sync {
    /// 发送一条短消息
    ///
    /// # 参数
    /// * `phone` - 10位数字手机号
    /// * `message` - 消息正文
    ///
    /// # 返回
    /// * `Result<(), AlertError>` - 发送结果
    async fn send(&self, phone: &str, message: &str) -> Result<(), AlertError>;
}

/// 判断手机号是否为恰好10位ASCII数字
fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit())
}

/// Twilio短信网关
pub struct TwilioGateway {
    /// HTTP客户端
    client: Client,
    /// Twilio账号配置
    config: TwilioConfig,
    /// API根地址（测试时可替换）
    api_base: String,
}

impl TwilioGateway {
    /// 创建新的Twilio网关
    ///
    /// # 参数
    /// * `config` - Twilio账号配置
    pub fn new(config: TwilioConfig) -> Result<Self, AlertError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AlertError::GatewayError(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_base: "https://api.twilio.com".to_string(),
        })
    }

    /// 替换API根地址（用于测试）
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.config.account_sid
        )
    }
}

#[async_trait]
impl AlertGateway for TwilioGateway {
    async fn send(&self, phone: &str, message: &str) -> Result<(), AlertError> {
        if !is_valid_phone(phone) {
            return Err(AlertError::InvalidPhone {
                phone: phone.to_string(),
            });
        }

        let to = format!("+1{phone}");
        let params = [
            ("From", self.config.from_phone.as_str()),
            ("To", to.as_str()),
            ("Body", message),
        ];

        debug!("发送Twilio短信: to=+1{}", phone);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| AlertError::GatewayError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!("Twilio短信发送成功: to=+1{}", phone);
            Ok(())
        } else {
            Err(AlertError::GatewayStatus {
                status: status.as_u16(),
            })
        }
    }
}

/// 空的告警网关实现（用于测试或禁用告警）
pub struct NoOpGateway;

#[async_trait]
impl AlertGateway for NoOpGateway {
    async fn send(&self, phone: &str, _message: &str) -> Result<(), AlertError> {
        // 仍然校验手机号，保持与真实网关一致的契约
        if !is_valid_phone(phone) {
            return Err(AlertError::InvalidPhone {
                phone: phone.to_string(),
            });
        }
        Ok(())
    }
}
