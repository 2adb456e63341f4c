//! 告警派发器模块
//!
//! 状态变迁时格式化告警文案并经网关发送；发送失败只记录日志，
//! 不重试也不向巡检流程传播

use crate::alert::gateway::AlertGateway;
use crate::check::CheckRecord;
use std::sync::Arc;
use tracing::{error, info};

/// 告警派发器
pub struct AlertDispatcher {
    /// 告警网关
    gateway: Arc<dyn AlertGateway>,
}

impl AlertDispatcher {
    /// 创建新的告警派发器
    pub fn new(gateway: Arc<dyn AlertGateway>) -> Self {
        Self { gateway }
    }

    /// 构造告警文案
    fn format_message(check: &CheckRecord) -> String {
        format!(
            "Alert: Your check for {} {} is currently {}",
            check.method.as_upper(),
            check.target_url(),
            check.state
        )
    }

    /// 向检查项所属用户发送状态变迁告警
    ///
    /// # 参数
    /// * `check` - 已更新到新状态的检查项记录
    pub async fn alert_status_change(&self, check: &CheckRecord) {
        let message = Self::format_message(check);

        match self.gateway.send(&check.owner_phone, &message).await {
            Ok(()) => {
                info!("状态变迁告警已发送: check_id={}, state={}", check.id, check.state);
            }
            Err(e) => {
                // 单次尽力而为：失败在此记录一次，不再向上抛
                error!("状态变迁告警发送失败: check_id={}, 错误: {}", check.id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::{CheckState, HttpMethod, Protocol};
    use crate::error::AlertError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录每次发送的网关桩
    struct RecordingGateway {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingGateway {
        fn new(fail: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl AlertGateway for RecordingGateway {
        async fn send(&self, phone: &str, message: &str) -> Result<(), AlertError> {
            self.sent
                .lock()
                .unwrap()
                .push((phone.to_string(), message.to_string()));
            if self.fail {
                Err(AlertError::GatewayError("boom".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn down_check() -> CheckRecord {
        CheckRecord {
            id: "c1".to_string(),
            owner_phone: "5551234567".to_string(),
            protocol: Protocol::Http,
            url: "example.com/health".to_string(),
            method: HttpMethod::Get,
            success_codes: vec![200],
            timeout_seconds: 3,
            state: CheckState::Down,
            last_checked: 1700000000000,
        }
    }

    #[tokio::test]
    async fn test_alert_message_format() {
        let gateway = Arc::new(RecordingGateway::new(false));
        let dispatcher = AlertDispatcher::new(gateway.clone());

        dispatcher.alert_status_change(&down_check()).await;

        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "5551234567");
        assert_eq!(
            sent[0].1,
            "Alert: Your check for GET http://example.com/health is currently down"
        );
    }

    #[tokio::test]
    async fn test_alert_failure_is_contained() {
        let gateway = Arc::new(RecordingGateway::new(true));
        let dispatcher = AlertDispatcher::new(gateway.clone());

        // 发送失败不应panic也不应返回错误
        dispatcher.alert_status_change(&down_check()).await;
        assert_eq!(gateway.sent.lock().unwrap().len(), 1);
    }
}
