//! 巡检结果处理器
//!
//! 对一次探测结果做确定性的状态判定与告警决策，按
//! "持久化 → 追加日志 → 派发告警"的顺序落实；持久化失败时
//! 终止该检查项本轮的后续步骤，避免落盘状态与已发告警不一致

use crate::alert::AlertDispatcher;
use crate::check::{CheckRecord, CheckState};
use crate::probe::ProbeOutcome;
use crate::store::{DataStore, LogStore, CHECKS_COLLECTION};
use crate::worker::entry::LogEntry;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 巡检结果处理器
pub struct OutcomeProcessor {
    /// 检查项记录存储
    store: Arc<dyn DataStore>,
    /// 巡检结果日志存储
    logs: Arc<dyn LogStore>,
    /// 告警派发器
    dispatcher: AlertDispatcher,
}

impl OutcomeProcessor {
    /// 创建新的结果处理器
    ///
    /// # 参数
    /// * `store` - 检查项记录存储
    /// * `logs` - 巡检结果日志存储
    /// * `dispatcher` - 告警派发器
    pub fn new(
        store: Arc<dyn DataStore>,
        logs: Arc<dyn LogStore>,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self {
            store,
            logs,
            dispatcher,
        }
    }

    /// 根据探测结果判定新状态
    ///
    /// 仅当没有错误且状态码命中成功码列表时为up
    fn decide_state(check: &CheckRecord, outcome: &ProbeOutcome) -> CheckState {
        let code_matches = outcome
            .response_code
            .is_some_and(|code| check.success_codes.contains(&code));

        if !outcome.error && code_matches {
            CheckState::Up
        } else {
            CheckState::Down
        }
    }

    /// 处理一次探测结果
    ///
    /// # 参数
    /// * `check` - 巡检前的检查项记录
    /// * `outcome` - 本次探测结果
    ///
    /// 所有失败都在此处记录并收敛，不向巡检循环传播
    pub async fn process(&self, check: CheckRecord, outcome: ProbeOutcome) {
        let new_state = Self::decide_state(&check, &outcome);

        // 首次巡检不告警：把初始观测当作基线而非状态变迁
        let alert_warranted = check.has_been_checked() && check.state != new_state;

        let time_of_check = Utc::now().timestamp_millis();

        // 日志条目保留巡检前的记录快照
        let snapshot = check.clone();
        let mut updated = check;
        updated.state = new_state;
        updated.last_checked = time_of_check;

        // 1. 持久化更新后的记录
        let record_value = match serde_json::to_value(&updated) {
            Ok(value) => value,
            Err(e) => {
                error!("序列化检查项失败: check_id={}, 错误: {}", updated.id, e);
                return;
            }
        };

        if let Err(e) = self
            .store
            .update(CHECKS_COLLECTION, &updated.id, &record_value)
            .await
        {
            // 保存失败则不写日志也不告警，本轮到此为止
            error!("保存检查项更新失败: check_id={}, 错误: {}", updated.id, e);
            return;
        }

        // 2. 无条件追加一条巡检日志（无论是否告警）
        let log_entry = LogEntry {
            check: snapshot,
            outcome,
            state: new_state,
            alert_warranted,
            time_of_check,
        };

        match log_entry.to_json_line() {
            Ok(line) => {
                if let Err(e) = self.logs.append(&updated.id, &line).await {
                    // 丢一行日志，但持久化已完成，告警照常进行
                    error!("追加巡检日志失败: check_id={}, 错误: {}", updated.id, e);
                }
            }
            Err(e) => {
                error!("序列化巡检日志失败: check_id={}, 错误: {}", updated.id, e);
            }
        }

        // 3. 状态变迁时派发告警
        if alert_warranted {
            info!(
                "检测到状态变迁: check_id={}, 新状态={}",
                updated.id, new_state
            );
            self.dispatcher.alert_status_change(&updated).await;
        } else {
            debug!("状态未变化，无需告警: check_id={}", updated.id);
        }
    }
}
