//! 日志轮转器
//!
//! 按固定间隔把每个活动日志压缩为带时间戳的不可变归档，
//! 归档写入成功后才清空活动日志；单个日志的失败不影响其他日志，
//! 未归档的内容留在原地等待下一轮

use crate::error::LogError;
use crate::store::LogStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

/// 日志轮转器
pub struct LogRotator {
    /// 巡检结果日志存储
    logs: Arc<dyn LogStore>,
    /// 轮转间隔
    rotation_interval: Duration,
    /// 轮转循环任务句柄
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl LogRotator {
    /// 创建新的日志轮转器
    ///
    /// # 参数
    /// * `logs` - 巡检结果日志存储
    /// * `rotation_interval` - 轮转间隔
    pub fn new(logs: Arc<dyn LogStore>, rotation_interval: Duration) -> Self {
        Self {
            logs,
            rotation_interval,
            handle: Mutex::new(None),
        }
    }

    /// 启动轮转循环
    ///
    /// 幂等：循环已在运行时重复调用只记录警告。首次tick立即触发
    pub async fn start_log_rotation(&self) {
        let mut handle = self.handle.lock().await;
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            warn!("日志轮转循环已在运行，忽略重复启动");
            return;
        }

        let logs = Arc::clone(&self.logs);
        let rotation_interval = self.rotation_interval;

        *handle = Some(tokio::spawn(async move {
            let mut ticker = interval(rotation_interval);
            info!("日志轮转循环已启动，间隔: {:?}", rotation_interval);

            loop {
                ticker.tick().await;
                Self::rotate_all(&logs).await;
            }
        }));
    }

    /// 停止轮转循环（进程关闭时由宿主调用）
    pub async fn stop(&self) {
        let mut handle = self.handle.lock().await;
        if let Some(handle) = handle.take() {
            handle.abort();
            info!("日志轮转循环已停止");
        }
    }

    /// 立即执行一轮轮转并等待其完成
    pub async fn rotate_once(&self) {
        Self::rotate_all(&self.logs).await;
    }

    /// 轮转全部活动日志
    async fn rotate_all(logs: &Arc<dyn LogStore>) {
        let ids = match logs.list(false).await {
            Ok(ids) => ids,
            Err(e) => {
                error!("列出活动日志失败: {}", e);
                return;
            }
        };

        if ids.is_empty() {
            debug!("没有需要轮转的日志");
            return;
        }

        for log_id in ids {
            Self::rotate_log(logs, &log_id).await;
        }
    }

    /// 轮转单个活动日志
    ///
    /// 压缩成功后才清空；压缩或写归档失败时保留活动日志原样，
    /// 内容不丢失，下一轮重试
    async fn rotate_log(logs: &Arc<dyn LogStore>, log_id: &str) {
        let archive_id = format!("{}-{}", log_id, Utc::now().timestamp_millis());

        match logs.compress(log_id, &archive_id).await {
            Ok(()) => {}
            Err(LogError::EmptyLog { .. }) => {
                // 上一轮之后没有新内容，无事可做
                debug!("活动日志为空，跳过轮转: log_id={}", log_id);
                return;
            }
            Err(e) => {
                error!("压缩日志失败: log_id={}, 错误: {}", log_id, e);
                return;
            }
        }

        if let Err(e) = logs.truncate(log_id).await {
            error!("清空活动日志失败: log_id={}, 错误: {}", log_id, e);
            return;
        }

        info!("日志轮转完成: log_id={} -> {}", log_id, archive_id);
    }
}
