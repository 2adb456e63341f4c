//! 巡检调度器
//!
//! 按固定间隔列出全部检查项并逐个触发"读取 → 校验 → 探测 → 处理"
//! 流水线；单个检查项的失败只影响自身，不中断整轮巡检

use crate::check::validate_record;
use crate::probe::ProbeExecutor;
use crate::store::{DataStore, CHECKS_COLLECTION};
use crate::worker::processor::OutcomeProcessor;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

/// 巡检调度器
///
/// 启动后立即执行一轮巡检，此后按固定间隔触发；巡检周期之间
/// 不做互斥，某一轮跑得久不会阻止下一轮开始
pub struct SweepScheduler {
    /// 检查项记录存储
    store: Arc<dyn DataStore>,
    /// 探测执行器
    executor: Arc<dyn ProbeExecutor>,
    /// 结果处理器
    processor: Arc<OutcomeProcessor>,
    /// 巡检间隔
    sweep_interval: Duration,
    /// 巡检循环任务句柄
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SweepScheduler {
    /// 创建新的巡检调度器
    ///
    /// # 参数
    /// * `store` - 检查项记录存储
    /// * `executor` - 探测执行器
    /// * `processor` - 结果处理器
    /// * `sweep_interval` - 巡检间隔
    pub fn new(
        store: Arc<dyn DataStore>,
        executor: Arc<dyn ProbeExecutor>,
        processor: Arc<OutcomeProcessor>,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            store,
            executor,
            processor,
            sweep_interval,
            handle: Mutex::new(None),
        }
    }

    /// 启动巡检循环
    ///
    /// 幂等：循环已在运行时重复调用只记录警告。首次tick立即触发，
    /// 之后每个间隔触发一次；每轮巡检独立派发，不等待上一轮结束
    pub async fn start_sweeping(&self) {
        let mut handle = self.handle.lock().await;
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            warn!("巡检循环已在运行，忽略重复启动");
            return;
        }

        let store = Arc::clone(&self.store);
        let executor = Arc::clone(&self.executor);
        let processor = Arc::clone(&self.processor);
        let sweep_interval = self.sweep_interval;

        *handle = Some(tokio::spawn(async move {
            let mut ticker = interval(sweep_interval);
            info!("巡检循环已启动，间隔: {:?}", sweep_interval);

            loop {
                ticker.tick().await;

                let store = Arc::clone(&store);
                let executor = Arc::clone(&executor);
                let processor = Arc::clone(&processor);

                // 每轮巡检单独派发，周期之间不做互斥
                tokio::spawn(async move {
                    Self::sweep_all(store, executor, processor).await;
                });
            }
        }));
    }

    /// 停止巡检循环（进程关闭时由宿主调用）
    pub async fn stop(&self) {
        let mut handle = self.handle.lock().await;
        if let Some(handle) = handle.take() {
            handle.abort();
            info!("巡检循环已停止");
        }
    }

    /// 立即执行一轮巡检并等待其完成
    pub async fn sweep_once(&self) {
        Self::sweep_all(
            Arc::clone(&self.store),
            Arc::clone(&self.executor),
            Arc::clone(&self.processor),
        )
        .await;
    }

    /// 对全部检查项执行一轮巡检
    ///
    /// 每个检查项在独立任务中处理（无并发上限），列表失败
    /// 只记录日志并放弃本轮
    async fn sweep_all(
        store: Arc<dyn DataStore>,
        executor: Arc<dyn ProbeExecutor>,
        processor: Arc<OutcomeProcessor>,
    ) {
        let ids = match store.list(CHECKS_COLLECTION).await {
            Ok(ids) => ids,
            Err(e) => {
                error!("列出检查项失败: {}", e);
                return;
            }
        };

        if ids.is_empty() {
            debug!("没有需要巡检的检查项");
            return;
        }

        debug!("开始巡检，检查项数量: {}", ids.len());

        let tasks: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let store = Arc::clone(&store);
                let executor = Arc::clone(&executor);
                let processor = Arc::clone(&processor);
                tokio::spawn(async move {
                    Self::sweep_check(store, executor, processor, id).await;
                })
            })
            .collect();

        join_all(tasks).await;
    }

    /// 巡检单个检查项
    async fn sweep_check(
        store: Arc<dyn DataStore>,
        executor: Arc<dyn ProbeExecutor>,
        processor: Arc<OutcomeProcessor>,
        id: String,
    ) {
        let raw = match store.read(CHECKS_COLLECTION, &id).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("读取检查项失败: check_id={}, 错误: {}", id, e);
                return;
            }
        };

        let check = match validate_record(raw) {
            Ok(check) => check,
            Err(e) => {
                // 残缺记录只跳过自身，不影响其他检查项
                warn!("检查项校验失败，跳过: check_id={}, 错误: {}", id, e);
                return;
            }
        };

        let outcome = executor.probe(&check).await;
        processor.process(check, outcome).await;
    }
}
