//! 巡检流水线端到端测试
//!
//! 用mockito模拟被探测端点、tempfile承载存储，覆盖
//! "列出 → 校验 → 探测 → 判定 → 持久化 → 日志 → 告警"全链路

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use uptime_vitals::alert::{AlertDispatcher, AlertGateway};
use uptime_vitals::error::AlertError;
use uptime_vitals::probe::HttpProbeExecutor;
use uptime_vitals::store::{DataStore, FileDataStore, FileLogStore, LogStore, CHECKS_COLLECTION};
use uptime_vitals::worker::{LogEntry, LogRotator, OutcomeProcessor, SweepScheduler};

/// 记录每次发送的网关桩
struct RecordingGateway {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingGateway {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AlertGateway for RecordingGateway {
    async fn send(&self, phone: &str, message: &str) -> Result<(), AlertError> {
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), message.to_string()));
        Ok(())
    }
}

struct Harness {
    _data_dir: TempDir,
    logs_dir: TempDir,
    store: Arc<FileDataStore>,
    logs: Arc<FileLogStore>,
    gateway: Arc<RecordingGateway>,
    scheduler: SweepScheduler,
}

fn harness() -> Harness {
    let data_dir = TempDir::new().unwrap();
    let logs_dir = TempDir::new().unwrap();
    let store = Arc::new(FileDataStore::new(data_dir.path()));
    let logs = Arc::new(FileLogStore::new(logs_dir.path()));
    let gateway = RecordingGateway::new();

    let processor = Arc::new(OutcomeProcessor::new(
        store.clone(),
        logs.clone(),
        AlertDispatcher::new(gateway.clone()),
    ));
    let executor = Arc::new(HttpProbeExecutor::new().unwrap());
    let scheduler = SweepScheduler::new(
        store.clone(),
        executor,
        processor,
        Duration::from_secs(60),
    );

    Harness {
        _data_dir: data_dir,
        logs_dir,
        store,
        logs,
        gateway,
        scheduler,
    }
}

/// 把mockito服务地址转成检查项的"无scheme"地址
fn check_url(server: &mockito::Server, path: &str) -> String {
    format!("{}{}", server.url().trim_start_matches("http://"), path)
}

fn check_record(id: &str, url: &str, state: &str, last_checked: i64) -> serde_json::Value {
    json!({
        "id": id,
        "owner_phone": "5551234567",
        "protocol": "http",
        "url": url,
        "method": "get",
        "success_codes": [200],
        "timeout_seconds": 3,
        "state": state,
        "last_checked": last_checked
    })
}

fn read_log_entries(harness: &Harness, id: &str) -> Vec<LogEntry> {
    let path = harness.logs_dir.path().join(format!("{id}.log"));
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(|line| LogEntry::from_json_line(line).unwrap())
        .collect()
}

#[tokio::test]
async fn up_check_returning_500_goes_down_and_alerts() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/health")
        .with_status(500)
        .create_async()
        .await;

    let harness = harness();
    let t0 = 1700000000000;
    let record = check_record("c1", &check_url(&server, "/health"), "up", t0);
    harness
        .store
        .create(CHECKS_COLLECTION, "c1", &record)
        .await
        .unwrap();

    harness.scheduler.sweep_once().await;

    // 落盘状态翻转为down
    let persisted = harness.store.read(CHECKS_COLLECTION, "c1").await.unwrap();
    assert_eq!(persisted["state"], "down");
    assert!(persisted["last_checked"].as_i64().unwrap() > t0);

    // 恰好一条日志，时间戳晚于T0
    let entries = read_log_entries(&harness, "c1");
    assert_eq!(entries.len(), 1);
    assert!(entries[0].alert_warranted);
    assert!(entries[0].time_of_check > t0);
    assert_eq!(entries[0].outcome.response_code, Some(500));

    // 恰好一条告警发到归属手机号，文案包含"currently down"
    let sent = harness.gateway.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "5551234567");
    assert!(sent[0].1.contains("currently down"));
}

#[tokio::test]
async fn first_evaluation_never_alerts_regardless_of_outcome() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/ok")
        .with_status(200)
        .create_async()
        .await;
    let _m = server
        .mock("GET", "/broken")
        .with_status(503)
        .create_async()
        .await;

    let harness = harness();
    for (id, path) in [("fresh-up", "/ok"), ("fresh-down", "/broken")] {
        let record = check_record(id, &check_url(&server, path), "down", 0);
        harness
            .store
            .create(CHECKS_COLLECTION, id, &record)
            .await
            .unwrap();
    }

    harness.scheduler.sweep_once().await;

    assert!(harness.gateway.sent.lock().unwrap().is_empty());
    for id in ["fresh-up", "fresh-down"] {
        let entries = read_log_entries(&harness, id);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].alert_warranted);
    }
}

#[tokio::test]
async fn stable_check_stays_quiet_across_sweeps() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/health")
        .with_status(200)
        .expect_at_least(2)
        .create_async()
        .await;

    let harness = harness();
    let record = check_record("c1", &check_url(&server, "/health"), "down", 1700000000000);
    harness
        .store
        .create(CHECKS_COLLECTION, "c1", &record)
        .await
        .unwrap();

    // 第一轮：down→up告警一次；第二轮：连续成功保持静默
    harness.scheduler.sweep_once().await;
    harness.scheduler.sweep_once().await;

    let sent = harness.gateway.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("currently up"));

    let entries = read_log_entries(&harness, "c1");
    assert_eq!(entries.len(), 2);
    assert!(entries[0].alert_warranted);
    assert!(!entries[1].alert_warranted);
}

#[tokio::test]
async fn malformed_record_is_skipped_untouched() {
    let harness = harness();
    // timeout_seconds缺失，校验应拒绝
    let malformed = json!({
        "id": "bad",
        "owner_phone": "5551234567",
        "protocol": "http",
        "url": "example.com",
        "method": "get",
        "success_codes": [200]
    });
    harness
        .store
        .create(CHECKS_COLLECTION, "bad", &malformed)
        .await
        .unwrap();

    harness.scheduler.sweep_once().await;

    // 不探测、不改动、不写日志、不告警
    let untouched = harness.store.read(CHECKS_COLLECTION, "bad").await.unwrap();
    assert_eq!(untouched, malformed);
    assert!(read_log_entries(&harness, "bad").is_empty());
    assert!(harness.gateway.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sweep_then_rotation_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/health")
        .with_status(200)
        .create_async()
        .await;

    let harness = harness();
    let record = check_record("c1", &check_url(&server, "/health"), "down", 0);
    harness
        .store
        .create(CHECKS_COLLECTION, "c1", &record)
        .await
        .unwrap();

    harness.scheduler.sweep_once().await;

    let active_content =
        std::fs::read_to_string(harness.logs_dir.path().join("c1.log")).unwrap();
    assert!(!active_content.is_empty());

    let rotator = LogRotator::new(harness.logs.clone(), Duration::from_secs(3600));
    rotator.rotate_once().await;

    // 活动日志存在且为空，归档解压逐字节还原
    let active = harness.logs_dir.path().join("c1.log");
    assert!(active.exists());
    assert_eq!(std::fs::metadata(&active).unwrap().len(), 0);

    let all = harness.logs.list(true).await.unwrap();
    let archive_id = all.iter().find(|id| id.starts_with("c1-")).unwrap();
    let restored = harness.logs.decompress(archive_id).await.unwrap();
    assert_eq!(restored, active_content);

    // 轮转后的追加继续写入清空后的活动日志
    harness.logs.append("c1", "next line").await.unwrap();
    let content = std::fs::read_to_string(&active).unwrap();
    assert_eq!(content, "next line\n");
}
