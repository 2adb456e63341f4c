//! 巡检日志条目数据结构
//!
//! 每轮巡检为每个检查项无条件写入一条日志，逐行JSON格式；
//! 条目一经写入即不可变，后续仅由日志轮转器整体压缩归档

use crate::check::{CheckRecord, CheckState};
use crate::probe::ProbeOutcome;
use serde::{Deserialize, Serialize};

/// 单次巡检的日志条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 本轮巡检前的检查项记录快照
    pub check: CheckRecord,
    /// 本次探测结果
    pub outcome: ProbeOutcome,
    /// 新计算出的状态
    pub state: CheckState,
    /// 本次是否触发告警
    pub alert_warranted: bool,
    /// 巡检时间戳（epoch毫秒）
    pub time_of_check: i64,
}

impl LogEntry {
    /// 序列化为单行JSON
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// 从单行JSON反序列化
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
