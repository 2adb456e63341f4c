//! 存储模块
//!
//! 提供检查项记录的键值存储与巡检结果日志存储的trait及文件实现

pub mod data;
pub mod logs;

pub use data::{DataStore, FileDataStore};
pub use logs::{FileLogStore, LogStore};

/// 检查项记录所在的集合名
pub const CHECKS_COLLECTION: &str = "checks";
