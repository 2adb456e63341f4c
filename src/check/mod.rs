//! 检查项模块
//!
//! 定义检查项记录的数据结构与入检前的校验逻辑

pub mod record;

pub use record::{validate_record, CheckRecord, CheckState, HttpMethod, Protocol};
