//! 巡检工作器模块
//!
//! 提供巡检调度、结果处理与日志轮转功能

pub mod entry;
pub mod processor;
pub mod rotator;
pub mod sweeper;

pub use entry::LogEntry;
pub use processor::OutcomeProcessor;
pub use rotator::LogRotator;
pub use sweeper::SweepScheduler;
