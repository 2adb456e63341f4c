//! 探测模块
//!
//! 提供单次HTTP/HTTPS探测的执行与结果类型

pub mod executor;
pub mod outcome;

pub use executor::{HttpProbeExecutor, ProbeExecutor};
pub use outcome::ProbeOutcome;
