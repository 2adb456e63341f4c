//! 告警模块
//!
//! 定义告警网关trait、Twilio短信实现与状态变迁告警的派发逻辑

pub mod dispatcher;
pub mod gateway;

pub use dispatcher::AlertDispatcher;
pub use gateway::{AlertGateway, NoOpGateway, TwilioGateway};
