//! # student-register
//!
//! 学生登记客户端，对接 REST 后端：
//! - `RecordService`：通过 HTTP 查询和创建
//! - `RegistrationForm`：字段状态、校验与提交
//! - `RecordTable`：自行拉取的列表，丢弃过期结果
//! - `RegisterPage`：通过刷新信号组合两者

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::records::{
    FormField, Record, RecordApi, RecordInput, RecordService, RecordTable, RegistrationForm,
    SubmitRejected,
};
pub use app::RegisterPage;
pub use config::{Config, ConfigError};
pub use crate::core::{DateFormatter, FetchError, Operation};
