//! 组件共用的核心模块

pub mod error;
pub mod format;

pub use error::{FetchCause, FetchError, Operation};
pub use format::DateFormatter;
