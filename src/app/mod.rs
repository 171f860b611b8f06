//! 应用组件

pub mod page;
pub mod records;

pub use page::RegisterPage;
