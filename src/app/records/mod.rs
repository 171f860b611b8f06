//! 学生记录：数据模型、HTTP 服务、表单与表格组件

pub mod form;
pub mod model;
pub mod service;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use form::{FormField, FormFields, RegistrationForm, SubmitRejected};
pub use model::{Record, RecordInput};
pub use service::{RecordApi, RecordService};
pub use table::{LoadTicket, RecordTable, TableRow};
