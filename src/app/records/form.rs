//! 登记表单状态

use chrono::NaiveDate;
use std::fmt::{self, Write as _};
use tracing::{error, info};
use validator::Validate;

use super::model::{Record, RecordInput, BIRTHDATE_FORMAT};
use super::service::RecordApi;
use crate::core::error::FetchError;

/// 表单中可编辑的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Birthdate,
    Program,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Email,
        FormField::Birthdate,
        FormField::Program,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Birthdate => "birthdate",
            FormField::Program => "program",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }

    fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Birthdate => "Birth Day",
            FormField::Program => "Program",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 四个输入框的原始文本
#[derive(Debug, Default, Clone, PartialEq, Eq, Validate)]
pub struct FormFields {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub birthdate: String,
    #[validate(length(min = 1))]
    pub program: String,
}

impl FormFields {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Birthdate => &self.birthdate,
            FormField::Program => &self.program,
        }
    }

    fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Birthdate => &mut self.birthdate,
            FormField::Program => &mut self.program,
        }
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            birthdate: self.birthdate.trim().to_string(),
            program: self.program.trim().to_string(),
        }
    }

    /// 未通过必填校验的字段，按表单顺序
    fn missing(&self) -> Vec<FormField> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };
        let invalid: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        FormField::ALL
            .into_iter()
            .filter(|f| invalid.iter().any(|name| name == f.as_str()))
            .collect()
    }
}

/// 提交未发往后端的原因
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("A submission is already in progress.")]
    InFlight,
    #[error("Please fill in: {}.", join_fields(.0))]
    MissingFields(Vec<FormField>),
    #[error("Birthdate must be a date in YYYY-MM-DD format.")]
    InvalidBirthdate,
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 登记新学生的表单
///
/// 提交分两步，请求可在别处等待：
/// [`begin_submit`](Self::begin_submit) 校验并标记提交中，
/// [`finish_submit`](Self::finish_submit) 应用后端结果
#[derive(Debug, Default)]
pub struct RegistrationForm {
    fields: FormFields,
    submitting: bool,
    message: Option<String>,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.fields.get_mut(field) = value.into();
    }

    /// 创建请求进行中，此时提交按钮不可用
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// 表单下方显示的校验或失败信息
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn begin_submit(&mut self) -> Result<RecordInput, SubmitRejected> {
        if self.submitting {
            return Err(SubmitRejected::InFlight);
        }

        match self.prepare() {
            Ok(input) => {
                self.submitting = true;
                self.message = None;
                Ok(input)
            }
            Err(rejected) => {
                self.message = Some(rejected.to_string());
                Err(rejected)
            }
        }
    }

    fn prepare(&self) -> Result<RecordInput, SubmitRejected> {
        // 只在必填检查时去掉首尾空白，提交的是原始输入
        let missing = self.fields.trimmed().missing();
        if !missing.is_empty() {
            return Err(SubmitRejected::MissingFields(missing));
        }

        let birthdate = NaiveDate::parse_from_str(self.fields.birthdate.trim(), BIRTHDATE_FORMAT)
            .map_err(|_| SubmitRejected::InvalidBirthdate)?;

        Ok(RecordInput {
            name: self.fields.name.clone(),
            email: self.fields.email.clone(),
            birthdate,
            program: self.fields.program.clone(),
        })
    }

    /// 应用创建结果。成功时返回新记录并清空表单
    pub fn finish_submit(&mut self, result: Result<Record, FetchError>) -> Option<Record> {
        self.submitting = false;

        match result {
            Ok(record) => {
                info!("Record created: id={:?} name={:?}", record.id, record.name);
                self.fields = FormFields::default();
                self.message = None;
                Some(record)
            }
            Err(err) => {
                error!("Create failed: {} ({})", err, err.cause);
                self.message = Some(err.to_string());
                None
            }
        }
    }

    /// 校验、通过 `api` 创建，成功后通知 `on_created`
    ///
    /// 后端调用失败时返回 `Ok(None)`，设置错误信息并保留表单内容
    pub async fn submit<A, F>(
        &mut self,
        api: &A,
        on_created: F,
    ) -> Result<Option<Record>, SubmitRejected>
    where
        A: RecordApi,
        F: FnOnce(&Record),
    {
        let input = self.begin_submit()?;
        let result = api.create(&input).await;
        // 先通知父组件，再清空表单
        if let Ok(record) = &result {
            on_created(record);
        }
        Ok(self.finish_submit(result))
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for field in FormField::ALL {
            let _ = writeln!(out, "  {:<10} {}", format!("{}:", field.label()), self.fields.get(field));
        }
        if self.submitting {
            out.push_str("  [Registering...]\n");
        } else {
            out.push_str("  [Register Student]\n");
        }
        if let Some(message) = &self.message {
            let _ = writeln!(out, "  ! {message}");
        }
        out
    }
}
