//! 登记页面：组合表单与表格

use tracing::info;

use super::records::{
    LoadTicket, Record, RecordApi, RecordTable, RegistrationForm, SubmitRejected,
};
use crate::core::format::DateFormatter;

pub const TITLE: &str = "Students Register";

/// 父容器。创建成功后翻转刷新信号，表格随之重新拉取列表
#[derive(Debug)]
pub struct RegisterPage {
    form: RegistrationForm,
    table: RecordTable,
    refresh: bool,
}

impl RegisterPage {
    pub fn new(formatter: DateFormatter) -> Self {
        Self {
            form: RegistrationForm::new(),
            table: RecordTable::new(formatter),
            refresh: false,
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut RecordTable {
        &mut self.table
    }

    pub fn refresh_signal(&self) -> bool {
        self.refresh
    }

    pub fn mount(&mut self) -> LoadTicket {
        self.table.mount(self.refresh)
    }

    /// 交给表单的创建回调
    pub fn record_created(&mut self, record: &Record) -> Option<LoadTicket> {
        info!("Student added: {}", record.name);
        self.refresh = !self.refresh;
        self.table.observe_refresh(self.refresh)
    }

    /// 挂载表格并等待首次加载
    pub async fn load<A: RecordApi>(&mut self, api: &A) {
        let ticket = self.mount();
        let result = api.list().await;
        self.table.finish_load(ticket, result);
    }

    /// 提交表单，成功后重新加载表格
    pub async fn submit<A: RecordApi>(
        &mut self,
        api: &A,
    ) -> Result<Option<Record>, SubmitRejected> {
        let created = self.form.submit(api, |_| {}).await?;
        if let Some(record) = &created {
            if let Some(ticket) = self.record_created(record) {
                let result = api.list().await;
                self.table.finish_load(ticket, result);
            }
        }
        Ok(created)
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(TITLE.len());
        format!(
            "{TITLE}\n{rule}\n\n{}\n{}",
            self.form.render(),
            self.table.render()
        )
    }
}
