//! 记录表格的状态与渲染

use std::fmt::Write as _;
use tracing::{debug, error};

use super::model::Record;
use super::service::RecordApi;
use crate::core::error::FetchError;
use crate::core::format::DateFormatter;

pub const HEADERS: [&str; 4] = ["Name", "Email", "Birth Day", "Program"];
pub const EMPTY_PLACEHOLDER: &str = "No records registered";
pub const LOADING_TEXT: &str = "Loading records...";

const COLUMN_SEPARATOR: &str = " | ";

/// 标识一次加载，只应用最新一次的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// 渲染出的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Record([String; 4]),
    /// 跨所有列的单行
    Placeholder(&'static str),
}

impl TableRow {
    pub fn to_line(&self) -> String {
        match self {
            TableRow::Record(cells) => cells.join(COLUMN_SEPARATOR),
            TableRow::Placeholder(text) => (*text).to_string(),
        }
    }
}

/// 自行拉取数据的记录表格
///
/// 挂载时加载；通过 [`observe_refresh`](Self::observe_refresh)
/// 观察到的刷新信号变化时再次加载
#[derive(Debug)]
pub struct RecordTable {
    records: Vec<Record>,
    loading: bool,
    error: Option<String>,
    refresh_seen: Option<bool>,
    generation: u64,
    formatter: DateFormatter,
}

impl RecordTable {
    pub fn new(formatter: DateFormatter) -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            refresh_seen: None,
            generation: 0,
            formatter,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 开始首次加载
    pub fn mount(&mut self, refresh: bool) -> LoadTicket {
        self.refresh_seen = Some(refresh);
        self.begin_load()
    }

    /// `refresh` 与上次不同时开始加载
    pub fn observe_refresh(&mut self, refresh: bool) -> Option<LoadTicket> {
        if self.refresh_seen == Some(refresh) {
            return None;
        }
        self.refresh_seen = Some(refresh);
        Some(self.begin_load())
    }

    /// 开始加载，作废仍在进行的加载
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        debug!("Table load #{} started", self.generation);
        LoadTicket(self.generation)
    }

    /// 应用加载结果。票据已过期时丢弃结果并返回 `false`
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Record>, FetchError>,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!(
                "Dropping stale load #{} (current #{})",
                ticket.0, self.generation
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(records) => {
                debug!("Table load #{} returned {} records", ticket.0, records.len());
                self.records = records;
                self.error = None;
            }
            Err(err) => {
                error!("Table load #{} failed: {} ({})", ticket.0, err, err.cause);
                // 保留之前加载的记录
                self.error = Some(err.to_string());
            }
        }
        true
    }

    /// 通过 `api` 加载并等待结果
    pub async fn reload<A: RecordApi>(&mut self, api: &A) {
        let ticket = self.begin_load();
        let result = api.list().await;
        self.finish_load(ticket, result);
    }

    pub fn rows(&self) -> Vec<TableRow> {
        if self.records.is_empty() {
            return vec![TableRow::Placeholder(EMPTY_PLACEHOLDER)];
        }

        self.records
            .iter()
            .map(|r| {
                TableRow::Record([
                    r.name.clone(),
                    r.email.clone(),
                    self.formatter.format(&r.birthdate),
                    r.program.clone(),
                ])
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", HEADERS.join(COLUMN_SEPARATOR));
        for row in self.rows() {
            let _ = writeln!(out, "{}", row.to_line());
        }
        if self.loading {
            let _ = writeln!(out, "{LOADING_TEXT}");
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "! {error}");
        }
        out
    }
}
