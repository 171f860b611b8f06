//! 记录字段的显示格式化

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::fmt::Write as _;
use tracing::warn;

use crate::app::records::model::BIRTHDATE_FORMAT;

/// 美式长日期，例如 `July 2, 2001`
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// 出生日期显示格式化器
///
/// 只处理日历日期，显示的日期不会随本地时区偏移
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    pattern: String,
}

impl DateFormatter {
    /// 创建格式化器，`pattern` 无法用于纯日期时返回 `None`
    pub fn new(pattern: impl Into<String>) -> Option<Self> {
        let pattern = pattern.into();
        if !is_valid_pattern(&pattern) {
            return None;
        }
        Some(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn format(&self, date: &NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.pattern)).is_ok() {
            return out;
        }

        warn!("日期格式 {:?} 无法格式化 {}，改用 ISO 格式", self.pattern, date);
        date.format(BIRTHDATE_FORMAT).to_string()
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// 检查 strftime 模式能否作用于纯日期（不含时间、时区字段）
pub(crate) fn is_valid_pattern(pattern: &str) -> bool {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.is_empty() || items.iter().any(|item| matches!(item, Item::Error)) {
        return false;
    }

    let Some(sample) = NaiveDate::from_ymd_opt(2001, 7, 2) else {
        return false;
    };
    let mut out = String::new();
    write!(out, "{}", sample.format_with_items(items.iter())).is_ok()
}
