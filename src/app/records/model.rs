//! 学生记录数据模型

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// 出生日期字段的传输格式
pub const BIRTHDATE_FORMAT: &str = "%Y-%m-%d";

/// 后端返回的已登记学生
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_id"
    )]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(with = "birthdate")]
    pub birthdate: NaiveDate,
    pub program: String,
}

/// 创建请求体，不含 id，由后端分配
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInput {
    pub name: String,
    pub email: String,
    #[serde(with = "birthdate")]
    pub birthdate: NaiveDate,
    pub program: String,
}

impl From<Record> for RecordInput {
    fn from(record: Record) -> Self {
        Self {
            name: record.name,
            email: record.email,
            birthdate: record.birthdate,
            program: record.program,
        }
    }
}

fn de_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    }))
}

/// 解析后端返回的出生日期
///
/// `YYYY-MM-DD` 直接使用；完整时间戳取其 UTC 日历日期
pub fn parse_birthdate(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, BIRTHDATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

mod birthdate {
    use super::{parse_birthdate, BIRTHDATE_FORMAT};
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(BIRTHDATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_birthdate(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid birthdate: {raw:?}")))
    }
}
