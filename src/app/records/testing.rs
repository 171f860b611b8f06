//! 单元测试用的内存版 `RecordApi`

use reqwest::StatusCode;
use std::sync::Mutex;

use super::model::{Record, RecordInput};
use super::service::RecordApi;
use crate::core::error::{FetchError, Operation};

#[derive(Debug, Default)]
pub struct FakeApi {
    records: Mutex<Vec<Record>>,
    creates: Mutex<Vec<RecordInput>>,
    lists: Mutex<usize>,
    fail_with: Option<StatusCode>,
}

impl FakeApi {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub fn create_calls(&self) -> Vec<RecordInput> {
        self.creates.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.lists.lock().unwrap()
    }
}

impl RecordApi for FakeApi {
    async fn list(&self) -> Result<Vec<Record>, FetchError> {
        *self.lists.lock().unwrap() += 1;
        if let Some(status) = self.fail_with {
            return Err(FetchError::status(Operation::List, status));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, input: &RecordInput) -> Result<Record, FetchError> {
        self.creates.lock().unwrap().push(input.clone());
        if let Some(status) = self.fail_with {
            return Err(FetchError::status(Operation::Create, status));
        }

        let mut records = self.records.lock().unwrap();
        let record = Record {
            id: Some((records.len() + 1).to_string()),
            name: input.name.clone(),
            email: input.email.clone(),
            birthdate: input.birthdate,
            program: input.program.clone(),
        };
        records.push(record.clone());
        Ok(record)
    }
}

pub fn record(id: &str, name: &str, birthdate: &str) -> Record {
    Record {
        id: Some(id.to_string()),
        name: name.to_string(),
        email: format!("{}@x.co", name.to_lowercase().replace(' ', ".")),
        birthdate: chrono::NaiveDate::parse_from_str(birthdate, "%Y-%m-%d").unwrap(),
        program: "CS".to_string(),
    }
}
