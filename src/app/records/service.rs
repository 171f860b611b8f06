//! 记录集合的 HTTP 访问

#![allow(async_fn_in_trait)]

use reqwest::{Client, Url};
use tracing::{debug, warn};

use super::model::{Record, RecordInput};
use crate::config::ApiConfig;
use crate::core::error::{FetchError, Operation};

/// 组件依赖的后端操作
pub trait RecordApi {
    /// 获取全部记录，保持服务端顺序
    async fn list(&self) -> Result<Vec<Record>, FetchError>;

    /// 创建记录，返回带服务端 id 的记录
    async fn create(&self, input: &RecordInput) -> Result<Record, FetchError>;
}

/// 基于 HTTP 的 `RecordApi`，克隆开销小
#[derive(Debug, Clone)]
pub struct RecordService {
    client: Client,
    endpoint: Url,
}

impl RecordService {
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// 从 `[api]` 配置段创建服务
    pub fn from_config(api: &ApiConfig) -> Result<Self, crate::config::ConfigError> {
        Ok(Self::new(api.endpoint()?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn list(&self) -> Result<Vec<Record>, FetchError> {
        debug!("GET {}", self.endpoint);
        let op = Operation::List;

        let resp = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| FetchError::transport(op, e))
            .inspect_err(|e| log_failure(&self.endpoint, e))?;

        let status = resp.status();
        if !status.is_success() {
            let err = FetchError::status(op, status);
            log_failure(&self.endpoint, &err);
            return Err(err);
        }

        let records = resp
            .json::<Vec<Record>>()
            .await
            .map_err(|e| FetchError::decode(op, e))
            .inspect_err(|e| log_failure(&self.endpoint, e))?;

        debug!("GET {} returned {} records", self.endpoint, records.len());
        Ok(records)
    }

    pub async fn create(&self, input: &RecordInput) -> Result<Record, FetchError> {
        debug!("POST {} name={:?}", self.endpoint, input.name);
        let op = Operation::Create;

        // `.json()` 同时设置 `Content-Type: application/json`
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(input)
            .send()
            .await
            .map_err(|e| FetchError::transport(op, e))
            .inspect_err(|e| log_failure(&self.endpoint, e))?;

        let status = resp.status();
        if !status.is_success() {
            let err = FetchError::status(op, status);
            log_failure(&self.endpoint, &err);
            return Err(err);
        }

        let record = resp
            .json::<Record>()
            .await
            .map_err(|e| FetchError::decode(op, e))
            .inspect_err(|e| log_failure(&self.endpoint, e))?;

        debug!("POST {} created id={:?}", self.endpoint, record.id);
        Ok(record)
    }
}

impl RecordApi for RecordService {
    async fn list(&self) -> Result<Vec<Record>, FetchError> {
        RecordService::list(self).await
    }

    async fn create(&self, input: &RecordInput) -> Result<Record, FetchError> {
        RecordService::create(self, input).await
    }
}

fn log_failure(endpoint: &Url, err: &FetchError) {
    warn!("{:?} {} failed: {}", err.operation, endpoint, err.cause);
}
