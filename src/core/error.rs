//! 核心错误处理模块

use reqwest::StatusCode;

/// 失败的后端调用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
}

impl Operation {
    /// 操作失败时展示给用户的信息
    pub fn user_message(self) -> &'static str {
        match self {
            Operation::List => "Could not load records.",
            Operation::Create => "Failed to save record.",
        }
    }
}

/// 后端调用的网络或服务端错误
///
/// `Display` 只输出面向用户的信息，技术细节通过
/// [`std::error::Error::source`] 获取，用于日志
#[derive(Debug, thiserror::Error)]
#[error("{}", .operation.user_message())]
pub struct FetchError {
    pub operation: Operation,
    #[source]
    pub cause: FetchCause,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchCause {
    #[error("server responded with status {0}")]
    Status(StatusCode),
    #[error("request could not be completed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("response body could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

impl FetchError {
    pub fn status(operation: Operation, status: StatusCode) -> Self {
        Self {
            operation,
            cause: FetchCause::Status(status),
        }
    }

    pub fn transport(operation: Operation, err: reqwest::Error) -> Self {
        Self {
            operation,
            cause: FetchCause::Transport(err),
        }
    }

    pub fn decode(operation: Operation, err: reqwest::Error) -> Self {
        Self {
            operation,
            cause: FetchCause::Decode(err),
        }
    }

    /// 服务端返回的状态码（如果请求已到达服务端）
    pub fn status_code(&self) -> Option<StatusCode> {
        match self.cause {
            FetchCause::Status(code) => Some(code),
            _ => None,
        }
    }
}
