use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::format::{is_valid_pattern, DateFormatter, DEFAULT_DATE_FORMAT};

/// 全局配置实例
static CONFIG: OnceLock<Config> = OnceLock::new();

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV: &str = "STUDENT_REGISTER_CONFIG";

const CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 客户端配置结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端地址配置
    pub api: ApiConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 显示配置
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 后端协议、主机和端口
    pub base_url: String,
    /// `base_url` 下的集合路径
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)，`RUST_LOG` 优先
    pub level: String,
    /// 是否输出到控制台 (stderr)
    pub console_output: bool,
    /// 按日期分割的日志目录，未设置则不写文件
    pub log_dir: Option<PathBuf>,
    /// 日志文件名前缀
    pub file_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 出生日期的 strftime 格式
    pub date_format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            resource: "users".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            log_dir: None,
            file_prefix: "student-register".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ApiConfig {
    /// 记录集合的完整 URL
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| ConfigError::Validation(format!("invalid api.base_url: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be http or https, got {}",
                base.scheme()
            )));
        }

        let resource = self.resource.trim().trim_matches('/');
        if resource.is_empty() {
            return Err(ConfigError::Validation("api.resource must not be empty".to_string()));
        }
        base.join(resource)
            .map_err(|e| ConfigError::Validation(format!("invalid api.resource: {e}")))
    }
}

impl DisplayConfig {
    pub fn formatter(&self) -> Result<DateFormatter, ConfigError> {
        DateFormatter::new(self.date_format.clone()).ok_or_else(|| {
            ConfigError::Validation(format!("invalid display.date_format: {:?}", self.date_format))
        })
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::FileWrite(e.to_string()))?;
        }

        fs::write(path.as_ref(), content).map_err(|e| ConfigError::FileWrite(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.endpoint()?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "invalid log level: {}, expected one of {:?}",
                self.logging.level, valid_levels
            )));
        }
        if self.logging.log_dir.is_some() && self.logging.file_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "logging.file_prefix must not be empty when log_dir is set".to_string(),
            ));
        }

        if !is_valid_pattern(&self.display.date_format) {
            return Err(ConfigError::Validation(format!(
                "invalid display.date_format: {:?}",
                self.display.date_format
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(String),
    #[error("failed to write config file: {0}")]
    FileWrite(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("failed to serialize config: {0}")]
    Serialize(String),
    #[error("invalid config: {0}")]
    Validation(String),
}

/// 查找要使用的配置文件
///
/// 顺序：`explicit`、`$STUDENT_REGISTER_CONFIG`、`config.toml`、
/// `./config/config.toml`。返回 `None` 表示使用默认配置
pub fn locate_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    CONFIG_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// 从配置文件或默认值加载配置
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>), ConfigError> {
    match locate_config(explicit) {
        Some(path) => Ok((Config::load_from_file(&path)?, Some(path))),
        None => Ok((Config::default(), None)),
    }
}

/// 校验并初始化全局配置
pub fn init_config(config: Config) -> Result<&'static Config, ConfigError> {
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| ConfigError::Validation("configuration already initialized".to_string()))?;

    get_config().ok_or_else(|| ConfigError::Validation("configuration not installed".to_string()))
}

/// 获取 [`init_config`] 设置的全局配置
pub fn get_config() -> Option<&'static Config> {
    CONFIG.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.resource, "users");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.display.date_format, "%B %-d, %Y");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_join() {
        let mut api = ApiConfig::default();
        assert_eq!(api.endpoint().unwrap().as_str(), "http://localhost:8080/users");

        api.base_url = "https://example.com/api".to_string();
        api.resource = "/records".to_string();
        assert_eq!(api.endpoint().unwrap().as_str(), "https://example.com/api/records");
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.api.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.resource = " / ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.date_format = "%Q".to_string();
        assert!(config.validate().is_err());

        // 含时间字段的模式无法格式化纯日期
        let mut config = Config::default();
        config.display.date_format = "%B %-d, %Y %H:%M".to_string();
        assert!(config.validate().is_err());
        assert!(config.display.formatter().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://10.0.0.5:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.api.resource, "users");
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.logging.log_dir = Some(PathBuf::from("logs"));
        config.save_to_file(&config_path).unwrap();

        let (loaded, source) = load_config(Some(&config_path)).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(source.as_deref(), Some(config_path.as_path()));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = Config::load_from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }
}
