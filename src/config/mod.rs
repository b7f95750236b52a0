//! 平台工具配置模块
//!
//! 该模块负责：
//! - TOML 配置文件加载和解析（日志、对象存储客户端参数、对象存储配置）
//! - 将 `[storage.profiles]` 下的配置表展开为 `<name>.<field>` 扁平键
//! - 读取 Java 风格的 `.properties` 文件作为扁平配置源

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use toml::Value;
use tracing::warn;

use crate::error::ConfigError;
use crate::storage::ClientOptions;

mod properties;
pub use properties::{load_properties_file, parse_properties};

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别（RUST_LOG 未设置时生效）
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub with_target: bool,
    #[serde(default)]
    pub with_thread_ids: bool,
    #[serde(default)]
    pub with_file: bool,
    #[serde(default)]
    pub with_line_number: bool,
    /// 是否输出 JSON 格式日志
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            with_target: true,
            with_thread_ids: false,
            with_file: false,
            with_line_number: false,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_true() -> bool {
    true
}

/// 对象存储配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    /// 单次操作超时时间（毫秒）
    #[serde(default)]
    pub operation_timeout_ms: Option<u64>,
    /// 连接超时时间（毫秒）
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
    /// 是否强制 path-style 访问（默认开启，兼容 MinIO 等自定义 endpoint）
    #[serde(default)]
    pub force_path_style: Option<bool>,
    /// 对象存储配置表，保留原始结构以便逐项上报缺失字段
    #[serde(default)]
    pub profiles: toml::Table,
}

impl StorageConfig {
    /// 将配置表展开为 `<name>.<field>` 扁平键值对
    pub fn profile_entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        flatten_table("", &self.profiles, &mut entries);
        entries
    }

    /// 构造 SDK 客户端参数
    pub fn client_options(&self) -> ClientOptions {
        let defaults = ClientOptions::default();
        ClientOptions {
            operation_timeout: self
                .operation_timeout_ms
                .map(Duration::from_millis)
                .or(defaults.operation_timeout),
            connect_timeout: self
                .connect_timeout_ms
                .map(Duration::from_millis)
                .or(defaults.connect_timeout),
            force_path_style: self.force_path_style.unwrap_or(defaults.force_path_style),
        }
    }
}

/// 平台工具配置主结构体
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PlatformConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn flatten_table(prefix: &str, table: &toml::Table, out: &mut Vec<(String, String)>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(inner) => flatten_table(&full_key, inner, out),
            Value::String(text) => out.push((full_key, text.clone())),
            other => out.push((full_key, other.to_string())),
        }
    }
}

/// 从文件加载配置
pub fn load_config(path: &Path) -> Result<PlatformConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// 解析 TOML 配置内容
pub fn parse_config(content: &str) -> Result<PlatformConfig, toml::de::Error> {
    toml::from_str(content)
}

/// 依次尝试候选路径，全部失败时使用默认配置
pub fn load_config_with_fallback(candidates: &[PathBuf]) -> PlatformConfig {
    for path in candidates {
        match load_config(path) {
            Ok(cfg) => return cfg,
            Err(err) => {
                warn!("failed to load config from {}: {err}", path.display());
            }
        }
    }

    warn!("no configuration source succeeded, falling back to defaults");
    PlatformConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[logging]
level = "info"
json = true

[storage]
operation_timeout_ms = 5000
force_path_style = false

[storage.profiles]
"backup.bucket" = "backup"

[storage.profiles.avatar]
access_key = "ak"
secret_key = "sk"
endpoint = "http://localhost:9000"
region = "us-east-1"
bucket = "avatar"
"#;

    #[test]
    fn test_parse_config() {
        let cfg = parse_config(SAMPLE).unwrap();
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.json);
        assert!(cfg.logging.with_target);

        let options = cfg.storage.client_options();
        assert_eq!(options.operation_timeout, Some(Duration::from_millis(5000)));
        assert!(!options.force_path_style);
    }

    #[test]
    fn test_profile_entries_are_flattened() {
        let cfg = parse_config(SAMPLE).unwrap();
        let mut entries = cfg.storage.profile_entries();
        entries.sort();

        assert!(entries.contains(&("avatar.access_key".to_string(), "ak".to_string())));
        assert!(entries.contains(&("avatar.bucket".to_string(), "avatar".to_string())));
        assert!(entries.contains(&("backup.bucket".to_string(), "backup".to_string())));
        assert_eq!(entries.len(), 6);
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let cfg = parse_config("[storage.profiles.num]\nregion = 42\n").unwrap();
        assert_eq!(
            cfg.storage.profile_entries(),
            vec![("num.region".to_string(), "42".to_string())]
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.storage.profiles.is_empty());
        assert!(cfg.storage.client_options().force_path_style);
    }

    #[test]
    fn test_fallback_to_defaults() {
        let cfg = load_config_with_fallback(&[PathBuf::from("/nonexistent/flare.toml")]);
        assert!(cfg.storage.profile_entries().is_empty());
    }
}
