//! 错误类型模块
//!
//! - `ProfileLoadError`：单个对象存储配置加载失败（不会中断其他配置的加载）
//! - `StorageError`：对象存储操作错误，远端错误原样作为 `source` 透传
//! - `ConfigError`：配置文件读取 / 解析错误

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// 透传底层 SDK 错误时使用的类型擦除错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 对象存储配置项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileField {
    AccessKey,
    SecretKey,
    Endpoint,
    Region,
    Bucket,
}

impl ProfileField {
    pub const ALL: [ProfileField; 5] = [
        ProfileField::AccessKey,
        ProfileField::SecretKey,
        ProfileField::Endpoint,
        ProfileField::Region,
        ProfileField::Bucket,
    ];

    /// 配置键中使用的字段名
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::AccessKey => "access_key",
            ProfileField::SecretKey => "secret_key",
            ProfileField::Endpoint => "endpoint",
            ProfileField::Region => "region",
            ProfileField::Bucket => "bucket",
        }
    }

    pub fn from_key(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == field)
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个配置加载失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileLoadError {
    #[error("object store profile `{profile}` is missing fields: {}", join_fields(.missing))]
    MissingFields {
        profile: String,
        missing: Vec<ProfileField>,
    },
    #[error("configuration key `{key}` has an empty profile name")]
    EmptyName { key: String },
}

impl ProfileLoadError {
    /// 出错的配置名称（空名称返回空字符串）
    pub fn profile(&self) -> &str {
        match self {
            ProfileLoadError::MissingFields { profile, .. } => profile,
            ProfileLoadError::EmptyName { .. } => "",
        }
    }
}

fn join_fields(fields: &[ProfileField]) -> String {
    fields
        .iter()
        .map(ProfileField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 对象存储操作错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object store profile not found: {0}")]
    ProfileNotFound(String),

    #[error("failed to build object store client for profile `{profile}`")]
    ClientBuild {
        profile: String,
        #[source]
        source: BoxError,
    },

    #[error("object store {operation} failed, bucket={bucket}, key={key}")]
    Service {
        operation: &'static str,
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("object store returned an invalid presigned url")]
    InvalidUrl(#[from] url::ParseError),
}

impl StorageError {
    /// 取出底层 SDK 错误（仅 `ClientBuild` / `Service` 携带）
    pub fn into_source(self) -> Option<BoxError> {
        match self {
            StorageError::ClientBuild { source, .. } | StorageError::Service { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// 配置文件错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config format: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
