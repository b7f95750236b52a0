//! Flare 平台工具库
//!
//! 提供对象存储访问封装（配置注册表 + S3 兼容客户端）与输入格式检测工具

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod utils;
pub mod validation;

pub use config::{
    LoggingConfig, PlatformConfig, StorageConfig, load_config, load_config_with_fallback,
    load_properties_file, parse_config, parse_properties,
};
pub use error::{BoxError, ConfigError, ProfileField, ProfileLoadError, StorageError};
pub use logging::init_tracing_from_config;
pub use storage::{
    ClientOptions, GroupGrantee, LoadReport, ObjectStoreClient, ObjectStoreProfile, Permission,
    ProfileRegistry,
};
pub use utils::ServiceHelper;
