//! 辅助工具函数模块
//!
//! 提供配置加载、对象存储客户端初始化等常用辅助函数

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};

use crate::config::{PlatformConfig, load_config, load_properties_file};
use crate::error::ProfileLoadError;
use crate::storage::{ClientOptions, LoadReport, ObjectStoreClient, ProfileRegistry};

/// 服务启动辅助函数
pub struct ServiceHelper;

impl ServiceHelper {
    /// 加载 TOML 配置文件
    pub fn load_config(config_path: &Path) -> Result<PlatformConfig> {
        load_config(config_path)
            .with_context(|| format!("failed to load config: {}", config_path.display()))
    }

    /// 根据配置构造对象存储客户端
    ///
    /// # 参数
    /// * `config` - 平台配置
    /// * `strict` - 是否要求所有对象存储配置都加载成功
    pub fn object_store_client(config: &PlatformConfig, strict: bool) -> Result<ObjectStoreClient> {
        let (registry, report) = ProfileRegistry::load(config.storage.profile_entries());
        let registry = Self::finish_load(registry, report, strict)?;
        Ok(ObjectStoreClient::with_s3(
            registry,
            config.storage.client_options(),
        ))
    }

    /// 从 `.properties` 文件构造对象存储客户端
    pub fn object_store_client_from_properties(
        path: &Path,
        options: ClientOptions,
        strict: bool,
    ) -> Result<ObjectStoreClient> {
        let entries = load_properties_file(path)
            .with_context(|| format!("failed to load properties: {}", path.display()))?;
        let (registry, report) = ProfileRegistry::load(entries);
        let registry = Self::finish_load(registry, report, strict)?;
        Ok(ObjectStoreClient::with_s3(registry, options))
    }

    fn finish_load(
        registry: ProfileRegistry,
        report: LoadReport,
        strict: bool,
    ) -> Result<Arc<ProfileRegistry>> {
        // 非严格模式下失败项已在加载时记录警告日志
        if strict {
            report
                .into_result()
                .map_err(|failures| anyhow!(describe_failures(&failures)))
                .context("object store profile validation failed")?;
        }
        Ok(Arc::new(registry))
    }
}

fn describe_failures(failures: &[ProfileLoadError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
