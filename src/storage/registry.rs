//! 对象存储配置注册表
//!
//! 从 `<name>.<field>` 扁平键值表一次性构建，构建完成后只读。
//! 缺失字段的配置会被跳过，并在 [`LoadReport`] 中逐项记录。

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{debug, info, warn};

use crate::error::{ProfileField, ProfileLoadError, StorageError};

/// 对象存储连接配置
#[derive(Clone, PartialEq, Eq)]
pub struct ObjectStoreProfile {
    pub access_key: String,
    pub secret_key: String,
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
}

impl ObjectStoreProfile {
    /// 上传结果 URL：`<endpoint>/<bucket>/<file_path>`，不做任何转义
    pub fn object_url(&self, file_path: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, file_path)
    }
}

// secret_key 不输出到日志
impl fmt::Debug for ObjectStoreProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreProfile")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// 加载结果：每个配置名称对应成功或失败原因
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    outcomes: BTreeMap<String, Result<(), ProfileLoadError>>,
    /// 无法归属到任何配置名称的键，逐条记录
    malformed: Vec<ProfileLoadError>,
}

impl LoadReport {
    /// 所有配置均加载成功
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty() && self.outcomes.values().all(Result::is_ok)
    }

    /// 成功加载的配置名称
    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_ok())
            .map(|(name, _)| name.as_str())
    }

    /// 加载失败的配置
    pub fn failures(&self) -> impl Iterator<Item = &ProfileLoadError> {
        self.outcomes
            .values()
            .filter_map(|outcome| outcome.as_ref().err())
            .chain(self.malformed.iter())
    }

    pub fn outcome(&self, name: &str) -> Option<&Result<(), ProfileLoadError>> {
        self.outcomes.get(name)
    }

    /// 需要快速失败的调用方使用
    pub fn into_result(self) -> Result<(), Vec<ProfileLoadError>> {
        let failures: Vec<_> = self
            .outcomes
            .into_values()
            .filter_map(Result::err)
            .chain(self.malformed)
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures)
        }
    }
}

#[derive(Default)]
struct PendingProfile {
    fields: HashMap<ProfileField, String>,
}

impl PendingProfile {
    fn finish(mut self, name: &str) -> Result<ObjectStoreProfile, ProfileLoadError> {
        let missing: Vec<ProfileField> = ProfileField::ALL
            .into_iter()
            .filter(|field| !self.fields.contains_key(field))
            .collect();
        if !missing.is_empty() {
            return Err(ProfileLoadError::MissingFields {
                profile: name.to_string(),
                missing,
            });
        }

        let mut take = |field: ProfileField| self.fields.remove(&field).unwrap_or_default();
        Ok(ObjectStoreProfile {
            access_key: take(ProfileField::AccessKey),
            secret_key: take(ProfileField::SecretKey),
            endpoint: take(ProfileField::Endpoint),
            region: take(ProfileField::Region),
            bucket: take(ProfileField::Bucket),
        })
    }
}

/// 只读的对象存储配置注册表
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<String, ObjectStoreProfile>,
}

impl ProfileRegistry {
    /// 从扁平键值表构建注册表
    ///
    /// 键的格式为 `<name>.<field>`，`<name>` 取第一个 `.` 之前的部分，
    /// 其余部分必须是五个字段之一，否则忽略该键。字段值会去掉首尾空白，
    /// 空值视为缺失。任何配置出错都不会中断其他配置的加载。
    pub fn load<I, K, V>(entries: I) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pending: BTreeMap<String, PendingProfile> = BTreeMap::new();
        let mut report = LoadReport::default();

        for (key, value) in entries {
            let key = key.as_ref();
            let (name, field) = match key.split_once('.') {
                Some((name, field)) => (name, Some(field)),
                None => (key, None),
            };

            if name.is_empty() {
                warn!(key, "对象存储配置项缺少名称，已跳过");
                report.malformed.push(ProfileLoadError::EmptyName {
                    key: key.to_string(),
                });
                continue;
            }

            let profile = pending.entry(name.to_string()).or_default();
            match field.and_then(ProfileField::from_key) {
                Some(field) => {
                    let value = value.as_ref().trim();
                    if !value.is_empty() {
                        profile.fields.insert(field, value.to_string());
                    }
                }
                None => debug!(key, "忽略无法识别的对象存储配置项"),
            }
        }

        let mut profiles = HashMap::with_capacity(pending.len());
        for (name, profile) in pending {
            match profile.finish(&name) {
                Ok(profile) => {
                    profiles.insert(name.clone(), profile);
                    report.outcomes.insert(name, Ok(()));
                }
                Err(err) => {
                    warn!(profile = %name, error = %err, "对象存储配置加载失败，已跳过");
                    report.outcomes.insert(name, Err(err));
                }
            }
        }

        info!(
            loaded = profiles.len(),
            failed = report.failures().count(),
            "对象存储配置加载完成"
        );

        (Self { profiles }, report)
    }

    /// 按名称查找配置
    pub fn resolve(&self, name: &str) -> Result<&ObjectStoreProfile, StorageError> {
        self.profiles
            .get(name)
            .ok_or_else(|| StorageError::ProfileNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// 已注册的配置名称（按字典序）
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
