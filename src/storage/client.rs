//! 对象存储访问入口
//!
//! 每个配置对应一个 bucket；每次公开操作都会通过 [`BackendFactory`]
//! 构造一个新的后端客户端，调用结束后即释放。远端错误不做重试，
//! 原样作为 [`StorageError::Service`] 的 `source` 返回。

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, warn};
use url::Url;

use super::acl::{Grant, GroupGrantee, Permission};
use super::backend::{BackendFactoryRef, BackendRef, ListObjectsRequest, PutObjectRequest};
use super::registry::{ObjectStoreProfile, ProfileRegistry};
use super::s3::{ClientOptions, S3BackendFactory};
use crate::error::{BoxError, StorageError};

/// 单页最多返回的对象数
pub const LIST_PAGE_SIZE: i32 = 100;

#[derive(Clone)]
pub struct ObjectStoreClient {
    registry: Arc<ProfileRegistry>,
    factory: BackendFactoryRef,
}

impl ObjectStoreClient {
    pub fn new(registry: Arc<ProfileRegistry>, factory: BackendFactoryRef) -> Self {
        Self { registry, factory }
    }

    /// 使用 aws-sdk-s3 作为后端
    pub fn with_s3(registry: Arc<ProfileRegistry>, options: ClientOptions) -> Self {
        Self::new(registry, Arc::new(S3BackendFactory::new(options)))
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// 按配置名称构造一个新的后端客户端
    pub async fn build_client(&self, profile_name: &str) -> Result<BackendRef, StorageError> {
        let profile = self.registry.resolve(profile_name)?;
        self.build_for(profile_name, profile).await
    }

    async fn connect(
        &self,
        profile_name: &str,
    ) -> Result<(&ObjectStoreProfile, BackendRef), StorageError> {
        let profile = self.registry.resolve(profile_name)?;
        let backend = self.build_for(profile_name, profile).await?;
        Ok((profile, backend))
    }

    async fn build_for(
        &self,
        profile_name: &str,
        profile: &ObjectStoreProfile,
    ) -> Result<BackendRef, StorageError> {
        self.factory
            .build(profile)
            .await
            .map_err(|source| StorageError::ClientBuild {
                profile: profile_name.to_string(),
                source,
            })
    }

    /// 列举前缀下的全部对象 key，顺序与服务端分页顺序一致
    pub async fn list(&self, profile_name: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let (profile, backend) = self.connect(profile_name).await?;

        let mut file_paths = Vec::new();
        let mut continuation_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = backend
                .list_objects(ListObjectsRequest {
                    bucket: &profile.bucket,
                    prefix,
                    continuation_token: continuation_token.as_deref(),
                    max_keys: LIST_PAGE_SIZE,
                })
                .await
                .map_err(service_error("list_objects", profile, prefix))?;

            pages += 1;
            file_paths.extend(page.keys);

            if !page.is_truncated {
                break;
            }
            // 截断但没有游标时再请求只会重复第一页
            match page.next_continuation_token {
                Some(token) => continuation_token = Some(token),
                None => {
                    warn!(
                        bucket = %profile.bucket,
                        prefix,
                        pages,
                        "列举结果被截断但未返回 continuation token，停止分页"
                    );
                    break;
                }
            }
        }

        debug!(
            bucket = %profile.bucket,
            prefix,
            pages,
            total = file_paths.len(),
            "对象列举完成"
        );
        Ok(file_paths)
    }

    /// 上传内存中的文件内容，返回 `<endpoint>/<bucket>/<file_path>`
    pub async fn upload_file(
        &self,
        profile_name: &str,
        body: impl Into<Bytes>,
        file_path: &str,
        content_type: Option<&str>,
        grantee: GroupGrantee,
        permission: Permission,
    ) -> Result<String, StorageError> {
        let (profile, backend) = self.connect(profile_name).await?;
        let body = body.into();

        debug!(
            key = file_path,
            bucket = %profile.bucket,
            file_size = body.len(),
            "开始上传对象"
        );

        backend
            .put_object(PutObjectRequest {
                bucket: &profile.bucket,
                key: file_path,
                body,
                content_type,
                grant: Grant::new(grantee, permission),
            })
            .await
            .map_err(service_error("put_object", profile, file_path))?;

        debug!(key = file_path, bucket = %profile.bucket, "对象上传成功");
        Ok(profile.object_url(file_path))
    }

    /// 下载对象全部内容
    pub async fn download_file(
        &self,
        profile_name: &str,
        file_path: &str,
    ) -> Result<Bytes, StorageError> {
        let (profile, backend) = self.connect(profile_name).await?;

        let data = backend
            .get_object(&profile.bucket, file_path)
            .await
            .map_err(service_error("get_object", profile, file_path))?;

        debug!(
            key = file_path,
            bucket = %profile.bucket,
            file_size = data.len(),
            "对象下载完成"
        );
        Ok(data)
    }

    /// 生成从当前时刻起 `expire_seconds` 秒内有效的下载链接，不检查对象是否存在
    pub async fn generate_presigned_url(
        &self,
        profile_name: &str,
        file_path: &str,
        expire_seconds: u64,
    ) -> Result<Url, StorageError> {
        let (profile, backend) = self.connect(profile_name).await?;

        let raw = backend
            .presign_get(
                &profile.bucket,
                file_path,
                Duration::from_secs(expire_seconds),
            )
            .await
            .map_err(service_error("presign_get_object", profile, file_path))?;

        let url = Url::parse(&raw)?;
        debug!(
            key = file_path,
            bucket = %profile.bucket,
            expire_seconds,
            "已生成预签名URL"
        );
        Ok(url)
    }

    /// 删除对象
    pub async fn delete_file(&self, profile_name: &str, file_path: &str) -> Result<(), StorageError> {
        let (profile, backend) = self.connect(profile_name).await?;

        backend
            .delete_object(&profile.bucket, file_path)
            .await
            .map_err(service_error("delete_object", profile, file_path))?;

        debug!(key = file_path, bucket = %profile.bucket, "对象已删除");
        Ok(())
    }
}

fn service_error<'a>(
    operation: &'static str,
    profile: &'a ObjectStoreProfile,
    key: &'a str,
) -> impl FnOnce(BoxError) -> StorageError + 'a {
    move |source| StorageError::Service {
        operation,
        bucket: profile.bucket.clone(),
        key: key.to_string(),
        source,
    }
}
