use std::sync::Arc;
use std::time::Duration;

use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, ConfigLoader, SdkConfig};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{Builder as S3ConfigBuilder, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use super::acl::Permission;
use super::backend::{
    BackendFactory, BackendRef, ListObjectsRequest, ListPage, ObjectStoreBackend,
    PutObjectRequest,
};
use super::registry::ObjectStoreProfile;
use crate::error::BoxError;

/// SDK 客户端参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// 单次操作超时
    pub operation_timeout: Option<Duration>,
    /// 建立连接超时
    pub connect_timeout: Option<Duration>,
    /// 自定义 endpoint（MinIO 等）一般需要 path-style
    pub force_path_style: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            operation_timeout: Some(Duration::from_secs(60)),
            connect_timeout: Some(Duration::from_secs(5)),
            force_path_style: true,
        }
    }
}

/// 基于 aws-sdk-s3 的对象存储后端
#[derive(Clone)]
pub struct S3Backend {
    client: S3Client,
}

impl S3Backend {
    /// 使用静态 AK/SK、自定义 endpoint 与 region 构造客户端
    pub async fn from_profile(profile: &ObjectStoreProfile, options: &ClientOptions) -> Self {
        let aws_cfg = Self::config_loader(profile, options).load().await;
        Self::from_sdk_config(&aws_cfg, profile, options)
    }

    // 失败直接返回给调用方，不做重试
    fn config_loader(profile: &ObjectStoreProfile, options: &ClientOptions) -> ConfigLoader {
        let region_provider = RegionProviderChain::first_try(Region::new(profile.region.clone()));

        let credentials = Credentials::new(
            profile.access_key.as_str(),
            profile.secret_key.as_str(),
            None,
            None,
            "static-credentials",
        );

        let mut timeouts = TimeoutConfig::builder();
        if let Some(timeout) = options.operation_timeout {
            timeouts = timeouts.operation_timeout(timeout);
        }
        if let Some(timeout) = options.connect_timeout {
            timeouts = timeouts.connect_timeout(timeout);
        }

        aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .credentials_provider(credentials)
            .timeout_config(timeouts.build())
            .retry_config(RetryConfig::disabled())
    }

    fn from_sdk_config(
        aws_cfg: &SdkConfig,
        profile: &ObjectStoreProfile,
        options: &ClientOptions,
    ) -> Self {
        let s3_config = S3ConfigBuilder::from(aws_cfg)
            .region(Region::new(profile.region.clone()))
            .endpoint_url(profile.endpoint.as_str())
            .force_path_style(options.force_path_style)
            .build();

        Self {
            client: S3Client::from_conf(s3_config),
        }
    }
}

fn service_error<E>(err: E) -> BoxError
where
    E: Into<aws_sdk_s3::Error>,
{
    Box::new(err.into())
}

#[async_trait::async_trait]
impl ObjectStoreBackend for S3Backend {
    async fn list_objects(&self, request: ListObjectsRequest<'_>) -> Result<ListPage, BoxError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(request.bucket)
            .prefix(request.prefix)
            .max_keys(request.max_keys)
            .set_continuation_token(request.continuation_token.map(str::to_string))
            .send()
            .await
            .map_err(service_error)?;

        let keys = output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();

        Ok(ListPage {
            keys,
            is_truncated: output.is_truncated().unwrap_or(false),
            next_continuation_token: output.next_continuation_token().map(str::to_string),
        })
    }

    async fn put_object(&self, request: PutObjectRequest<'_>) -> Result<(), BoxError> {
        let grantee = request.grant.grantee.header_value();
        let builder = self
            .client
            .put_object()
            .bucket(request.bucket)
            .key(request.key)
            .content_length(request.body.len() as i64)
            .set_content_type(request.content_type.map(str::to_string))
            .body(ByteStream::from(request.body));

        let builder = match request.grant.permission {
            Permission::FullControl => builder.grant_full_control(grantee),
            Permission::Read => builder.grant_read(grantee),
            Permission::ReadAcp => builder.grant_read_acp(grantee),
            Permission::WriteAcp => builder.grant_write_acp(grantee),
        };

        builder.send().await.map_err(service_error)?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, BoxError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(service_error)?;

        let data = output.body.collect().await.map_err(BoxError::from)?;
        Ok(data.into_bytes())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BoxError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(service_error)?;
        Ok(())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, BoxError> {
        let config = PresigningConfig::expires_in(expires_in).map_err(BoxError::from)?;
        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(service_error)?;
        Ok(presigned.uri().to_string())
    }
}

/// 每次调用都构造新的 [`S3Backend`]
#[derive(Debug, Clone, Default)]
pub struct S3BackendFactory {
    options: ClientOptions,
}

impl S3BackendFactory {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }
}

#[async_trait::async_trait]
impl BackendFactory for S3BackendFactory {
    async fn build(&self, profile: &ObjectStoreProfile) -> Result<BackendRef, BoxError> {
        let backend = S3Backend::from_profile(profile, &self.options).await;
        Ok(Arc::new(backend))
    }
}
