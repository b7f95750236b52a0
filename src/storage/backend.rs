use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use super::acl::Grant;
use super::registry::ObjectStoreProfile;
use crate::error::BoxError;

/// 单页列举结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    pub is_truncated: bool,
    pub next_continuation_token: Option<String>,
}

/// 列举请求
#[derive(Debug, Clone, Copy)]
pub struct ListObjectsRequest<'a> {
    pub bucket: &'a str,
    pub prefix: &'a str,
    pub continuation_token: Option<&'a str>,
    pub max_keys: i32,
}

/// 上传请求
#[derive(Debug, Clone)]
pub struct PutObjectRequest<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    pub body: Bytes,
    pub content_type: Option<&'a str>,
    pub grant: Grant,
}

/// 对象存储后端能力
#[async_trait::async_trait]
pub trait ObjectStoreBackend: Send + Sync {
    async fn list_objects(&self, request: ListObjectsRequest<'_>) -> Result<ListPage, BoxError>;
    async fn put_object(&self, request: PutObjectRequest<'_>) -> Result<(), BoxError>;
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, BoxError>;
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BoxError>;
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, BoxError>;
}

/// 根据配置构造后端客户端
#[async_trait::async_trait]
pub trait BackendFactory: Send + Sync {
    async fn build(&self, profile: &ObjectStoreProfile) -> Result<BackendRef, BoxError>;
}

pub type BackendRef = Arc<dyn ObjectStoreBackend>;
pub type BackendFactoryRef = Arc<dyn BackendFactory>;
