//! 对象存储模块
//!
//! - `registry`：`<name>.<field>` 扁平配置到 [`ObjectStoreProfile`] 的只读注册表
//! - `client`：按配置名称执行 list / upload / download / presign / delete
//! - `s3`：基于 aws-sdk-s3 的后端实现（MinIO、OSS、COS 等 S3 兼容服务均通过 endpoint 适配）

pub mod acl;
pub mod backend;
pub mod client;
pub mod registry;
pub mod s3;

pub use acl::{Grant, GroupGrantee, Permission};
pub use backend::{
    BackendFactory, BackendFactoryRef, BackendRef, ListObjectsRequest, ListPage,
    ObjectStoreBackend, PutObjectRequest,
};
pub use client::{LIST_PAGE_SIZE, ObjectStoreClient};
pub use registry::{LoadReport, ObjectStoreProfile, ProfileRegistry};
pub use s3::{ClientOptions, S3Backend, S3BackendFactory};
