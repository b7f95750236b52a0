// 对象存储客户端测试 - 使用内存后端验证分页、上传、下载、预签名与删除行为
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use flare_platform_util::error::BoxError;
use flare_platform_util::storage::{
    BackendFactory, BackendRef, GroupGrantee, ListObjectsRequest, ListPage, ObjectStoreBackend,
    ObjectStoreClient, ObjectStoreProfile, Permission, ProfileRegistry, PutObjectRequest,
};
use flare_platform_util::{StorageError, validation};

#[derive(Debug, Clone, PartialEq)]
struct StoredObject {
    body: Bytes,
    content_type: Option<String>,
    grant: (GroupGrantee, Permission),
}

#[derive(Debug, Clone)]
struct ListCall {
    prefix: String,
    continuation_token: Option<String>,
    max_keys: i32,
}

/// 内存对象存储，列举结果可以预置为固定分页
#[derive(Default)]
struct MemoryBackend {
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    scripted_pages: Mutex<Vec<ListPage>>,
    list_calls: Mutex<Vec<ListCall>>,
}

#[async_trait::async_trait]
impl ObjectStoreBackend for MemoryBackend {
    async fn list_objects(&self, request: ListObjectsRequest<'_>) -> Result<ListPage, BoxError> {
        self.list_calls.lock().unwrap().push(ListCall {
            prefix: request.prefix.to_string(),
            continuation_token: request.continuation_token.map(str::to_string),
            max_keys: request.max_keys,
        });

        let mut scripted = self.scripted_pages.lock().unwrap();
        if !scripted.is_empty() {
            return Ok(scripted.remove(0));
        }

        let keys = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(bucket, key)| bucket == request.bucket && key.starts_with(request.prefix))
            .map(|(_, key)| key.clone())
            .collect();
        Ok(ListPage {
            keys,
            is_truncated: false,
            next_continuation_token: None,
        })
    }

    async fn put_object(&self, request: PutObjectRequest<'_>) -> Result<(), BoxError> {
        self.objects.lock().unwrap().insert(
            (request.bucket.to_string(), request.key.to_string()),
            StoredObject {
                body: request.body,
                content_type: request.content_type.map(str::to_string),
                grant: (request.grant.grantee, request.grant.permission),
            },
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes, BoxError> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|object| object.body.clone())
            .ok_or_else(|| format!("NoSuchKey: {key}").into())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BoxError> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, BoxError> {
        Ok(format!(
            "http://memory.local/{bucket}/{key}?X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }
}

/// 所有配置共用同一个内存后端，并统计构造次数
struct MemoryFactory {
    backend: Arc<MemoryBackend>,
    builds: AtomicUsize,
    built_for: Mutex<Vec<String>>,
}

impl MemoryFactory {
    fn new(backend: Arc<MemoryBackend>) -> Self {
        Self {
            backend,
            builds: AtomicUsize::new(0),
            built_for: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl BackendFactory for MemoryFactory {
    async fn build(&self, profile: &ObjectStoreProfile) -> Result<BackendRef, BoxError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.built_for.lock().unwrap().push(profile.bucket.clone());
        Ok(self.backend.clone())
    }
}

struct FailingFactory;

#[async_trait::async_trait]
impl BackendFactory for FailingFactory {
    async fn build(&self, _profile: &ObjectStoreProfile) -> Result<BackendRef, BoxError> {
        Err("invalid endpoint".into())
    }
}

fn registry() -> Arc<ProfileRegistry> {
    let mut entries = HashMap::new();
    for (name, bucket) in [("media", "media-bucket"), ("backup", "backup-bucket")] {
        entries.insert(format!("{name}.access_key"), "ak".to_string());
        entries.insert(format!("{name}.secret_key"), "sk".to_string());
        entries.insert(format!("{name}.endpoint"), "http://localhost:9000".to_string());
        entries.insert(format!("{name}.region"), "us-east-1".to_string());
        entries.insert(format!("{name}.bucket"), bucket.to_string());
    }
    let (registry, report) = ProfileRegistry::load(entries);
    assert!(report.is_clean());
    Arc::new(registry)
}

fn client() -> (ObjectStoreClient, Arc<MemoryBackend>, Arc<MemoryFactory>) {
    let backend = Arc::new(MemoryBackend::default());
    let factory = Arc::new(MemoryFactory::new(backend.clone()));
    let client = ObjectStoreClient::new(registry(), factory.clone());
    (client, backend, factory)
}

fn page(start: usize, len: usize, next: Option<&str>) -> ListPage {
    ListPage {
        keys: (start..start + len).map(|i| format!("logs/{i:04}")).collect(),
        is_truncated: next.is_some(),
        next_continuation_token: next.map(str::to_string),
    }
}

#[tokio::test]
async fn test_list_follows_continuation_tokens() {
    let (client, backend, factory) = client();
    *backend.scripted_pages.lock().unwrap() = vec![
        page(0, 100, Some("t1")),
        page(100, 100, Some("t2")),
        page(200, 37, None),
    ];

    let keys = client.list("media", "logs/").await.unwrap();

    assert_eq!(keys.len(), 237);
    let expected: Vec<String> = (0..237).map(|i| format!("logs/{i:04}")).collect();
    assert_eq!(keys, expected);

    let calls = backend.list_calls.lock().unwrap();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls
            .iter()
            .map(|c| c.continuation_token.as_deref())
            .collect::<Vec<_>>(),
        vec![None, Some("t1"), Some("t2")]
    );
    assert!(calls.iter().all(|c| c.max_keys == 100 && c.prefix == "logs/"));

    // 每次公开操作只构造一次客户端
    assert_eq!(factory.builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_list_keeps_service_order() {
    let (client, backend, _) = client();
    *backend.scripted_pages.lock().unwrap() = vec![
        ListPage {
            keys: vec!["b".to_string(), "a".to_string()],
            is_truncated: true,
            next_continuation_token: Some("next".to_string()),
        },
        ListPage {
            keys: vec!["c".to_string()],
            is_truncated: false,
            next_continuation_token: None,
        },
    ];

    let keys = client.list("media", "").await.unwrap();
    assert_eq!(keys, vec!["b", "a", "c"]);
}

#[tokio::test]
async fn test_list_stops_when_truncated_without_token() {
    let (client, backend, _) = client();
    *backend.scripted_pages.lock().unwrap() = vec![ListPage {
        keys: vec!["only".to_string()],
        is_truncated: true,
        next_continuation_token: None,
    }];

    let keys = client.list("media", "").await.unwrap();
    assert_eq!(keys, vec!["only"]);
    assert_eq!(backend.list_calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_returns_plain_url_and_stores_grant() {
    let (client, backend, factory) = client();

    let url = client
        .upload_file(
            "media",
            b"hello".to_vec(),
            "avatars/u 1.png",
            Some("image/png"),
            GroupGrantee::AllUsers,
            Permission::Read,
        )
        .await
        .unwrap();

    assert_eq!(url, "http://localhost:9000/media-bucket/avatars/u 1.png");
    assert_eq!(
        factory.built_for.lock().unwrap().as_slice(),
        ["media-bucket".to_string()]
    );

    let objects = backend.objects.lock().unwrap();
    let stored = &objects[&("media-bucket".to_string(), "avatars/u 1.png".to_string())];
    assert_eq!(stored.body, Bytes::from_static(b"hello"));
    assert_eq!(stored.content_type.as_deref(), Some("image/png"));
    assert_eq!(stored.grant, (GroupGrantee::AllUsers, Permission::Read));
}

#[tokio::test]
async fn test_upload_overwrites_and_download_round_trip() {
    let (client, _, _) = client();

    for body in ["v1", "v2"] {
        client
            .upload_file(
                "backup",
                Bytes::from(body),
                "db/dump.sql",
                None,
                GroupGrantee::AuthenticatedUsers,
                Permission::FullControl,
            )
            .await
            .unwrap();
    }

    let data = client.download_file("backup", "db/dump.sql").await.unwrap();
    assert_eq!(data, Bytes::from_static(b"v2"));

    // 不同配置对应不同 bucket
    assert!(client.download_file("media", "db/dump.sql").await.is_err());
}

#[tokio::test]
async fn test_download_missing_object_propagates_service_error() {
    let (client, _, _) = client();

    let err = client.download_file("media", "missing.bin").await.unwrap_err();
    match err {
        StorageError::Service {
            operation,
            bucket,
            key,
            source,
        } => {
            assert_eq!(operation, "get_object");
            assert_eq!(bucket, "media-bucket");
            assert_eq!(key, "missing.bin");
            assert_eq!(source.to_string(), "NoSuchKey: missing.bin");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_presigned_url() {
    let (client, _, _) = client();

    let url = client
        .generate_presigned_url("media", "a/b.txt", 600)
        .await
        .unwrap();
    assert_eq!(url.host_str(), Some("memory.local"));
    assert_eq!(url.path(), "/media-bucket/a/b.txt");
    assert_eq!(url.query(), Some("X-Amz-Expires=600"));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (client, backend, _) = client();
    client
        .upload_file(
            "media",
            Bytes::from_static(b"x"),
            "tmp/x",
            None,
            GroupGrantee::AllUsers,
            Permission::Read,
        )
        .await
        .unwrap();

    client.delete_file("media", "tmp/x").await.unwrap();
    client.delete_file("media", "tmp/x").await.unwrap();

    assert!(backend.objects.lock().unwrap().is_empty());
    assert!(client.list("media", "tmp/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_profile_fails_before_building_client() {
    let (client, _, factory) = client();

    let err = client.list("unknown", "").await.unwrap_err();
    assert!(matches!(err, StorageError::ProfileNotFound(name) if name == "unknown"));

    let err = client.delete_file("", "x").await.unwrap_err();
    assert!(matches!(err, StorageError::ProfileNotFound(_)));

    assert_eq!(factory.builds.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_client_build_failure_is_reported() {
    let client = ObjectStoreClient::new(registry(), Arc::new(FailingFactory));

    let err = client.download_file("media", "x").await.unwrap_err();
    assert!(matches!(
        &err,
        StorageError::ClientBuild { profile, .. } if profile == "media"
    ));
    assert_eq!(
        err.into_source().map(|source| source.to_string()),
        Some("invalid endpoint".to_string())
    );
}

#[tokio::test]
async fn test_listed_keys_feed_validators() {
    // 两个模块互不依赖，这里只确认可以一起使用
    let (client, backend, _) = client();
    *backend.scripted_pages.lock().unwrap() = vec![page(0, 3, None)];

    let keys = client.list("media", "logs/").await.unwrap();
    let suffixes: Vec<_> = keys
        .iter()
        .filter_map(|key| key.strip_prefix("logs/"))
        .map(validation::parse_value)
        .collect();
    assert_eq!(
        suffixes,
        vec![
            validation::ParsedValue::Integer(0),
            validation::ParsedValue::Integer(1),
            validation::ParsedValue::Integer(2),
        ]
    );
}
