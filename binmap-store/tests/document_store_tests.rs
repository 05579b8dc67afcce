//! Orchestration tests: gateway-first persistence, local fallback,
//! cache coherence, and change notification.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::put;
use axum::Router;
use binmap_core::{BinLocation, BinmapError, HdfsConfig, StoreConfig, StoreError};
use binmap_events::{ChangeBroadcaster, ChangeEvent, ChangeKind};
use binmap_hdfs::HdfsClient;
use binmap_store::{DocumentStore, LocalStore};
use tempfile::TempDir;
use tokio::sync::broadcast::error::TryRecvError;

const REMOTE_PATH: &str = "/locations/locations.json";

type Files = Arc<Mutex<HashMap<String, Vec<u8>>>>;

#[derive(Clone)]
struct Stub {
    files: Files,
}

impl Stub {
    fn put(&self, path: &str, bytes: &[u8]) {
        self.files.lock().unwrap().insert(path.to_string(), bytes.to_vec());
    }

    fn stored(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

/// Direct-contract stub gateway: payloads on the first request, no
/// redirects. The contract handling itself is covered by the gateway
/// client's own tests.
async fn spawn_gateway() -> (Stub, SocketAddr) {
    async fn handle_put(
        State(stub): State<Stub>,
        Path(path): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        body: Bytes,
    ) -> StatusCode {
        match params.get("op").map(String::as_str) {
            Some("MKDIRS") => StatusCode::OK,
            Some("CREATE") => {
                stub.put(&path, &body);
                StatusCode::CREATED
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    async fn handle_get(State(stub): State<Stub>, Path(path): Path<String>) -> Response {
        match stub.stored(&path) {
            Some(bytes) => (StatusCode::OK, bytes).into_response(),
            None => (StatusCode::NOT_FOUND, "not found").into_response(),
        }
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let stub = Stub {
        files: Arc::new(Mutex::new(HashMap::new())),
    };
    let router = Router::new()
        .route("/webhdfs/v1/*path", put(handle_put).get(handle_get))
        .with_state(stub.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (stub, addr)
}

async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn make_store(addr: SocketAddr, dir: &TempDir, ttl: Duration) -> DocumentStore<BinLocation> {
    let hdfs_config = HdfsConfig::new(format!("http://{addr}"), "hduser", Duration::from_secs(2));
    let store_config = StoreConfig {
        document_path: REMOTE_PATH.to_string(),
        local_file: dir.path().join("locations.json"),
        cache_ttl: ttl,
    };
    let gateway = HdfsClient::new(&hdfs_config).unwrap();
    DocumentStore::new(gateway, &store_config, ChangeBroadcaster::new(64))
}

fn sample(name: &str, status: u8) -> BinLocation {
    BinLocation::new(name, 24.8607, 67.0011, status)
}

#[tokio::test]
async fn put_then_get_within_ttl_returns_document_exactly() {
    let (stub, addr) = spawn_gateway().await;
    let dir = TempDir::new().unwrap();
    let store = make_store(addr, &dir, Duration::from_secs(30));

    let document = vec![sample("Bin 1", 10), sample("Bin 2", 55)];
    store
        .put_document(document.clone(), ChangeEvent::imported(2))
        .await
        .unwrap();

    assert_eq!(store.get_document().await, document);
    // The write also reached the remote path.
    assert!(stub.stored("locations/locations.json").is_some());
}

#[tokio::test]
async fn get_serves_remote_document() {
    let (stub, addr) = spawn_gateway().await;
    let dir = TempDir::new().unwrap();
    let store = make_store(addr, &dir, Duration::from_secs(30));

    let document = vec![sample("Remote bin", 70)];
    stub.put(
        "locations/locations.json",
        &serde_json::to_vec(&document).unwrap(),
    );

    assert_eq!(store.get_document().await, document);
}

#[tokio::test]
async fn get_serves_local_fallback_when_gateway_unreachable() {
    let addr = closed_port().await;
    let dir = TempDir::new().unwrap();

    let document = vec![sample("Fallback bin", 40)];
    LocalStore::new(dir.path().join("locations.json"))
        .write(&document)
        .await
        .unwrap();

    let store = make_store(addr, &dir, Duration::from_secs(30));
    assert_eq!(store.get_document().await, document);
}

#[tokio::test]
async fn get_serves_local_fallback_when_remote_absent() {
    let (_stub, addr) = spawn_gateway().await;
    let dir = TempDir::new().unwrap();

    let document = vec![sample("Local only", 5)];
    LocalStore::new(dir.path().join("locations.json"))
        .write(&document)
        .await
        .unwrap();

    let store = make_store(addr, &dir, Duration::from_secs(30));
    assert_eq!(store.get_document().await, document);
}

#[tokio::test]
async fn get_falls_back_when_remote_document_is_malformed() {
    let (stub, addr) = spawn_gateway().await;
    let dir = TempDir::new().unwrap();

    stub.put("locations/locations.json", b"{ not json ]");
    let document = vec![sample("Good copy", 20)];
    LocalStore::new(dir.path().join("locations.json"))
        .write(&document)
        .await
        .unwrap();

    let store = make_store(addr, &dir, Duration::from_secs(30));
    assert_eq!(store.get_document().await, document);
}

#[tokio::test]
async fn never_written_document_reads_empty() {
    let (_stub, addr) = spawn_gateway().await;
    let dir = TempDir::new().unwrap();
    let store = make_store(addr, &dir, Duration::from_secs(30));

    assert!(store.get_document().await.is_empty());
}

#[tokio::test]
async fn put_falls_back_to_local_and_emits_one_event() {
    let addr = closed_port().await;
    let dir = TempDir::new().unwrap();
    let store = make_store(addr, &dir, Duration::from_secs(30));
    let mut rx = store.subscribe();

    let record = sample("Bin 9", 80);
    store
        .put_document(vec![record.clone()], ChangeEvent::created(record.clone()))
        .await
        .unwrap();

    // Persisted locally even though the gateway never answered.
    let on_disk: Vec<BinLocation> = LocalStore::new(dir.path().join("locations.json"))
        .read()
        .await
        .unwrap();
    assert_eq!(on_disk, vec![record.clone()]);

    // Exactly one notification.
    let event = rx.try_recv().unwrap();
    assert_eq!(event.kind, ChangeKind::Created);
    assert_eq!(event.record, Some(record));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    // And a TTL-window read observes the just-written value.
    assert_eq!(store.get_document().await, on_disk);
}

#[tokio::test]
async fn put_fails_when_both_backends_fail_and_emits_nothing() {
    let addr = closed_port().await;
    let dir = TempDir::new().unwrap();

    // A plain file where the fallback expects its parent directory.
    let blocked = dir.path().join("blocked");
    tokio::fs::write(&blocked, b"in the way").await.unwrap();

    let hdfs_config = HdfsConfig::new(format!("http://{addr}"), "hduser", Duration::from_secs(2));
    let store_config = StoreConfig {
        document_path: REMOTE_PATH.to_string(),
        local_file: blocked.join("locations.json"),
        cache_ttl: Duration::from_secs(30),
    };
    let gateway = HdfsClient::new(&hdfs_config).unwrap();
    let store: DocumentStore<BinLocation> =
        DocumentStore::new(gateway, &store_config, ChangeBroadcaster::new(64));
    let mut rx = store.subscribe();

    let err = store
        .put_document(vec![sample("Doomed", 1)], ChangeEvent::imported(1))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BinmapError::Store(StoreError::BothBackendsFailed { .. })
    ));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    // The failed mutation is not visible to readers either.
    assert!(store.get_document().await.is_empty());
}

#[tokio::test]
async fn create_then_update_via_mutate() {
    let (_stub, addr) = spawn_gateway().await;
    let dir = TempDir::new().unwrap();
    let store = make_store(addr, &dir, Duration::from_secs(30));

    let created = store
        .mutate(|document| {
            let record = sample("Bin A", 10);
            document.push(record.clone());
            Some((ChangeEvent::created(record.clone()), record))
        })
        .await
        .unwrap()
        .expect("create always applies");

    let updated = store
        .mutate(|document| {
            let entry = document.iter_mut().find(|r| r.id == created.id)?;
            entry.set_status(90);
            entry.touch();
            let snapshot = entry.clone();
            Some((ChangeEvent::updated(snapshot.clone()), snapshot))
        })
        .await
        .unwrap()
        .expect("record exists");

    assert_eq!(updated.status, 90);

    let document = store.get_document().await;
    assert_eq!(document.len(), 1);
    assert_eq!(document[0].status, 90);
    assert!(document[0].updated_at.is_some());
}

#[tokio::test]
async fn mutate_returning_none_writes_and_emits_nothing() {
    let (stub, addr) = spawn_gateway().await;
    let dir = TempDir::new().unwrap();
    let store = make_store(addr, &dir, Duration::from_secs(30));
    let mut rx = store.subscribe();

    let result: Option<BinLocation> = store
        .mutate(|_document| None)
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(stub.stored("locations/locations.json").is_none());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn concurrent_mutations_both_land() {
    let (stub, addr) = spawn_gateway().await;
    let dir = TempDir::new().unwrap();
    let store = Arc::new(make_store(addr, &dir, Duration::from_secs(30)));

    let a = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .mutate(|document| {
                    let record = sample("Concurrent A", 11);
                    document.push(record.clone());
                    Some((ChangeEvent::created(record), ()))
                })
                .await
        })
    };
    let b = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .mutate(|document| {
                    let record = sample("Concurrent B", 22);
                    document.push(record.clone());
                    Some((ChangeEvent::created(record), ()))
                })
                .await
        })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    // Neither update was lost, and the stored array is well-formed.
    let document = store.get_document().await;
    assert_eq!(document.len(), 2);

    let remote = stub.stored("locations/locations.json").unwrap();
    let parsed: Vec<BinLocation> = serde_json::from_slice(&remote).unwrap();
    assert_eq!(parsed.len(), 2);
}

#[tokio::test]
async fn expired_cache_refetches_from_gateway() {
    let (stub, addr) = spawn_gateway().await;
    let dir = TempDir::new().unwrap();
    let store = make_store(addr, &dir, Duration::ZERO);

    store
        .put_document(vec![sample("First", 1)], ChangeEvent::imported(1))
        .await
        .unwrap();

    // Someone else rewrites the remote document behind our back.
    let replacement = vec![sample("Second", 2)];
    stub.put(
        "locations/locations.json",
        &serde_json::to_vec(&replacement).unwrap(),
    );
    tokio::time::sleep(Duration::from_millis(5)).await;

    assert_eq!(store.get_document().await, replacement);
}
