//! Integration tests for the HTTP fetcher and the end-to-end ingestion run.

use async_trait::async_trait;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use datasplit_core::{
    DataIngestion, DatasplitError, HttpFetcher, IngestionConfig, RawDataFetcher, Split,
};
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const CSV: &str = "id,city,price\n1,Lisbon,120\n2,Porto,95\n3,Faro,80\n4,Braga,70\n5,Evora,65\n";

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/bucket/bookings.csv", get(|| async { CSV }))
        .route("/bucket/empty.csv", get(|| async { "id,city,price\n" }))
        .route(
            "/bucket/missing.csv",
            get(|| async { (StatusCode::NOT_FOUND, "no such key") }),
        )
        .route(
            "/bucket/binary.csv",
            get(|| async { vec![0xffu8, 0xfe, 0x00, 0x01] }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Ignores the configured HTTPS URL and fetches from the local test server.
struct LocalFetcher {
    url: String,
    inner: HttpFetcher,
}

#[async_trait]
impl RawDataFetcher for LocalFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, DatasplitError> {
        self.inner.fetch(&self.url).await
    }
}

fn config_for(artifact_dir: &Path) -> IngestionConfig {
    IngestionConfig {
        bucket_name: "bucket".into(),
        object_name: "bookings.csv".into(),
        storage_path: "storage.invalid".into(),
        train_ratio: 0.6,
        val_ratio: 0.2,
        artifact_dir: artifact_dir.to_path_buf(),
        seed: Some(2024),
        timeout_secs: None,
    }
}

fn ingestion_against(url: String, artifact_dir: &Path) -> DataIngestion {
    let fetcher = LocalFetcher {
        url,
        inner: HttpFetcher::new(),
    };
    DataIngestion::with_fetcher(config_for(artifact_dir), Arc::new(fetcher))
}

#[tokio::test]
async fn test_http_fetcher_returns_body() {
    let addr = spawn_server().await;
    let body = HttpFetcher::new()
        .fetch(&format!("http://{addr}/bucket/bookings.csv"))
        .await
        .unwrap();
    assert_eq!(body, CSV);
}

#[tokio::test]
async fn test_http_fetcher_not_found_is_transport_error() {
    let addr = spawn_server().await;
    let err = HttpFetcher::new()
        .fetch(&format!("http://{addr}/bucket/missing.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatasplitError::Transport { .. }));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_http_fetcher_rejects_invalid_utf8() {
    let addr = spawn_server().await;
    let err = HttpFetcher::new()
        .fetch(&format!("http://{addr}/bucket/binary.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, DatasplitError::Decode { .. }));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_end_to_end_run() {
    let addr = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let ingestion = ingestion_against(format!("http://{addr}/bucket/bookings.csv"), dir.path());

    let report = ingestion.run().await.unwrap();
    assert_eq!(report.total_rows, 5);
    assert_eq!(report.url, "https://bucket.storage.invalid/bookings.csv");

    // floor(5 * 0.6) = 3, floor(5 * 0.2) = 1, remainder 1.
    let counts: Vec<usize> = report.splits.iter().map(|s| s.rows).collect();
    assert_eq!(counts, vec![3, 1, 1]);

    let mut seen = Vec::new();
    for split in Split::ALL {
        let path = dir.path().join("raw").join(split.file_name());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,city,price\n"));
        assert!(content.ends_with('\n'));
        seen.extend(content.lines().skip(1).map(str::to_string));
    }
    seen.sort();
    let mut expected: Vec<String> = CSV.lines().skip(1).map(str::to_string).collect();
    expected.sort();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_seeded_runs_are_reproducible() {
    let addr = spawn_server().await;
    let url = format!("http://{addr}/bucket/bookings.csv");
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    ingestion_against(url.clone(), first.path()).run().await.unwrap();
    ingestion_against(url, second.path()).run().await.unwrap();

    for split in Split::ALL {
        let a = std::fs::read_to_string(first.path().join("raw").join(split.file_name())).unwrap();
        let b = std::fs::read_to_string(second.path().join("raw").join(split.file_name())).unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn test_header_only_source_writes_header_only_files() {
    let addr = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let report = ingestion_against(format!("http://{addr}/bucket/empty.csv"), dir.path())
        .run()
        .await
        .unwrap();

    assert_eq!(report.total_rows, 0);
    for split in Split::ALL {
        let content =
            std::fs::read_to_string(dir.path().join("raw").join(split.file_name())).unwrap();
        assert_eq!(content, "id,city,price\n");
    }
}

#[tokio::test]
async fn test_fetch_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let artifact_dir = dir.path().join("artifacts");
    // Nothing listens on port 1.
    let err = ingestion_against("http://127.0.0.1:1/bucket/bookings.csv".into(), &artifact_dir)
        .run()
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(!artifact_dir.exists());
}

#[tokio::test]
async fn test_fetch_failure_leaves_previous_outputs_untouched() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("raw");
    std::fs::create_dir_all(&raw).unwrap();
    std::fs::write(raw.join("train.csv"), "previous run\n").unwrap();

    let addr = spawn_server().await;
    let err = ingestion_against(format!("http://{addr}/bucket/missing.csv"), dir.path())
        .run()
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert_eq!(
        std::fs::read_to_string(raw.join("train.csv")).unwrap(),
        "previous run\n"
    );
    assert!(!raw.join("validation.csv").exists());
}
