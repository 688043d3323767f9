//! API tests with mocked remote services.
//!
//! Runs the full router in-process with mock implementations of the search
//! backend and the cloud client.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use magnetcloud_core::testing::MockSearcher;
use magnetcloud_core::{CloudError, CloudFile, CloudTask, FileKind, SearchError, TaskPhase};

use common::{TestConfig, TestFixture};

fn task(id: &str, phase: TaskPhase) -> CloudTask {
    CloudTask {
        id: id.to_string(),
        name: id.to_string(),
        phase,
        progress: 50,
        file_size: Some(1024),
    }
}

fn folder(id: &str, name: &str) -> CloudFile {
    CloudFile {
        id: id.to_string(),
        kind: FileKind::Folder,
        name: name.to_string(),
        size: 0,
        created_at: None,
    }
}

// =============================================================================
// Basic endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_endpoint_reports_limits() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/config").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["limits"]["download_cooldown_secs"], 30);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;
    // Generate at least one measured request first.
    fixture.get("/api/health").await;

    let (status, body) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("magnetcloud_http_requests_total"));
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_orders_by_seeders_descending() {
    let fixture = TestFixture::new().await;
    fixture
        .searcher
        .set_results(vec![
            MockSearcher::result("a", "Five", 5),
            MockSearcher::result("b", "Fifty", 50),
            MockSearcher::result("c", "Ten", 10),
        ])
        .await;

    let response = fixture.get("/api/search?q=bunny").await;
    assert_eq!(response.status, StatusCode::OK);

    let results = response.body["Results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["seeders"], 50);
    assert_eq!(results[1]["seeders"], 10);
    assert_eq!(results[2]["seeders"], 5);
}

#[tokio::test]
async fn test_search_passes_category_through() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/search?q=bunny&category=2000").await;
    assert_eq!(response.status, StatusCode::OK);

    let queries = fixture.searcher.recorded_queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].query, "bunny");
    assert_eq!(queries[0].category.as_deref(), Some("2000"));
}

#[tokio::test]
async fn test_search_without_query_is_rejected() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/search").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No query provided");

    let response = fixture.get("/api/search?q=%20%20").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // The backend was never called.
    assert!(fixture.searcher.recorded_queries().await.is_empty());
}

#[tokio::test]
async fn test_search_error_message_surfaces_verbatim() {
    let fixture = TestFixture::new().await;
    fixture
        .searcher
        .set_next_error(SearchError::Request {
            status: 500,
            message: "indexer timeout".to_string(),
        })
        .await;

    let response = fixture.get("/api/search?q=bunny").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "indexer timeout");
}

#[tokio::test]
async fn test_search_without_backend_is_unavailable() {
    let fixture = TestFixture::with_config(TestConfig {
        with_searcher: false,
        ..Default::default()
    })
    .await;

    let response = fixture.get("/api/search?q=bunny").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

// =============================================================================
// Ranking and pagination over the session
// =============================================================================

#[tokio::test]
async fn test_results_sort_toggle_contract() {
    let fixture = TestFixture::new().await;
    fixture
        .searcher
        .set_results(vec![
            MockSearcher::result("a", "A", 5),
            MockSearcher::result("b", "B", 50),
            MockSearcher::result("c", "C", 10),
        ])
        .await;
    fixture.get("/api/search?q=bunny").await;

    // Default after fetch: seeders descending.
    let response = fixture.get("/api/results").await;
    assert_eq!(response.body["sort"]["field"], "seeders");
    assert_eq!(response.body["sort"]["direction"], "descending");

    // Sorting the active field flips the direction.
    let response = fixture.get("/api/results?sort=seeders").await;
    assert_eq!(response.body["sort"]["direction"], "ascending");
    assert_eq!(response.body["results"][0]["seeders"], 5);

    // Sorting a new field resets to ascending.
    let response = fixture.get("/api/results?sort=size").await;
    assert_eq!(response.body["sort"]["field"], "size");
    assert_eq!(response.body["sort"]["direction"], "ascending");
}

#[tokio::test]
async fn test_results_pagination_slices_and_clamps() {
    let fixture = TestFixture::new().await;
    let results: Vec<_> = (0..120)
        .map(|i| MockSearcher::result(&format!("id{}", i), "T", i))
        .collect();
    fixture.searcher.set_results(results).await;
    fixture.get("/api/search?q=bunny").await;

    let response = fixture.get("/api/results?page=2").await;
    assert_eq!(response.body["page"], 2);
    assert_eq!(response.body["total_pages"], 3);
    assert_eq!(response.body["total"], 120);
    assert_eq!(response.body["results"].as_array().unwrap().len(), 50);

    let response = fixture.get("/api/results?page=99").await;
    assert_eq!(response.body["page"], 3);
    assert_eq!(response.body["results"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_new_search_resets_sort_and_page() {
    let fixture = TestFixture::new().await;
    let results: Vec<_> = (0..60)
        .map(|i| MockSearcher::result(&format!("id{}", i), "T", i))
        .collect();
    fixture.searcher.set_results(results).await;

    fixture.get("/api/search?q=first").await;
    fixture.get("/api/results?sort=size").await;
    fixture.get("/api/results?page=2").await;

    fixture.get("/api/search?q=second").await;
    let response = fixture.get("/api/results").await;
    assert_eq!(response.body["query"], "second");
    assert_eq!(response.body["page"], 1);
    assert_eq!(response.body["sort"]["field"], "seeders");
    assert_eq!(response.body["sort"]["direction"], "descending");
}

// =============================================================================
// Cloud account
// =============================================================================

#[tokio::test]
async fn test_get_user() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/user").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "mock-user");
    assert_eq!(response.body["user_id"], "mock-id");
}

#[tokio::test]
async fn test_get_user_session_expired() {
    let fixture = TestFixture::new().await;
    fixture.cloud.set_profile(None).await;

    let response = fixture.get("/api/user").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Session expired");
}

#[tokio::test]
async fn test_cloud_endpoints_unavailable_without_backend() {
    let fixture = TestFixture::with_config(TestConfig {
        with_cloud: false,
        ..Default::default()
    })
    .await;

    for path in ["/api/user", "/api/tasks", "/api/files", "/api/transfers"] {
        let response = fixture.get(path).await;
        assert_eq!(
            response.status,
            StatusCode::SERVICE_UNAVAILABLE,
            "expected 503 for {}",
            path
        );
    }
}

#[tokio::test]
async fn test_add_download() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post(
            "/api/download",
            json!({"url": "magnet:?xt=urn:btih:abc123", "name": "Bunny"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert!(response.body["task"]["id"].is_string());

    let recorded = fixture.cloud.recorded_downloads().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "magnet:?xt=urn:btih:abc123");
    assert_eq!(recorded[0].1.as_deref(), Some("Bunny"));
}

#[tokio::test]
async fn test_add_download_requires_url() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/download", json!({"url": ""})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No URL provided");
}

#[tokio::test]
async fn test_add_download_rate_limited_per_ip() {
    let fixture = TestFixture::new().await;

    let first = fixture
        .post("/api/download", json!({"url": "magnet:?xt=urn:btih:a"}))
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = fixture
        .post("/api/download", json!({"url": "magnet:?xt=urn:btih:b"}))
        .await;
    assert_eq!(second.status, StatusCode::TOO_MANY_REQUESTS);
    let message = second.body["error"].as_str().unwrap();
    assert!(message.starts_with("Rate limit exceeded"), "{}", message);

    // The rejected submission never reached the cloud.
    assert_eq!(fixture.cloud.recorded_downloads().await.len(), 1);
}

#[tokio::test]
async fn test_get_tasks_passthrough() {
    let fixture = TestFixture::new().await;
    fixture
        .cloud
        .set_tasks(vec![
            task("t1", TaskPhase::Running),
            task("t2", TaskPhase::Complete),
        ])
        .await;

    let response = fixture.get("/api/tasks").await;
    assert_eq!(response.status, StatusCode::OK);

    let tasks = response.body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["phase"], "running");
    assert_eq!(tasks[1]["phase"], "complete");
}

#[tokio::test]
async fn test_cloud_error_message_surfaces_verbatim() {
    let fixture = TestFixture::new().await;
    fixture
        .cloud
        .set_next_error(CloudError::Api {
            status: 429,
            message: "task limit reached".to_string(),
        })
        .await;

    let response = fixture.get("/api/tasks").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "task limit reached");
}

#[tokio::test]
async fn test_get_files_passthrough() {
    let fixture = TestFixture::new().await;
    fixture
        .cloud
        .set_files(Some("movies"), vec![folder("hd", "HD")])
        .await;

    let response = fixture.get("/api/files?parent_id=movies").await;
    assert_eq!(response.status, StatusCode::OK);
    let files = response.body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["kind"], "folder");

    let listings = fixture.cloud.recorded_file_listings().await;
    assert_eq!(listings.last().unwrap().as_deref(), Some("movies"));
}

// =============================================================================
// Transfer monitor lifecycle
// =============================================================================

#[tokio::test]
async fn test_transfers_watch_lifecycle() {
    let fixture = TestFixture::new().await;
    fixture
        .cloud
        .set_tasks(vec![task("t1", TaskPhase::Running)])
        .await;

    let response = fixture.post_empty("/api/transfers/watch").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["watching"], true);

    // Give the poll loop a few ticks.
    tokio::time::sleep(std::time::Duration::from_millis(60)).await;

    let response = fixture.get("/api/transfers").await;
    assert_eq!(response.body["watching"], true);
    assert_eq!(response.body["tasks"].as_array().unwrap().len(), 1);

    let response = fixture.delete("/api/transfers/watch").await;
    assert_eq!(response.body["watching"], false);

    // No further polls after close.
    tokio::time::sleep(std::time::Duration::from_millis(40)).await;
    let calls_after_stop = fixture.cloud.get_tasks_calls();
    tokio::time::sleep(std::time::Duration::from_millis(60)).await;
    assert_eq!(fixture.cloud.get_tasks_calls(), calls_after_stop);
}

#[tokio::test]
async fn test_transfers_snapshot_survives_poll_failure() {
    let fixture = TestFixture::new().await;
    fixture
        .cloud
        .set_tasks(vec![task("t1", TaskPhase::Running)])
        .await;

    fixture.post_empty("/api/transfers/watch").await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    fixture
        .cloud
        .set_persistent_error(|| CloudError::Timeout)
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(60)).await;

    let response = fixture.get("/api/transfers").await;
    assert_eq!(response.body["tasks"].as_array().unwrap().len(), 1);

    fixture.delete("/api/transfers/watch").await;
}

// =============================================================================
// File browser
// =============================================================================

#[tokio::test]
async fn test_browse_navigation_flow() {
    let fixture = TestFixture::new().await;
    fixture
        .cloud
        .set_files(None, vec![folder("movies", "Movies")])
        .await;
    fixture
        .cloud
        .set_files(Some("movies"), vec![folder("hd", "HD")])
        .await;
    fixture.cloud.set_files(Some("hd"), vec![]).await;

    let response = fixture.get("/api/browse").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["path"].as_array().unwrap().is_empty());
    assert_eq!(response.body["files"][0]["id"], "movies");

    let response = fixture
        .post("/api/browse/enter", json!({"id": "movies", "name": "Movies"}))
        .await;
    assert_eq!(response.body["path"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["path"][0]["name"], "Movies");
    assert_eq!(response.body["files"][0]["id"], "hd");

    let response = fixture
        .post("/api/browse/enter", json!({"id": "hd", "name": "HD"}))
        .await;
    assert_eq!(response.body["path"].as_array().unwrap().len(), 2);

    // Up from depth 2 lands in "movies".
    let response = fixture.post_empty("/api/browse/up").await;
    assert_eq!(response.body["path"].as_array().unwrap().len(), 1);

    // Up from depth 1 returns to root: empty path, never a dangling crumb.
    let response = fixture.post_empty("/api/browse/up").await;
    assert!(response.body["path"].as_array().unwrap().is_empty());
    assert_eq!(response.body["files"][0]["id"], "movies");
}

#[tokio::test]
async fn test_browse_root_clears_path() {
    let fixture = TestFixture::new().await;
    fixture
        .cloud
        .set_files(None, vec![folder("movies", "Movies")])
        .await;
    fixture
        .cloud
        .set_files(Some("movies"), vec![folder("hd", "HD")])
        .await;
    fixture.cloud.set_files(Some("hd"), vec![]).await;

    fixture
        .post("/api/browse/enter", json!({"id": "movies", "name": "Movies"}))
        .await;
    fixture
        .post("/api/browse/enter", json!({"id": "hd", "name": "HD"}))
        .await;

    let response = fixture.post_empty("/api/browse/root").await;
    assert!(response.body["path"].as_array().unwrap().is_empty());
    assert_eq!(response.body["files"][0]["id"], "movies");
}

// =============================================================================
// Download proxy
// =============================================================================

#[tokio::test]
async fn test_proxy_download_unknown_file_is_not_found() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/api/proxy/download/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "File URL not found");
}
