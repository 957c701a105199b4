use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use database::Database;
use futures::future::join_all;
use http_body_util::BodyExt;
use jokes_core::{AppConfig, CoreError, Dataset, JokeRecord};
use serde_json::{json, Value};
use tower::ServiceExt;
use web_server::{router, AppContext, TOOL_PATH};

const PAGE_SIZE: usize = 10;

fn sample_dataset(n: i64) -> Dataset {
    Dataset::new(
        (1..=n)
            .map(|id| {
                JokeRecord::new(id)
                    .with_field("realThought", format!("thought {id}"))
                    .with_field("hrVersion", format!("hr version {id}"))
            })
            .collect(),
    )
}

fn temp_path(prefix: &str) -> PathBuf {
    env::temp_dir().join(format!("{prefix}_{}", uuid::Uuid::new_v4()))
}

async fn setup_context(jokes: i64) -> Arc<AppContext> {
    setup_context_with_page_size(jokes, PAGE_SIZE).await
}

async fn setup_context_with_page_size(jokes: i64, page_size: usize) -> Arc<AppContext> {
    let static_dir = temp_path("test_hr_jokes_static");
    std::fs::create_dir_all(&static_dir).expect("Failed to create static dir");
    std::fs::write(static_dir.join("index.html"), "<html>jokes</html>")
        .expect("Failed to write index page");

    let db_path = temp_path("test_hr_jokes").with_extension("db");
    let config = AppConfig {
        database_url: format!("sqlite://{}", db_path.display()),
        static_dir,
        page_size,
        max_connections: 8,
        ..AppConfig::default()
    };

    let mut database = Database::new(config.database_url.clone())
        .with_max_connections(config.max_connections);
    database
        .connect()
        .await
        .expect("Failed to connect to test database");
    database
        .run_migrations()
        .await
        .expect("Failed to run migrations");

    AppContext::new(config, sample_dataset(jokes), database)
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Method::GET, uri).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn like(app: &Router, post_id: i64) -> i64 {
    let (status, body) = send(app, Method::POST, &format!("/like/{post_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    value["like_count"].as_i64().unwrap()
}

fn ids(page: &Value) -> Vec<i64> {
    page.as_array()
        .unwrap()
        .iter()
        .map(|joke| joke["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_first_page_has_zero_counts() {
    let app = router(setup_context(25).await);

    let (status, page) = get_json(&app, "/get_jokes_page/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&page), (1..=10).collect::<Vec<_>>());
    for joke in page.as_array().unwrap() {
        assert_eq!(joke["like_count"], json!(0));
    }
    assert_eq!(page[0]["realThought"], json!("thought 1"));
    assert_eq!(page[0]["hrVersion"], json!("hr version 1"));
}

#[tokio::test]
async fn test_page_windows() {
    let app = router(setup_context(25).await);

    let (_, second) = get_json(&app, "/get_jokes_page/2").await;
    assert_eq!(ids(&second), (11..=20).collect::<Vec<_>>());

    let (_, last) = get_json(&app, "/get_jokes_page/3").await;
    assert_eq!(ids(&last), (21..=25).collect::<Vec<_>>());

    let (status, past_end) = get_json(&app, "/get_jokes_page/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(past_end, json!([]));
}

#[tokio::test]
async fn test_zero_and_negative_pages_are_empty() {
    let app = router(setup_context(25).await);

    for uri in ["/get_jokes_page/0", "/get_jokes_page/-1", "/get_jokes_page/-3"] {
        let (status, page) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(page, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_non_integer_path_is_client_error() {
    let app = router(setup_context(5).await);

    let (status, _) = send(&app, Method::GET, "/get_jokes_page/two").await;
    assert!(status.is_client_error());

    let (status, _) = send(&app, Method::POST, "/like/abc").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_like_increments_and_shows_on_page() {
    let app = router(setup_context(25).await);

    assert_eq!(like(&app, 3).await, 1);
    assert_eq!(like(&app, 3).await, 2);
    assert_eq!(like(&app, 12).await, 1);

    let (_, first) = get_json(&app, "/get_jokes_page/1").await;
    assert_eq!(first[2]["id"], json!(3));
    assert_eq!(first[2]["like_count"], json!(2));
    assert_eq!(first[3]["like_count"], json!(0));

    let (_, second) = get_json(&app, "/get_jokes_page/2").await;
    assert_eq!(second[1]["id"], json!(12));
    assert_eq!(second[1]["like_count"], json!(1));
}

#[tokio::test]
async fn test_n_sequential_likes() {
    let app = router(setup_context(5).await);

    for expected in 1..=7 {
        assert_eq!(like(&app, 1).await, expected);
    }
}

#[tokio::test]
async fn test_like_requires_post() {
    let app = router(setup_context(5).await);

    let (status, _) = send(&app, Method::GET, "/like/1").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_post_can_be_liked() {
    let ctx = setup_context(5).await;
    let app = router(ctx.clone());

    assert_eq!(like(&app, 4_242).await, 1);
    assert_eq!(ctx.database.like_count(4_242).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_likes_on_same_post() {
    let ctx = setup_context(5).await;
    let app = router(ctx.clone());

    let likes = (0..2).map(|_| {
        let app = app.clone();
        tokio::spawn(async move { like(&app, 2).await })
    });
    let mut returned: Vec<i64> = join_all(likes)
        .await
        .into_iter()
        .map(|result| result.unwrap())
        .collect();
    returned.sort();

    assert_eq!(returned, vec![1, 2]);
    assert_eq!(ctx.database.like_count(2).await.unwrap(), 2);
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let app = router(setup_context(25).await);
    like(&app, 5).await;

    let (_, first) = get_json(&app, "/get_jokes_page/1").await;
    let (_, second) = get_json(&app, "/get_jokes_page/1").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_dataset_serves_empty_pages() {
    let app = router(setup_context(0).await);

    let (status, page) = get_json(&app, "/get_jokes_page/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!([]));
}

#[tokio::test]
async fn test_root_redirects_to_tool() {
    let app = router(setup_context(1).await);

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], TOOL_PATH);
}

#[tokio::test]
async fn test_tool_page_with_and_without_trailing_slash() {
    let app = router(setup_context(1).await);

    for uri in [TOOL_PATH.to_string(), format!("{TOOL_PATH}/")] {
        let (status, body) = send(&app, Method::GET, &uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, b"<html>jokes</html>");
    }
}

#[tokio::test]
async fn test_health() {
    let app = router(setup_context(1).await);

    let (status, body) = send(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_storage_failure_is_server_error() {
    let ctx = setup_context(5).await;
    ctx.database.close().await;
    let app = router(ctx);

    let (status, body) = send(&app, Method::POST, "/like/1").await;
    assert!(status.is_server_error());
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["error"]["code"], json!("DATABASE"));
}

#[tokio::test]
async fn test_large_page_size_serves_full_page() {
    let ctx = setup_context_with_page_size(2_500, 2_000).await;
    let app = router(ctx);

    assert_eq!(like(&app, 1).await, 1);
    assert_eq!(like(&app, 1_950).await, 1);

    let (status, page) = get_json(&app, "/get_jokes_page/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&page), (1..=2_000).collect::<Vec<_>>());
    assert_eq!(page[0]["like_count"], json!(1));
    assert_eq!(page[1_949]["like_count"], json!(1));
    assert_eq!(page[1_000]["like_count"], json!(0));

    let (_, rest) = get_json(&app, "/get_jokes_page/2").await;
    assert_eq!(ids(&rest), (2_001..=2_500).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_bootstrap_rejects_invalid_config() {
    let config = AppConfig {
        page_size: 0,
        ..AppConfig::default()
    };

    let result = AppContext::bootstrap(config).await;
    assert!(matches!(result, Err(CoreError::Config(_))));
}

#[tokio::test]
async fn test_bootstrap_with_missing_dataset_serves_empty_feed() {
    let db_path = temp_path("test_hr_jokes_boot").with_extension("db");
    let config = AppConfig {
        database_url: format!("sqlite://{}", db_path.display()),
        dataset_path: temp_path("missing_dataset").with_extension("json"),
        ..AppConfig::default()
    };

    let ctx = AppContext::bootstrap(config)
        .await
        .expect("Failed to bootstrap without a dataset");
    assert!(ctx.dataset.is_empty());

    let app = router(ctx);
    let (status, page) = get_json(&app, "/get_jokes_page/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!([]));
}
