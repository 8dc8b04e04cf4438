#![cfg(feature = "http")]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    routing::post,
};
use pan_course::common::config::{AppConfig, ResolverConfig};
use pan_course::server::{AppState, router, upload::stored_file_name};
use pan_course::store::Database;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "pan-course-test-boundary";

fn setup_app() -> (TempDir, Router) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let config = AppConfig {
        upload_dir: tmp.path().join("uploads"),
        ..AppConfig::default()
    };
    let (db, _) = Database::open_in_memory().unwrap();
    let state = AppState::new(&config, db).unwrap();
    (tmp, router(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_category_routes() {
    let (_tmp, app) = setup_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/categories",
            json!({"id": "cat1", "name": "Programming", "icon": "code-2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Programming");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/categories",
            json!({"id": "cat2", "name": "Programming", "icon": "brain"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "duplicate_name");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/categories",
            json!({"name": "Art", "icon": "sparkles"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_icon");

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/categories/missing")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_course_routes() {
    let (_tmp, app) = setup_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/courses",
            json!({
                "title": "Rust 入门",
                "category": "cat1",
                "imageUrl": "",
                "shareLink": "https://pan.quark.cn/s/abc123",
                "platform": "quark",
                "totalEpisodes": 2
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["imageUrl"], "/uploads/default-course-image.jpg");
    assert_eq!(body["watchedEpisodes"], 0);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/api/courses?category=cat1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    for expected in [1, 2, 2] {
        let (status, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri(format!("/api/courses/{}/progress", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["watchedEpisodes"], expected);
    }

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/courses/missing",
            json!({
                "title": "x",
                "category": "cat1",
                "imageUrl": "/a.jpg",
                "shareLink": "https://pan.quark.cn/s/abc123",
                "platform": "quark"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn test_resolve_route() {
    let (_tmp, app) = setup_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/share/resolve",
            json!({"url": " https://pan.quark.cn/s/abc123 ", "password": "8k2d"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["validUrl"], "https://pan.quark.cn/s/abc123");
    assert_eq!(body["password"], "8k2d");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/share/resolve",
            json!({"url": "https://example.com/s/abc"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "unsupported_provider");
}

#[tokio::test]
async fn test_upload_saves_file() {
    let (tmp, app) = setup_app();

    let (status, body) = send(&app, multipart_request("cover.PNG", b"\x89PNG fake")).await;
    assert_eq!(status, StatusCode::OK);

    let url = body["imageUrl"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));

    let name = url.trim_start_matches("/uploads/");
    let saved = std::fs::read(tmp.path().join("uploads").join(name)).unwrap();
    assert_eq!(saved, b"\x89PNG fake");
}

#[tokio::test]
async fn test_upload_rejects_large_file() {
    let (_tmp, app) = setup_app();
    let data = vec![0u8; 5 * 1024 * 1024 + 1];

    let (status, body) = send(&app, multipart_request("big.jpg", &data)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["kind"], "payload_too_large");
}

#[test]
fn test_stored_file_name() {
    let a = stored_file_name(Some("photo.JPG"));
    let b = stored_file_name(Some("photo.JPG"));
    assert!(a.ends_with(".jpg"));
    assert_ne!(a, b);

    assert!(!stored_file_name(None).contains('.'));
    assert!(!stored_file_name(Some("../../etc/passwd")).contains('/'));
}

#[tokio::test]
async fn test_quark_proxy_forwards_upstream_status() {
    // 假的夸克接口：分享不存在时返回 404 和错误 JSON
    let upstream = Router::new().route(
        "/1/clouddrive/share/sharepage/token",
        post(|| async {
            (
                StatusCode::NOT_FOUND,
                axum::Json(json!({"code": 41006, "message": "分享不存在"})),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let tmp = TempDir::new().unwrap();
    let config = AppConfig {
        upload_dir: tmp.path().join("uploads"),
        resolver: ResolverConfig {
            quark_api_base: format!("http://{}", addr),
            ..ResolverConfig::default()
        },
        ..AppConfig::default()
    };
    let (db, _) = Database::open_in_memory().unwrap();
    let app = router(AppState::new(&config, db).unwrap());

    let (status, body) = send(
        &app,
        json_request("POST", "/api/quark/token", json!({"pwdId": "gone"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 41006);
    assert_eq!(body["message"], "分享不存在");
}
