//! Router-level integration tests for the file API

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use tempfile::TempDir;
use tower::util::ServiceExt;

use cubby::http_server::{self, IDENTITY_HEADER};
use cubby::{Config, ServiceState};

const BOUNDARY: &str = "cubby-test-boundary";

async fn test_router(max_upload_bytes: Option<u64>) -> (Router, TempDir) {
    let temp = TempDir::new().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        storage_root: temp.path().join("storage"),
        max_upload_bytes,
        log_level: tracing::Level::INFO,
    };
    let state = ServiceState::from_config(&config).await.unwrap();
    (http_server::router(state, max_upload_bytes), temp)
}

fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            BOUNDARY, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(identity: &str, filename: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v0/files/upload")
        .header(IDENTITY_HEADER, identity)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(filename, content)))
        .unwrap()
}

fn get_request(identity: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(IDENTITY_HEADER, identity)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn response_bytes(response: axum::response::Response) -> bytes::Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_every_file_route_requires_identity() {
    let (router, _temp) = test_router(None).await;

    let requests = vec![
        Request::builder()
            .method("GET")
            .uri("/api/v0/files")
            .body(Body::empty())
            .unwrap(),
        Request::builder()
            .method("GET")
            .uri("/api/v0/files/download/x.txt")
            .body(Body::empty())
            .unwrap(),
        Request::builder()
            .method("DELETE")
            .uri("/api/v0/files/x.txt")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in requests {
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_upload_list_download_delete_flow() {
    let (router, _temp) = test_router(None).await;
    let pdf = [0x25, 0x50, 0x44, 0x46];

    // upload as a@b.com
    let response = router
        .clone()
        .oneshot(upload_request("a@b.com", "report.pdf", &pdf))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let uploaded = response_json(response).await;
    let stored_name = uploaded["stored_name"].as_str().unwrap().to_string();
    assert!(stored_name.ends_with("report.pdf"));
    assert_eq!(uploaded["size"], 4);

    // list shows exactly that entry
    let response = router
        .clone()
        .oneshot(get_request("a@b.com", "/api/v0/files"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = response_json(response).await;
    let files = listed["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0], stored_name.as_str());

    // download returns the original bytes as an attachment
    let response = router
        .clone()
        .oneshot(get_request(
            "a@b.com",
            &format!("/api/v0/files/download/{}", stored_name),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/pdf"
    );
    assert!(response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .starts_with("attachment"));
    assert_eq!(response_bytes(response).await.as_ref(), &pdf);

    // preview serves the same bytes inline
    let response = router
        .clone()
        .oneshot(get_request(
            "a@b.com",
            &format!("/api/v0/files/preview/{}", stored_name),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .starts_with("inline"));
    assert_eq!(response_bytes(response).await.as_ref(), &pdf);

    // a second tenant sees nothing
    let response = router
        .clone()
        .oneshot(get_request("c@d.com", "/api/v0/files"))
        .await
        .unwrap();
    let listed = response_json(response).await;
    assert_eq!(listed["files"].as_array().unwrap().len(), 0);

    // delete, then the file is gone
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v0/files/{}", stored_name))
                .header(IDENTITY_HEADER, "a@b.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(get_request("a@b.com", "/api/v0/files"))
        .await
        .unwrap();
    let listed = response_json(response).await;
    assert_eq!(listed["files"].as_array().unwrap().len(), 0);

    // deleting again is a plain 404
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v0/files/{}", stored_name))
                .header(IDENTITY_HEADER, "a@b.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traversal_answers_exactly_like_missing_file() {
    let (router, _temp) = test_router(None).await;

    // plant a file in another tenant's namespace
    let response = router
        .clone()
        .oneshot(upload_request("c@d.com", "secret.txt", b"secret"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let missing = router
        .clone()
        .oneshot(get_request("a@b.com", "/api/v0/files/download/missing.txt"))
        .await
        .unwrap();
    let traversal = router
        .clone()
        .oneshot(get_request(
            "a@b.com",
            "/api/v0/files/download/..%2F..%2Fetc%2Fpasswd",
        ))
        .await
        .unwrap();

    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(traversal.status(), StatusCode::NOT_FOUND);

    // identical bodies: the response never reveals that traversal was caught
    let missing_body = response_bytes(missing).await;
    let traversal_body = response_bytes(traversal).await;
    assert_eq!(missing_body, traversal_body);
}

#[tokio::test]
async fn test_upload_over_cap_is_rejected() {
    let (router, _temp) = test_router(Some(4)).await;

    let response = router
        .clone()
        .oneshot(upload_request("a@b.com", "big.bin", b"12345"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    // nothing was committed
    let response = router
        .clone()
        .oneshot(get_request("a@b.com", "/api/v0/files"))
        .await
        .unwrap();
    let listed = response_json(response).await;
    assert_eq!(listed["files"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_upload_without_file_field_is_bad_request() {
    let (router, _temp) = test_router(None).await;

    let body = format!("--{}--\r\n", BOUNDARY);
    let request = Request::builder()
        .method("POST")
        .uri("/api/v0/files/upload")
        .header(IDENTITY_HEADER, "a@b.com")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_healthz_reports_ok() {
    let (router, _temp) = test_router(None).await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/_status/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_falls_back_to_not_found() {
    let (router, _temp) = test_router(None).await;

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/nope")
                .header("accept", "application/json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["msg"], "not found");
}
