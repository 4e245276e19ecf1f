mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = common::spawn_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let app = common::spawn_app();

    let json = app
        .server
        .get("/health")
        .await
        .json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"].get("click_queue").is_some());
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let app = common::spawn_app_with(common::TestOptions {
        click_worker: false,
        ..Default::default()
    });

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "error");
}

#[tokio::test]
async fn test_health_is_public_with_api_key() {
    let app = common::spawn_app_with(common::TestOptions {
        api_key: Some(common::TEST_API_KEY.to_string()),
        ..Default::default()
    });

    app.server.get("/health").await.assert_status_ok();
}
