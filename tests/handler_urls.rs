mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_list_urls_empty() {
    let app = common::spawn_app();

    let response = app.server.get("/api/urls").await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["urls"].as_array().unwrap().len(), 0);
    assert_eq!(body["total"], 0);
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);
}

#[tokio::test]
async fn test_list_urls_newest_first() {
    let app = common::spawn_app();
    for code in ["first1", "second2", "third3"] {
        app.create_link("https://example.com", Some(code)).await;
        // Distinct creation timestamps.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let response = app.server.get("/api/urls").await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    let codes: Vec<&str> = body["urls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["shortCode"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["third3", "second2", "first1"]);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_list_urls_pagination() {
    let app = common::spawn_app();
    for i in 0..5 {
        app.create_link(&format!("https://example.com/{i}"), None)
            .await;
    }

    let response = app
        .server
        .get("/api/urls")
        .add_query_param("limit", 2)
        .add_query_param("offset", 4)
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["urls"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 5);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["offset"], 4);
}

#[tokio::test]
async fn test_list_urls_clamps_parameters() {
    let app = common::spawn_app();

    let body = app
        .server
        .get("/api/urls?limit=1000&offset=-5")
        .await
        .json::<serde_json::Value>();
    assert_eq!(body["limit"], 100);
    assert_eq!(body["offset"], 0);

    let body = app
        .server
        .get("/api/urls?limit=0")
        .await
        .json::<serde_json::Value>();
    assert_eq!(body["limit"], 20);

    let body = app
        .server
        .get("/api/urls?limit=-3")
        .await
        .json::<serde_json::Value>();
    assert_eq!(body["limit"], 20);
}

#[tokio::test]
async fn test_list_urls_non_numeric_limit() {
    let app = common::spawn_app();

    let response = app.server.get("/api/urls?limit=many").await;

    response.assert_status_bad_request();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn test_get_link() {
    let app = common::spawn_app();
    let created = app
        .create_link("https://example.com/details", Some("details"))
        .await;

    let response = app.server.get("/api/details").await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body, created);
}

#[tokio::test]
async fn test_get_link_not_found() {
    let app = common::spawn_app();

    app.server.get("/api/missing").await.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link() {
    let app = common::spawn_app();
    app.create_link("https://example.com", Some("todelete"))
        .await;

    app.server
        .delete("/api/todelete")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server.get("/api/todelete").await.assert_status_not_found();
    app.server.get("/todelete").await.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_twice() {
    let app = common::spawn_app();
    app.create_link("https://example.com", Some("once"))
        .await;

    app.server
        .delete("/api/once")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server.delete("/api/once").await.assert_status_not_found();
}

#[tokio::test]
async fn test_deleted_code_can_be_reused() {
    let app = common::spawn_app();
    app.create_link("https://example.com/old", Some("reuse"))
        .await;
    app.server
        .delete("/api/reuse")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let body = app
        .create_link("https://example.com/new", Some("reuse"))
        .await;

    assert_eq!(body["originalUrl"], "https://example.com/new");
}
