use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use task_server::{AppState, build_router};
use tower::ServiceExt;

fn app() -> Router {
    build_router(AppState::in_memory())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn task_routes_require_identity() {
    let app = app();
    let (status, body) = send(&app, "GET", "/tasks", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthenticated");
}

#[tokio::test]
async fn create_returns_201_with_pending_task() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some("alice"),
        Some(json!({ "title": "Buy milk" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Buy milk");
    assert_eq!(body["completed"], false);
    assert_eq!(body["userId"], "alice");
    assert!(body.get("description").is_none());
    assert!(body["_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn create_ignores_client_supplied_owner() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some("alice"),
        Some(json!({ "title": "Buy milk", "userId": "mallory", "completed": true })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], "alice");
    assert_eq!(body["completed"], false);
}

#[tokio::test]
async fn create_without_title_is_400() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some("alice"),
        Some(json!({ "description": "no title" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
    assert_eq!(body["message"], "title is required");
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("x-user-id", "alice")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_returns_newest_first_and_only_own_tasks() {
    let app = app();
    send(&app, "POST", "/tasks", Some("alice"), Some(json!({ "title": "first" }))).await;
    send(&app, "POST", "/tasks", Some("bob"), Some(json!({ "title": "bob's" }))).await;
    send(&app, "POST", "/tasks", Some("alice"), Some(json!({ "title": "second" }))).await;

    let (status, body) = send(&app, "GET", "/tasks", Some("alice"), None).await;

    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["second", "first"]);
}

#[tokio::test]
async fn update_applies_partial_fields() {
    let app = app();
    let (_, created) = send(
        &app,
        "POST",
        "/tasks",
        Some("alice"),
        Some(json!({ "title": "Buy milk", "description": "two liters" })),
    )
    .await;
    let uri = format!("/tasks/{}", created["_id"].as_str().unwrap());

    let (status, updated) = send(&app, "PUT", &uri, Some("alice"), Some(json!({ "completed": true }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["description"], "two liters");
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    let (_, cleared) = send(
        &app,
        "PUT",
        &uri,
        Some("alice"),
        Some(json!({ "title": "", "description": "" })),
    )
    .await;
    assert_eq!(cleared["title"], "Buy milk");
    assert!(cleared.get("description").is_none());
    assert_eq!(cleared["completed"], true);
}

#[tokio::test]
async fn update_with_wrong_field_type_is_400() {
    let app = app();
    let (_, created) = send(&app, "POST", "/tasks", Some("alice"), Some(json!({ "title": "x" }))).await;
    let uri = format!("/tasks/{}", created["_id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some("alice"), Some(json!({ "completed": "yes" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn array_body_is_400() {
    let app = app();
    let (status, body) = send(&app, "POST", "/tasks", Some("alice"), Some(json!(["x"]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (_, listed) = send(&app, "GET", "/tasks", Some("alice"), None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_with_oversized_fields_is_400_and_keeps_task() {
    let app = app();
    let (_, created) = send(
        &app,
        "POST",
        "/tasks",
        Some("alice"),
        Some(json!({ "title": "Buy milk", "description": "two liters" })),
    )
    .await;
    let uri = format!("/tasks/{}", created["_id"].as_str().unwrap());

    let (title_status, title_body) = send(
        &app,
        "PUT",
        &uri,
        Some("alice"),
        Some(json!({ "title": "a".repeat(201) })),
    )
    .await;
    let (description_status, description_body) = send(
        &app,
        "PUT",
        &uri,
        Some("alice"),
        Some(json!({ "description": "a".repeat(1001) })),
    )
    .await;

    assert_eq!(title_status, StatusCode::BAD_REQUEST);
    assert_eq!(title_body["code"], "validation_error");
    assert_eq!(description_status, StatusCode::BAD_REQUEST);
    assert_eq!(description_body["code"], "validation_error");

    let (_, listed) = send(&app, "GET", "/tasks", Some("alice"), None).await;
    assert_eq!(listed[0], created);
}

#[tokio::test]
async fn update_unknown_id_is_404() {
    let app = app();
    let (status, body) = send(
        &app,
        "PUT",
        "/tasks/does-not-exist",
        Some("alice"),
        Some(json!({ "completed": true })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
}

#[tokio::test]
async fn other_owner_gets_404() {
    let app = app();
    let (_, created) = send(&app, "POST", "/tasks", Some("alice"), Some(json!({ "title": "private" }))).await;
    let uri = format!("/tasks/{}", created["_id"].as_str().unwrap());

    let (update_status, _) = send(&app, "PUT", &uri, Some("bob"), Some(json!({ "title": "mine" }))).await;
    let (delete_status, _) = send(&app, "DELETE", &uri, Some("bob"), None).await;
    let (_, alice_tasks) = send(&app, "GET", "/tasks", Some("alice"), None).await;

    assert_eq!(update_status, StatusCode::NOT_FOUND);
    assert_eq!(delete_status, StatusCode::NOT_FOUND);
    assert_eq!(alice_tasks[0]["title"], "private");
}

#[tokio::test]
async fn delete_then_list_excludes_task() {
    let app = app();
    let (_, kept) = send(&app, "POST", "/tasks", Some("alice"), Some(json!({ "title": "keep" }))).await;
    let (_, dropped) = send(&app, "POST", "/tasks", Some("alice"), Some(json!({ "title": "drop" }))).await;
    let uri = format!("/tasks/{}", dropped["_id"].as_str().unwrap());

    let (status, body) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");

    let (_, listed) = send(&app, "GET", "/tasks", Some("alice"), None).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["_id"], kept["_id"]);

    let (again, _) = send(&app, "DELETE", &uri, Some("alice"), None).await;
    assert_eq!(again, StatusCode::NOT_FOUND);
}
