use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ExpenseHub, JwtAuth, ServerState};

const SECRET: &str = "test-secret-test-secret-test-secret";

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let hub = ExpenseHub::default();
    let engine = Engine::builder()
        .database(db)
        .notifier(Arc::new(hub.clone()))
        .build()
        .unwrap();
    let auth = JwtAuth::new(SECRET, 3600).unwrap();

    server::router(ServerState::new(engine, auth, hub), &[])
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Sign up and log in, returning a bearer token.
async fn login(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/signup",
        None,
        Some(json!({"username": "user", "email": email, "password": "pw-123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": email, "password": "pw-123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expires_in"], 3600);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn service_endpoints_are_public() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Budgetr API"}));

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing bearer token");

    let (status, body) = send(&app, Method::GET, "/api/users/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn signup_login_and_profile() {
    let app = app().await;
    let token = login(&app, "Ann@Example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ann@example.com");
    assert_eq!(body["username"], "user");
}

#[tokio::test]
async fn duplicate_signup_and_bad_login() {
    let app = app().await;
    login(&app, "ann@example.com").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/signup",
        None,
        Some(json!({"username": "x", "email": "ann@example.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({"email": "ann@example.com", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn budget_lifecycle() {
    let app = app().await;
    let token = login(&app, "ann@example.com").await;

    let (status, body) = send(&app, Method::GET, "/api/budgets/ann@example.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"budget": null}));

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/budgets",
        Some(&token),
        Some(json!({"amount": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["created"], true);
    assert_eq!(created["amount"], 100.0);

    let (status, updated) = send(
        &app,
        Method::POST,
        "/api/budgets",
        Some(&token),
        Some(json!({"amount": "150.50"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["created"], false);
    assert_eq!(updated["budget_id"], created["budget_id"]);

    let (status, body) = send(&app, Method::GET, "/api/budgets/ann@example.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["budget"]["amount"], 150.5);
    assert_eq!(body["budget"]["remaining"], 150.5);
    assert_eq!(body["budget"]["total_expenses"], 0.0);

    let id = created["budget_id"].as_str().unwrap();
    let (status, body) = send(&app, Method::DELETE, &format!("/api/budgets/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": true}));

    let (status, _) = send(&app, Method::DELETE, &format!("/api/budgets/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn budget_input_is_validated() {
    let app = app().await;
    let token = login(&app, "ann@example.com").await;

    for body in [json!({}), json!({"amount": 0}), json!({"amount": -5}), json!({"amount": "ten"})] {
        let (status, _) = send(&app, Method::POST, "/api/budgets", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/budgets")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expense_input_is_validated() {
    let app = app().await;
    let token = login(&app, "ann@example.com").await;
    send(&app, Method::POST, "/api/budgets", Some(&token), Some(json!({"amount": 100}))).await;

    for body in [
        json!({}),
        json!({"amount": "ten"}),
        json!({"amount": 0}),
        json!({"amount": -5}),
        json!({"amount": 1.234}),
    ] {
        let (status, reply) = send(&app, Method::POST, "/api/expenses", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{reply}");
        assert!(reply["error"].is_string());
    }

    let (_, list) = send(&app, Method::GET, "/api/expenses/ann@example.com", Some(&token), None).await;
    assert_eq!(list, json!({"expenses": [], "count": 0}));

    let (_, body) = send(&app, Method::GET, "/api/budgets/ann@example.com", Some(&token), None).await;
    assert_eq!(body["budget"]["remaining"], 100.0);
}

#[tokio::test]
async fn other_users_data_is_unauthorized() {
    let app = app().await;
    let ann = login(&app, "ann@example.com").await;
    login(&app, "bob@example.com").await;

    let (status, _) = send(&app, Method::GET, "/api/budgets/bob@example.com", Some(&ann), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/expenses/bob@example.com", Some(&ann), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expense_admission_over_http() {
    let app = app().await;
    let token = login(&app, "ann@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(&token),
        Some(json!({"amount": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No active budget found");

    send(&app, Method::POST, "/api/budgets", Some(&token), Some(json!({"amount": 100}))).await;

    let (status, first) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(&token),
        Some(json!({"amount": 60, "description": "rent"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["amount"], 60.0);
    assert_eq!(first["description"], "rent");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(&token),
        Some(json!({"amount": 50})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["remaining"], 40.0);

    let (status, list) = send(&app, Method::GET, "/api/expenses/ann@example.com", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);
    assert_eq!(list["expenses"][0]["id"], first["expense_id"]);

    let id = first["expense_id"].as_str().unwrap();
    let (status, _) = send(&app, Method::DELETE, &format!("/api/expenses/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, "/api/expenses/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, Method::GET, "/api/expenses/ann@example.com", Some(&token), None).await;
    assert_eq!(list, json!({"expenses": [], "count": 0}));
}
