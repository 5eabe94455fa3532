//! Integration tests for the HTTP API.
//!
//! Every test gets its own in-memory SQLite store with migrations applied,
//! so the unique index on email is the real one.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};
use tower::ServiceExt;

use account_service::domain::NewUser;
use account_service::infra::repositories::entities::user::{self, Entity as UserEntity};
use account_service::infra::{UserRepository, UserStore};
use account_service::{create_router, AppError, AppState, Config, Database};

// =============================================================================
// Test Helpers
// =============================================================================

fn test_config() -> Config {
    Config::from_lookup(|key| {
        let value = match key {
            "DATABASE_URL" => "sqlite::memory:",
            // one connection, otherwise each pooled connection sees its own empty database
            "DATABASE_MAX_CONNECTIONS" => "1",
            "PASSWORD_HASH_MEMORY_KIB" => "1024",
            "PASSWORD_HASH_ITERATIONS" => "1",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test config is valid")
}

struct TestApp {
    router: Router,
    db: Arc<Database>,
}

impl TestApp {
    async fn new() -> Self {
        let config = test_config();
        let db = Arc::new(Database::connect(&config).await.expect("sqlite connects"));
        let router = create_router(AppState::from_config(db.clone(), &config));
        Self { router, db }
    }

    async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, text) = self.request("POST", uri, Some(body)).await;
        let json = serde_json::from_str(&text)
            .unwrap_or_else(|_| panic!("expected JSON body, got {:?}", text));
        (status, json)
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.post_json(
            "/api/register",
            json!({ "name": name, "email": email, "password": password }),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post_json("/api/login", json!({ "email": email, "password": password }))
            .await
    }

    async fn count_users(&self, email: &str) -> u64 {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(self.db.connection())
            .await
            .unwrap()
    }

    async fn stored_hash(&self, email: &str) -> String {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.connection())
            .await
            .unwrap()
            .expect("user is stored")
            .password_hash
    }
}

// =============================================================================
// Root & Health
// =============================================================================

#[tokio::test]
async fn test_root_returns_greeting() {
    let app = TestApp::new().await;

    let (status, body) = app.request("GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello from account-service!");
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = TestApp::new().await;

    let (status, body) = app.request("GET", "/health", None).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_lists_auth_paths() {
    let app = TestApp::new().await;

    let (status, body) = app.request("GET", "/api-docs/openapi.json", None).await;
    let doc: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/register").is_some());
    assert!(doc["paths"].get("/api/login").is_some());
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_and_login_scenario() {
    let app = TestApp::new().await;

    let (status, body) = app.register("Alice", "a@x.com", "secret").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "msg": "User registered successfully",
            "user": { "name": "Alice", "email": "a@x.com" }
        })
    );

    let (status, body) = app.login("a@x.com", "wrong").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "Invalid credentials" }));

    let (status, body) = app.login("a@x.com", "secret").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "msg": "Login successful" }));
}

#[tokio::test]
async fn test_register_twice_is_conflict_and_stores_one_record() {
    let app = TestApp::new().await;

    let (status, _) = app.register("Alice", "a@x.com", "secret").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.register("Alice Again", "a@x.com", "different").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "User already exists" }));

    assert_eq!(app.count_users("a@x.com").await, 1);
    // the original credentials are untouched
    let (status, _) = app.login("a@x.com", "secret").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_duplicate_registrations_store_one_record() {
    let app = TestApp::new().await;

    let ((first, _), (second, _)) = tokio::join!(
        app.register("Alice", "race@x.com", "secret"),
        app.register("Alice", "race@x.com", "secret"),
    );

    let mut statuses = [first.as_u16(), second.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 400]);
    assert_eq!(app.count_users("race@x.com").await, 1);
}

#[tokio::test]
async fn test_stored_password_is_salted_hash() {
    let app = TestApp::new().await;

    app.register("Alice", "a@x.com", "secret").await;
    app.register("Bob", "b@x.com", "secret").await;

    let hash_a = app.stored_hash("a@x.com").await;
    let hash_b = app.stored_hash("b@x.com").await;

    assert_ne!(hash_a, "secret");
    assert_ne!(hash_b, "secret");
    assert_ne!(hash_a, hash_b);
}

#[tokio::test]
async fn test_register_response_never_contains_password() {
    let app = TestApp::new().await;

    let (status, body) = app.register("Alice", "a@x.com", "secret").await;

    assert_eq!(status, StatusCode::CREATED);
    let text = body.to_string();
    assert!(!text.contains("password"));
    assert!(!text.contains("secret"));
    assert!(!text.contains("argon2"));
}

#[tokio::test]
async fn test_register_rejects_missing_field() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post_json("/api/register", json!({ "name": "Alice", "email": "a@x.com" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["msg"].as_str().unwrap().contains("password"));
    assert_eq!(app.count_users("a@x.com").await, 0);
}

#[tokio::test]
async fn test_register_rejects_empty_name() {
    let app = TestApp::new().await;

    let (status, body) = app.register("", "a@x.com", "secret").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "Name is required" }));
}

#[tokio::test]
async fn test_register_rejects_empty_email() {
    let app = TestApp::new().await;

    let (status, body) = app.register("Alice", "", "secret").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "Email is required" }));
}

#[tokio::test]
async fn test_register_accepts_any_non_empty_email() {
    let app = TestApp::new().await;

    let (status, body) = app.register("Bob", "bob", "secret").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "bob");
    let (status, _) = app.login("bob", "secret").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_rejects_empty_password() {
    let app = TestApp::new().await;

    let (status, body) = app.register("Alice", "a@x.com", "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "Password is required" }));
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_unknown_email_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.login("nobody@x.com", "secret").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "msg": "User not found" }));
}

#[tokio::test]
async fn test_login_rejects_malformed_json() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("Origin", "https://elsewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

// =============================================================================
// Store
// =============================================================================

#[tokio::test]
async fn test_store_unique_constraint_maps_to_conflict() {
    let app = TestApp::new().await;
    let store = UserStore::new(app.db.get_connection());

    let new_user = NewUser {
        name: "Alice".to_string(),
        email: "a@x.com".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
    };

    store.create(new_user.clone()).await.unwrap();
    let second = store.create(new_user).await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert!(store.find_by_email("a@x.com").await.unwrap().is_some());
    assert!(store.find_by_email("A@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_store_failure_is_opaque_server_error() {
    let app = TestApp::new().await;
    app.db.close().await.unwrap();

    for (uri, body) in [
        ("/api/login", json!({ "email": "a@x.com", "password": "secret" })),
        (
            "/api/register",
            json!({ "name": "Alice", "email": "a@x.com", "password": "secret" }),
        ),
    ] {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = response.headers().get(CONTENT_TYPE).cloned().unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Server error");
    }
}

#[tokio::test]
async fn test_database_close_releases_pool() {
    let app = TestApp::new().await;

    app.db.close().await.unwrap();

    assert!(app.db.ping().await.is_err());
}
