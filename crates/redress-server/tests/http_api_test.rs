//! End-to-end HTTP tests over the full router, with an in-memory
//! database and a recording mailer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use redress_auth::AuthConfig;
use redress_core::models::user::{CreateUser, Role};
use redress_core::repository::UserRepository;
use redress_db::repository::SurrealUserRepository;
use redress_db::{DbConfig, DbManager};
use redress_server::mail::{MailError, Mailer, OutgoingEmail};
use redress_server::routes::build_router;
use redress_server::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.subject.clone())
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// A mailer that always fails, for checking failure isolation.
struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: OutgoingEmail) -> Result<(), MailError> {
        Err(MailError::Smtp("connection refused".into()))
    }
}

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin123456";

async fn setup_with_mailer(mailer: Arc<dyn Mailer>) -> Router {
    let db = DbManager::connect(&DbConfig {
        url: "mem://".into(),
        ..Default::default()
    })
    .await
    .unwrap();
    redress_db::run_migrations(db.client()).await.unwrap();

    // Seed the admin the way the bootstrap binary does.
    let users = SurrealUserRepository::new(db.client().clone());
    users
        .create(CreateUser {
            email: ADMIN_EMAIL.into(),
            name: "System Administrator".into(),
            password: ADMIN_PASSWORD.into(),
            role: Role::Admin,
        })
        .await
        .unwrap();

    build_router(AppState::new(
        db.client().clone(),
        AuthConfig::default(),
        mailer,
        ADMIN_EMAIL.into(),
    ))
}

async fn setup() -> (Router, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let app = setup_with_mailer(mailer.clone()).await;
    (app, mailer)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, email: &str, name: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": email, "password": "correct-horse-battery", "name": name})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    call(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

fn leak_body() -> Value {
    json!({
        "title": "Leak",
        "description": "Sink leaking",
        "category": "Technical",
        "priority": "High",
    })
}

#[tokio::test]
async fn register_returns_token_and_rejects_duplicates() {
    let (app, _mailer) = setup().await;

    let (status, body) = call(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": "alice@example.com", "password": "pw12345678", "name": "Alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["email"], json!("alice@example.com"));
    assert_eq!(body["data"]["user"]["role"], json!("user"));
    assert!(body["data"]["user"].get("password_hash").is_none());

    // The token's claims match the created user.
    let token = body["data"]["token"].as_str().unwrap();
    let claims = redress_auth::token::verify_token(token, &AuthConfig::default()).unwrap();
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.sub, body["data"]["user"]["id"].as_str().unwrap());

    let (status, body) = call(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": "alice@example.com", "password": "other-pw-123", "name": "Clone"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("User already exists with this email"));
}

#[tokio::test]
async fn register_requires_all_fields() {
    let (app, _mailer) = setup().await;

    let (status, body) = call(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({"email": "alice@example.com", "password": "pw12345678"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn login_gives_no_email_existence_oracle() {
    let (app, _mailer) = setup().await;
    register(&app, "alice@example.com", "Alice").await;

    let (wrong_status, wrong_body) = login(&app, "alice@example.com", "wrong").await;
    let (unknown_status, unknown_body) = login(&app, "nobody@example.com", "whatever").await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["error"], unknown_body["error"]);
    assert_eq!(wrong_body["error"], json!("Invalid credentials"));
}

#[tokio::test]
async fn gate_denials_carry_the_envelope() {
    let (app, _mailer) = setup().await;

    // No header at all.
    let (status, body) = call(&app, "GET", "/users/complaints", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Access token required"));

    // Garbage token.
    let (status, body) = call(&app, "GET", "/users/complaints", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Invalid or expired token"));

    // Valid user token on an admin route.
    let user_token = register(&app, "alice@example.com", "Alice").await;
    let (status, body) = call(&app, "GET", "/complaints", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], json!("Admin access required"));

    // Admin passes through.
    let admin = admin_token(&app).await;
    let (status, _body) = call(&app, "GET", "/complaints", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn complaint_creation_validates_fields() {
    let (app, _mailer) = setup().await;
    let token = register(&app, "alice@example.com", "Alice").await;

    for missing in ["title", "description", "category", "priority"] {
        let mut body = leak_body();
        body.as_object_mut().unwrap().remove(missing);
        let (status, response) =
            call(&app, "POST", "/complaints", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {missing}");
        assert_eq!(response["error"], json!("All fields are required"));
    }

    let (status, _) = call(
        &app,
        "POST",
        "/complaints",
        Some(&token),
        Some(json!({
            "title": "Leak",
            "description": "Sink leaking",
            "category": "Plumbing",
            "priority": "High",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was persisted by any of the failed attempts.
    let (_, listing) = call(&app, "GET", "/users/complaints", Some(&token), None).await;
    assert_eq!(listing["data"], json!([]));
}

#[tokio::test]
async fn caller_supplied_status_is_ignored() {
    let (app, _mailer) = setup().await;
    let token = register(&app, "alice@example.com", "Alice").await;

    let mut body = leak_body();
    body.as_object_mut()
        .unwrap()
        .insert("status".into(), json!("Resolved"));
    let (status, response) = call(&app, "POST", "/complaints", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["data"]["status"], json!("Pending"));
}

#[tokio::test]
async fn update_status_rejects_unknown_values_without_mutation() {
    let (app, _mailer) = setup().await;
    let token = register(&app, "alice@example.com", "Alice").await;
    let admin = admin_token(&app).await;

    let (_, created) = call(&app, "POST", "/complaints", Some(&token), Some(leak_body())).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    for bad in [json!({"status": "Escalated"}), json!({})] {
        let (status, response) = call(
            &app,
            "PATCH",
            &format!("/complaints/{id}"),
            Some(&admin),
            Some(bad),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], json!("Valid status is required"));
    }

    let (_, listing) = call(&app, "GET", "/complaints", Some(&admin), None).await;
    assert_eq!(listing["data"][0]["status"], json!("Pending"));

    // A valid value succeeds, including the no-op self transition.
    for target in ["In Progress", "In Progress", "Pending"] {
        let (status, response) = call(
            &app,
            "PATCH",
            &format!("/complaints/{id}"),
            Some(&admin),
            Some(json!({"status": target})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["data"]["status"], json!(target));
    }
}

#[tokio::test]
async fn users_only_ever_see_their_own_complaints() {
    let (app, _mailer) = setup().await;
    let alice = register(&app, "alice@example.com", "Alice").await;
    let bob = register(&app, "bob@example.com", "Bob").await;

    call(&app, "POST", "/complaints", Some(&alice), Some(leak_body())).await;
    call(
        &app,
        "POST",
        "/complaints",
        Some(&bob),
        Some(json!({
            "title": "Slow checkout",
            "description": "Checkout takes a minute",
            "category": "Product",
            "priority": "Low",
        })),
    )
    .await;

    let (_, alices) = call(&app, "GET", "/users/complaints", Some(&alice), None).await;
    let titles: Vec<&str> = alices["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Leak"]);

    // The admin listing is ownership-unfiltered and joins submitters.
    let admin = admin_token(&app).await;
    let (_, all) = call(&app, "GET", "/complaints", Some(&admin), None).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);
    let submitters: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["submitter"]["email"].as_str().unwrap())
        .collect();
    assert!(submitters.contains(&"alice@example.com"));
    assert!(submitters.contains(&"bob@example.com"));
}

#[tokio::test]
async fn admin_filters_combine_as_a_conjunction() {
    let (app, _mailer) = setup().await;
    let token = register(&app, "alice@example.com", "Alice").await;
    let admin = admin_token(&app).await;

    call(&app, "POST", "/complaints", Some(&token), Some(leak_body())).await;
    call(
        &app,
        "POST",
        "/complaints",
        Some(&token),
        Some(json!({
            "title": "Refund missing",
            "description": "Refund never arrived",
            "category": "Service",
            "priority": "High",
        })),
    )
    .await;

    let (_, both) = call(
        &app,
        "GET",
        "/complaints?priority=High",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(both["data"].as_array().unwrap().len(), 2);

    let (_, one) = call(
        &app,
        "GET",
        "/complaints?status=Pending&priority=High&category=Technical",
        Some(&admin),
        None,
    )
    .await;
    let data = one["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], json!("Leak"));

    // The two-word status round-trips through URL encoding.
    let (_, none) = call(
        &app,
        "GET",
        "/complaints?status=In%20Progress",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(none["data"], json!([]));

    let (status, body) = call(
        &app,
        "GET",
        "/complaints?status=Escalated",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn end_to_end_complaint_lifecycle() {
    let (app, mailer) = setup().await;

    // User A registers and submits a complaint.
    let alice = register(&app, "alice@example.com", "Alice").await;
    let (status, created) =
        call(&app, "POST", "/complaints", Some(&alice), Some(leak_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Admin logs in, lists complaints, sees it at Pending.
    let admin = admin_token(&app).await;
    let (_, listing) = call(&app, "GET", "/complaints", Some(&admin), None).await;
    let entry = &listing["data"][0];
    assert_eq!(entry["title"], json!("Leak"));
    assert_eq!(entry["status"], json!("Pending"));

    // Admin moves it to In Progress.
    let (status, updated) = call(
        &app,
        "PATCH",
        &format!("/complaints/{id}"),
        Some(&admin),
        Some(json!({"status": "In Progress"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["status"], json!("In Progress"));

    // User A re-lists and sees the updated status.
    let (_, own) = call(&app, "GET", "/users/complaints", Some(&alice), None).await;
    assert_eq!(own["data"][0]["status"], json!("In Progress"));

    // Admin deletes it; the listing no longer includes it.
    let (status, deleted) = call(
        &app,
        "DELETE",
        &format!("/complaints/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], json!(true));
    assert!(deleted.as_object().unwrap().contains_key("data"));
    assert_eq!(deleted["data"], Value::Null);

    let (_, listing) = call(&app, "GET", "/complaints", Some(&admin), None).await;
    assert_eq!(listing["data"], json!([]));

    // A second delete of the same id is a 404.
    let (status, body) = call(
        &app,
        "DELETE",
        &format!("/complaints/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Complaint not found"));

    // Each trigger produced one notification.
    let subjects = mailer.subjects();
    assert!(subjects.contains(&"Welcome to Complaint Management System".to_string()));
    assert!(subjects.contains(&"New Complaint: Leak".to_string()));
    assert!(subjects.contains(&"Complaint Status Updated: Leak".to_string()));
}

#[tokio::test]
async fn mail_failures_never_surface_to_the_caller() {
    let app = setup_with_mailer(Arc::new(FailingMailer)).await;

    let token = register(&app, "alice@example.com", "Alice").await;
    let (status, _) = call(&app, "POST", "/complaints", Some(&token), Some(leak_body())).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn concurrent_status_updates_race_last_write_wins() {
    let (app, _mailer) = setup().await;
    let token = register(&app, "alice@example.com", "Alice").await;
    let admin = admin_token(&app).await;

    let (_, created) = call(&app, "POST", "/complaints", Some(&token), Some(leak_body())).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Two updates race on the same document; both succeed, and the
    // stored value is whichever write landed last.
    let (a, b) = tokio::join!(
        call(
            &app,
            "PATCH",
            &format!("/complaints/{id}"),
            Some(&admin),
            Some(json!({"status": "In Progress"})),
        ),
        call(
            &app,
            "PATCH",
            &format!("/complaints/{id}"),
            Some(&admin),
            Some(json!({"status": "Resolved"})),
        ),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);

    let (_, listing) = call(&app, "GET", "/complaints", Some(&admin), None).await;
    let final_status = listing["data"][0]["status"].as_str().unwrap();
    assert!(
        final_status == "In Progress" || final_status == "Resolved",
        "final status should be one of the racing writes, got {final_status}"
    );
}
