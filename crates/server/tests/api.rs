use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use server::{app, config::Config, notify::Notifier, state::AppState};
use tower::ServiceExt;

async fn setup() -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "JWT_SECRET" => Some("test secret".to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .unwrap();

    app(AppState::new(db, config, Notifier::disabled()))
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
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

/// Registers an account and returns the profile detail
async fn register(app: &Router, body: Value) -> Value {
    let (status, response) = send(app, Method::POST, "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    response["data"]["profile"]["detail"].clone()
}

async fn login(app: &Router, identifier: &str) -> String {
    let (status, response) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"identifier": identifier, "password": "rahasia123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{response}");
    response["data"]["token"].as_str().unwrap().to_string()
}

fn account(username: &str, role: &str) -> Value {
    json!({
        "username": username,
        "name": format!("User {username}"),
        "email": format!("{username}@kampus.ac.id"),
        "password": "rahasia123",
        "role": role,
        "department": "Informatika",
    })
}

fn with(mut base: Value, key: &str, value: &str) -> Value {
    base[key] = json!(value);
    base
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = setup().await;
    register(&app, with(account("budi", "mahasiswa"), "nim", "2025000001")).await;

    let token = login(&app, "2025000001").await;
    let (status, profile) = send(&app, Method::GET, "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["success"], true);
    assert_eq!(profile["data"]["user"]["username"], "budi");
    assert_eq!(profile["data"]["profile"]["role"], "mahasiswa");
    assert!(profile["data"]["user"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"identifier": "budi", "password": "salah123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "invalid credentials");

    let (status, body) = send(&app, Method::GET, "/api/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing bearer token");

    let (status, _) = send(&app, Method::GET, "/api/profile", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_registration_validation() {
    let app = setup().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(account("budi", "mahasiswa")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "nim is required for role mahasiswa");

    let short = with(with(account("budi", "mahasiswa"), "nim", "2025000001"), "password", "123");
    let (status, _) = send(&app, Method::POST, "/api/auth/register", None, Some(short)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The failed attempts left nothing behind
    register(&app, with(account("budi", "mahasiswa"), "nim", "2025000001")).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(with(account("budi2", "mahasiswa"), "nim", "2025000001")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "NIM already registered");
}

#[tokio::test]
async fn test_malformed_body_is_an_envelope() {
    let app = setup().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_enrollment_to_transcript() {
    let app = setup().await;
    register(&app, with(account("kajur", "kajur"), "nidn", "9900000001")).await;
    let sari = register(&app, with(account("sari", "dosen"), "nidn", "0011223344")).await;
    register(&app, with(account("joko", "dosen"), "nidn", "0011223355")).await;
    let budi = register(&app, with(account("budi", "mahasiswa"), "nim", "2025000001")).await;

    let kajur = login(&app, "kajur").await;
    let sari_token = login(&app, "sari@kampus.ac.id").await;
    let joko = login(&app, "0011223355").await;
    let student = login(&app, "2025000001").await;

    let (status, course) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&kajur),
        Some(json!({
            "code": "IF101",
            "name": "Basis Data",
            "credits": 3,
            "lecturer_id": sari["id"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{course}");
    let course_id = course["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&student),
        Some(json!({"code": "IF102", "name": "Algoritma", "credits": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, entry) = send(
        &app,
        Method::POST,
        "/api/krs",
        Some(&student),
        Some(json!({"course_id": course_id, "semester": 1, "academic_year": "2025/2026"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{entry}");
    assert_eq!(entry["data"]["approval_status"], "pending");
    let entry_id = entry["data"]["id"].as_str().unwrap().to_string();

    // Joko is not Budi's advisor
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/dosen/krs/{entry_id}/approval"),
        Some(&joko),
        Some(json!({"action": "approve"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, pending) = send(&app, Method::GET, "/api/kajur/krs/pending", Some(&kajur), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["pagination"]["total"], 1);

    let (status, decided) = send(
        &app,
        Method::PUT,
        &format!("/api/kajur/krs/{entry_id}/validation"),
        Some(&kajur),
        Some(json!({"action": "approve"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{decided}");
    assert_eq!(decided["data"]["approval_status"], "approved");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/kajur/krs/{entry_id}/validation"),
        Some(&kajur),
        Some(json!({"action": "reject", "rejection_reason": "terlambat"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let grade_uri = format!(
        "/api/dosen/courses/{course_id}/students/{}/nilai",
        budi["id"].as_str().unwrap()
    );
    let scores = json!({"task_score": 90.0, "midterm_score": 90.0, "final_exam_score": 90.0});
    let (status, _) = send(&app, Method::POST, &grade_uri, Some(&joko), Some(scores.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, grade) = send(&app, Method::POST, &grade_uri, Some(&sari_token), Some(scores)).await;
    assert_eq!(status, StatusCode::OK, "{grade}");
    assert_eq!(grade["data"]["letter"], "A");

    let (status, transcript) = send(&app, Method::GET, "/api/nilai/transkrip", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transcript["data"]["total_credits"], 3);
    assert_eq!(transcript["data"]["gpa"], 4.0);

    let (status, _) = send(&app, Method::GET, "/api/nilai/transkrip", Some(&sari_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_attendance_batch_with_no_recorded_entry() {
    let app = setup().await;
    register(&app, with(account("kajur", "kajur"), "nidn", "9900000001")).await;
    let sari = register(&app, with(account("sari", "dosen"), "nidn", "0011223344")).await;
    let budi = register(&app, with(account("budi", "mahasiswa"), "nim", "2025000001")).await;
    let kajur = login(&app, "kajur").await;
    let sari_token = login(&app, "sari").await;

    let (_, course) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&kajur),
        Some(json!({"code": "IF101", "name": "Basis Data", "credits": 3, "lecturer_id": sari["id"]})),
    )
    .await;

    // Budi never enrolled, so his entry fails
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/absensi/input",
        Some(&sari_token),
        Some(json!({
            "course_id": course["data"]["id"],
            "meeting": 1,
            "date": "2025-09-01",
            "entries": [{"student_id": budi["id"], "status": "hadir"}],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["success_count"], 0);
    assert_eq!(body["data"]["total_count"], 1);
    assert_eq!(body["data"]["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_public_routes() {
    let app = setup().await;
    register(&app, with(account("budi", "mahasiswa"), "nim", "2025000001")).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/mahasiswa/bind-phone",
        None,
        Some(json!({"nim": "2025000001", "phone_number": "081234567890"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["phone"], "081234567890");

    let (status, body) = send(&app, Method::GET, "/api/mahasiswa/nim/2025000001", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "User budi");

    let (status, _) = send(&app, Method::GET, "/api/mahasiswa/nim/0000000000", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");

    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/auth/login"].is_object());
}
