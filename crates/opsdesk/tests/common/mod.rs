//! shared setup for the integration tests: in-memory database, seeded
//! baseline and a tiny request helper.

// each test binary uses a different subset of these helpers
#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use opsdesk::create_app;
use opsdesk_db::Db;
use opsdesk_types::Config;

/// a fully provisioned application over an in-memory database.
pub struct TestApp {
    pub app: Router,
    pub db: Db,
    pub config: Config,
    /// root of the per-test upload store.
    pub upload_root: std::path::PathBuf,
    _upload_dir: tempfile::TempDir,
}

/// set up a migrated, seeded application.
pub async fn spawn() -> TestApp {
    let db = Db::new_in_memory().await.unwrap();
    db.migrate().await.unwrap();

    let upload_dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.uploads.dir = upload_dir.path().to_string_lossy().into_owned();
    // generous window so tests never trip the limiter unintentionally
    config.login_rate.max_requests = 1000;

    opsdesk::seed::run(&db, &config).await.unwrap();

    let app = create_app(db.clone(), config.clone());
    TestApp {
        app,
        db,
        config,
        upload_root: upload_dir.path().to_path_buf(),
        _upload_dir: upload_dir,
    }
}

/// fire one multipart request built from `(name, filename, content)` parts;
/// a `None` filename makes a plain text part.
pub async fn multipart_request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    parts: &[(&str, Option<&str>, &str)],
) -> (StatusCode, Value) {
    let boundary = "opsdesk-test-boundary";
    let mut payload = String::new();
    for (name, filename, content) in parts {
        payload.push_str(&format!("--{boundary}\r\n"));
        match filename {
            Some(filename) => payload.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
            )),
            None => payload.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{content}\r\n"
            )),
        }
    }
    payload.push_str(&format!("--{boundary}--\r\n"));

    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={boundary}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(payload)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// every file currently stored under the test upload root.
pub fn stored_files(root: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                found.push(path);
            }
        }
    }
    found
}

/// fire one request, returning status and parsed JSON body.
pub async fn request(
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
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, json)
}

/// log in and return the session token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// the seeded administrator's token.
pub async fn admin_token(app: &Router) -> String {
    login(app, "admin@opsdesk.local", "admin1234").await
}

/// register a member (operator-role) user and return their token.
pub async fn member_token(app: &Router, email: &str) -> String {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "name": "Member User",
            "email": email,
            "password": "member1234",
            "phone": "+6200000001",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    login(app, email, "member1234").await
}
