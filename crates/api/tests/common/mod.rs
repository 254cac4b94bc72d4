#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use stockroom_api::auth::session::{SessionConfig, SESSION_COOKIE};
use stockroom_api::config::ServerConfig;
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;
use stockroom_core::uploads::DEFAULT_MAX_UPLOAD_BYTES;

pub const PASSWORD: &str = "hunter22";

const BOUNDARY: &str = "stockroom-test-boundary";

/// Build a test `ServerConfig` that stores uploads under `upload_dir`.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        session: SessionConfig {
            secret: "integration-test-secret".to_string(),
            session_hours: 24,
            remember_days: 30,
            cookie_secure: false,
        },
    }
}

/// The real router plus the temporary upload directory behind it.
///
/// Keep the value alive for the whole test; dropping it deletes the uploads.
pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn upload_path(&self, filename: &str) -> std::path::PathBuf {
        self.uploads.path().join(filename)
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let uploads = tempfile::tempdir().expect("tempdir should be created");
    let state = AppState::new(pool, test_config(uploads.path()));
    TestApp {
        router: build_app_router(state),
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("router should not fail")
}

fn with_cookie(
    builder: axum::http::request::Builder,
    cookie: Option<&str>,
) -> axum::http::request::Builder {
    match cookie {
        Some(cookie) => builder.header(COOKIE, cookie),
        None => builder,
    }
}

pub async fn get(app: &TestApp, uri: &str, cookie: Option<&str>) -> Response {
    let request = with_cookie(Request::get(uri), cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST an `application/x-www-form-urlencoded` body. `body` must already be
/// encoded.
pub async fn post_form(app: &TestApp, uri: &str, body: &str, cookie: Option<&str>) -> Response {
    let request = with_cookie(Request::post(uri), cookie)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        data: &'a [u8],
    },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(
    app: &TestApp,
    uri: &str,
    parts: &[Part<'_>],
    cookie: Option<&str>,
) -> Response {
    let request = with_cookie(Request::post(uri), cookie)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

/// The four text fields of the item form.
pub fn item_parts<'a>(name: &'a str, quantity: &'a str, price: &'a str, category: &'a str) -> Vec<Part<'a>> {
    vec![
        Part::Text("name", name),
        Part::Text("quantity", quantity),
        Part::Text("price", price),
        Part::Text("category", category),
    ]
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// The raw `Set-Cookie` header for the session cookie, if one was set.
pub fn session_set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{SESSION_COOKIE}=")))
        .map(str::to_string)
}

/// `name=value` of the session cookie, ready for a `Cookie` request header.
pub fn session_cookie(response: &Response) -> Option<String> {
    session_set_cookie(response)
        .and_then(|raw| raw.split(';').next().map(str::to_string))
        .filter(|pair| pair.len() > SESSION_COOKIE.len() + 1)
}

/// Extract the stored image filename from the first `/uploads/...` link in a page.
pub fn first_upload_filename(page: &str) -> Option<String> {
    let start = page.find("/uploads/")? + "/uploads/".len();
    let rest = &page[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

pub async fn register(app: &TestApp, username: &str) -> Response {
    let body = format!(
        "username={username}&email={username}%40example.com&password={PASSWORD}&confirm_password={PASSWORD}"
    );
    post_form(app, "/register", &body, None).await
}

pub async fn login(app: &TestApp, username: &str, password: &str) -> Response {
    let body = format!("username={username}&password={password}");
    post_form(app, "/login", &body, None).await
}

/// Register `username`, log in, and return the session cookie pair.
pub async fn register_and_login(app: &TestApp, username: &str) -> String {
    let response = register(app, username).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "registration should redirect");

    let response = login(app, username, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should redirect");
    session_cookie(&response).expect("login should set the session cookie")
}

/// Add an item through the HTTP form and return the redirect response.
pub async fn add_item(
    app: &TestApp,
    cookie: &str,
    name: &str,
    quantity: &str,
    price: &str,
    category: &str,
) -> Response {
    post_multipart(app, "/add", &item_parts(name, quantity, price, category), Some(cookie)).await
}
