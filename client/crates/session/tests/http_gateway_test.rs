//! End-to-end exercise of the reqwest gateway against a mock auth API.
//!
//! The mock mirrors the remote contract: a CSRF priming endpoint that
//! seeds the anti-forgery cookie, a cookie-session login that answers
//! 204 or 422, a current-user endpoint that answers 401 without the
//! session cookie, and a best-effort logout.

use std::sync::{Arc, Mutex};

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use platform::storage::{MemoryStorage, StorageBackend};
use session::cache::CacheKey;
use session::{
    AuthGateway, FieldErrors, HttpAuthGateway, HttpGatewayConfig, LoginInput, LoginStatus,
    LoggingNavigator, SessionConfig, SessionError, SessionStore, ValidationSink,
};

const SESSION_COOKIE: &str = "inkline_session=valid";

async fn csrf_cookie() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, "XSRF-TOKEN=prime%3Dtoken; Path=/")],
    )
}

fn csrf_ok(headers: &HeaderMap) -> bool {
    headers
        .get("x-xsrf-token")
        .and_then(|value| value.to_str().ok())
        == Some("prime=token")
}

fn signed_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookies| cookies.contains(SESSION_COOKIE))
}

async fn login(headers: HeaderMap, Json(body): Json<serde_json::Value>) -> Response {
    if !csrf_ok(&headers) {
        return (StatusCode::FORBIDDEN, "CSRF token mismatch").into_response();
    }

    let email = body.get("email").and_then(|v| v.as_str()).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    if email == "nora@example.com" && password == "hunter2" {
        (
            StatusCode::NO_CONTENT,
            [(header::SET_COOKIE, "inkline_session=valid; Path=/; HttpOnly")],
        )
            .into_response()
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The given data was invalid.",
                "errors": {
                    "email": ["These credentials do not match our records."]
                }
            })),
        )
            .into_response()
    }
}

async fn current_user(headers: HeaderMap) -> Response {
    if !signed_in(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(json!({
        "id": 7,
        "name": "Nora Nielsen",
        "email": "nora@example.com",
        "username": "needle.nora",
        "slug": "nora-nielsen",
        "accountType": "artist",
        "bio": "Fine line and botanical work",
        "location": "Copenhagen",
        "avatarUrl": null,
        "createdAt": "2024-05-01T12:00:00Z"
    }))
    .into_response()
}

async fn logout() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, "inkline_session=; Path=/; Max-Age=0")],
    )
}

async fn spawn_mock_api() -> String {
    let app = Router::new()
        .route("/sanctum/csrf-cookie", get(csrf_cookie))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/users/me", get(current_user));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let addr = listener.local_addr().expect("mock api addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock api");
    });

    format!("http://{addr}")
}

fn gateway_for(base_url: &str) -> HttpAuthGateway {
    HttpAuthGateway::new(&HttpGatewayConfig::default().with_base_url(base_url))
        .expect("construct gateway")
}

fn valid_credentials() -> LoginInput {
    LoginInput {
        email: "nora@example.com".to_string(),
        password: "hunter2".to_string(),
        remember: false,
    }
}

#[derive(Default)]
struct CollectingSink {
    rejections: Mutex<Vec<FieldErrors>>,
}

impl ValidationSink for CollectingSink {
    fn reject(&self, errors: &FieldErrors) {
        self.rejections.lock().unwrap().push(errors.clone());
    }
}

// ============================================================================
// Gateway level
// ============================================================================

#[tokio::test]
async fn full_session_lifecycle_over_http() {
    let base = spawn_mock_api().await;
    let gateway = gateway_for(&base);

    // fresh client: no session
    let err = gateway.fetch_current_user().await.unwrap_err();
    assert!(err.is_unauthenticated());

    gateway.prime_csrf().await.unwrap();
    gateway.sign_in(&valid_credentials()).await.unwrap();

    let user = gateway.fetch_current_user().await.unwrap();
    assert_eq!(user.id.as_i64(), 7);
    assert_eq!(user.username.as_str(), "needle.nora");
    assert_eq!(user.email.as_str(), "nora@example.com");

    gateway.sign_out().await.unwrap();
    let err = gateway.fetch_current_user().await.unwrap_err();
    assert!(err.is_unauthenticated());
}

#[tokio::test]
async fn invalid_credentials_surface_field_errors() {
    let base = spawn_mock_api().await;
    let gateway = gateway_for(&base);

    gateway.prime_csrf().await.unwrap();
    let err = gateway
        .sign_in(&LoginInput {
            email: "nora@example.com".to_string(),
            password: "wrong".to_string(),
            remember: false,
        })
        .await
        .unwrap_err();

    match err {
        SessionError::Validation(errors) => {
            assert_eq!(errors.message, "The given data was invalid.");
            assert!(errors.field("email").is_some());
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn sign_in_without_priming_is_rejected() {
    let base = spawn_mock_api().await;
    let gateway = gateway_for(&base);

    let err = gateway.sign_in(&valid_credentials()).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

// ============================================================================
// Store over the real gateway
// ============================================================================

#[tokio::test]
async fn store_lifecycle_over_http() {
    let base = spawn_mock_api().await;
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(
        Arc::new(gateway_for(&base)),
        Arc::new(LoggingNavigator::new()),
        storage.clone() as Arc<dyn StorageBackend>,
        SessionConfig::default(),
    );

    let sink = CollectingSink::default();
    let status = store.login(valid_credentials(), &sink).await.unwrap();
    assert_eq!(status, LoginStatus::SignedIn);

    let snapshot = store.session().await;
    assert_eq!(snapshot.user().map(|u| u.slug.clone()), Some("nora-nielsen".to_string()));
    assert!(storage.get(CacheKey::UserData.name()).is_some());

    store.logout().await;
    assert!(store.peek().user().is_none());
    for key in CacheKey::ALL {
        assert_eq!(storage.get(key.name()), None);
    }
}
