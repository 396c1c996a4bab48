//! HTTP Auth Gateway
//!
//! reqwest implementation of the `AuthGateway` seam against the Inkline
//! auth API. The session itself travels in cookies held by the client's
//! jar; the anti-forgery token is seeded by a priming request and echoed
//! back on mutating calls through the `X-XSRF-TOKEN` header.

use std::sync::Arc;
use std::time::Duration;

use kernel::error::app_error::AppError;
use platform::http::{HttpClientConfig, build_client};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user_record::{UserId, UserRecord};
use crate::domain::gateway::{AuthGateway, LoginInput};
use crate::domain::value_object::{account_type::AccountType, email::Email, handle::Handle};
use crate::error::{FieldErrors, SessionError, SessionResult};

/// CSRF priming endpoint, must precede the first sign-in
pub const CSRF_COOKIE_PATH: &str = "/sanctum/csrf-cookie";
/// Credential submission endpoint
pub const SIGN_IN_PATH: &str = "/login";
/// Remote sign-out endpoint
pub const SIGN_OUT_PATH: &str = "/logout";
/// Current-user endpoint
pub const CURRENT_USER_PATH: &str = "/users/me";

const XSRF_COOKIE: &str = "XSRF-TOKEN";
const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// HTTP gateway configuration
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Auth API origin, e.g. `https://api.inkline.app`
    pub base_url: String,
    /// Underlying client knobs (timeout, user agent)
    pub http: HttpClientConfig,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.inkline.app".to_string(),
            http: HttpClientConfig::default(),
        }
    }
}

impl HttpGatewayConfig {
    /// Config pointed at a local development server
    pub fn development() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http.timeout = timeout;
        self
    }
}

/// reqwest-backed auth gateway
pub struct HttpAuthGateway {
    http: Client,
    jar: Arc<Jar>,
    base: Url,
}

impl HttpAuthGateway {
    pub fn new(config: &HttpGatewayConfig) -> SessionResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| SessionError::Internal(format!("Invalid base URL: {e}")))?;
        let (http, jar) = build_client(&config.http)?;

        Ok(Self { http, jar, base })
    }

    fn endpoint(&self, path: &str) -> SessionResult<Url> {
        self.base
            .join(path)
            .map_err(|e| SessionError::Internal(format!("Invalid endpoint {path}: {e}")))
    }

    /// Read the anti-forgery token back out of the jar
    ///
    /// The server sets it URL-encoded; it must be echoed decoded.
    fn xsrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        let raw = header.to_str().ok()?;
        raw.split(';').map(str::trim).find_map(|pair| {
            pair.split_once('=')
                .filter(|(name, _)| *name == XSRF_COOKIE)
                .map(|(_, value)| percent_decode(value))
        })
    }

    fn transport(err: reqwest::Error) -> SessionError {
        SessionError::from(AppError::from(err))
    }

    /// Classify a non-success response into the session error taxonomy
    async fn check(response: Response) -> SessionResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            401 => Err(SessionError::Unauthenticated),
            422 => {
                let errors = response.json::<FieldErrors>().await.unwrap_or_else(|_| {
                    FieldErrors {
                        message: "The submission was rejected".to_string(),
                        fields: Default::default(),
                    }
                });
                Err(SessionError::Validation(errors))
            }
            code => {
                let message = response
                    .text()
                    .await
                    .ok()
                    .filter(|body| !body.is_empty())
                    .unwrap_or_else(|| status.to_string());
                Err(SessionError::from_status(code, message))
            }
        }
    }
}

impl AuthGateway for HttpAuthGateway {
    async fn prime_csrf(&self) -> SessionResult<()> {
        let url = self.endpoint(CSRF_COOKIE_PATH)?;
        let response = self.http.get(url).send().await.map_err(Self::transport)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn sign_in(&self, input: &LoginInput) -> SessionResult<()> {
        let url = self.endpoint(SIGN_IN_PATH)?;
        let mut request = self.http.post(url).json(&SignInRequest::from(input));
        if let Some(token) = self.xsrf_token() {
            request = request.header(XSRF_HEADER, token);
        }

        let response = request.send().await.map_err(Self::transport)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn sign_out(&self) -> SessionResult<()> {
        let url = self.endpoint(SIGN_OUT_PATH)?;
        let mut request = self.http.post(url);
        if let Some(token) = self.xsrf_token() {
            request = request.header(XSRF_HEADER, token);
        }

        let response = request.send().await.map_err(Self::transport)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn fetch_current_user(&self) -> SessionResult<UserRecord> {
        let url = self.endpoint(CURRENT_USER_PATH)?;
        let response = self.http.get(url).send().await.map_err(Self::transport)?;
        let response = Self::check(response).await?;

        let dto = response
            .json::<CurrentUserResponse>()
            .await
            .map_err(|e| SessionError::Internal(format!("Malformed user payload: {e}")))?;
        dto.try_into()
    }
}

// ============================================================================
// Wire DTOs
// ============================================================================

/// Sign-in request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    remember: bool,
}

impl<'a> From<&'a LoginInput> for SignInRequest<'a> {
    fn from(input: &'a LoginInput) -> Self {
        Self {
            email: &input.email,
            password: &input.password,
            remember: input.remember,
        }
    }
}

/// Current-user response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentUserResponse {
    id: i64,
    name: String,
    email: String,
    username: String,
    slug: String,
    account_type: AccountType,
    #[serde(default)]
    bio: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<CurrentUserResponse> for UserRecord {
    type Error = SessionError;

    fn try_from(dto: CurrentUserResponse) -> SessionResult<Self> {
        let malformed =
            |e: AppError| SessionError::Internal(format!("Malformed user payload: {}", e.message()));

        Ok(UserRecord {
            id: UserId::from_raw(dto.id),
            name: dto.name,
            email: Email::new(dto.email).map_err(malformed)?,
            username: Handle::new(dto.username).map_err(malformed)?,
            slug: dto.slug,
            account_type: dto.account_type,
            bio: dto.bio,
            location: dto.location,
            avatar_url: dto.avatar_url,
            created_at: dto.created_at,
        })
    }
}

/// Minimal percent-decoding for cookie values
fn percent_decode(raw: &str) -> String {
    fn hex(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("plain"), "plain");
        assert_eq!(percent_decode("a%3Db"), "a=b");
        assert_eq!(percent_decode("trail%2"), "trail%2");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn test_sign_in_request_shape() {
        let input = LoginInput {
            email: "ink@example.com".to_string(),
            password: "hunter2".to_string(),
            remember: true,
        };
        let json = serde_json::to_string(&SignInRequest::from(&input)).unwrap();
        assert_eq!(
            json,
            r#"{"email":"ink@example.com","password":"hunter2","remember":true}"#
        );
    }

    #[test]
    fn test_current_user_response_parses() {
        let raw = r#"{
            "id": 7,
            "name": "Nora Nielsen",
            "email": "nora@example.com",
            "username": "needle.nora",
            "slug": "nora-nielsen",
            "accountType": "artist",
            "bio": null,
            "location": "Copenhagen",
            "avatarUrl": "https://cdn.inkline.app/a/7.jpg",
            "createdAt": "2024-05-01T12:00:00Z"
        }"#;
        let dto: CurrentUserResponse = serde_json::from_str(raw).unwrap();
        let user: UserRecord = dto.try_into().unwrap();
        assert_eq!(user.id.as_i64(), 7);
        assert_eq!(user.username.as_str(), "needle.nora");
        assert_eq!(user.account_type, AccountType::Artist);
    }
}
