//! Outbound HTTP Client Construction
//!
//! Builds the shared `reqwest` client the way every Inkline surface needs
//! it: a process-local cookie jar (the session cookie lives there), a
//! request timeout, and an identifying user agent. The jar handle is
//! returned alongside the client so callers can read cookies back out
//! (the CSRF echo requires it).

use std::sync::Arc;
use std::time::Duration;

use kernel::error::app_error::AppResult;
use reqwest::cookie::Jar;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("inkline-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Build the shared client and its cookie jar
pub fn build_client(config: &HttpClientConfig) -> AppResult<(reqwest::Client, Arc<Jar>)> {
    let jar = Arc::new(Jar::default());

    let client = reqwest::Client::builder()
        .cookie_provider(jar.clone())
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()?;

    Ok((client, jar))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("inkline-client/"));
    }

    #[test]
    fn test_build_client() {
        let (client, _jar) = build_client(&HttpClientConfig::default()).unwrap();
        // the client is usable as-is; just make sure construction holds
        let _ = client;
    }
}
