//! Application Configuration
//!
//! Configuration for the session application layer.

/// Route targets the session layer navigates to
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Unauthenticated landing route
    pub sign_in: String,
    /// Default signed-in landing route
    pub home: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            sign_in: "/login".to_string(),
            home: "/".to_string(),
        }
    }
}

/// Session application configuration
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Navigation targets
    pub routes: RouteConfig,
}

impl SessionConfig {
    /// Override the unauthenticated landing route
    pub fn with_sign_in_route(mut self, route: impl Into<String>) -> Self {
        self.routes.sign_in = route.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.routes.sign_in, "/login");
        assert_eq!(config.routes.home, "/");
    }

    #[test]
    fn test_route_override() {
        let config = SessionConfig::default().with_sign_in_route("/welcome");
        assert_eq!(config.routes.sign_in, "/welcome");
    }
}
