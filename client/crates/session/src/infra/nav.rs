//! Navigation Sink for Non-UI Hosts
//!
//! Hosts without a routing surface (CLI, headless jobs) still need a
//! `Navigator`; this one records the requested path and logs it.

use std::sync::Mutex;

use crate::domain::gateway::Navigator;

/// Navigator that only tracks and logs
#[derive(Debug)]
pub struct LoggingNavigator {
    current: Mutex<String>,
}

impl LoggingNavigator {
    pub fn new() -> Self {
        Self {
            current: Mutex::new("/".to_string()),
        }
    }
}

impl Default for LoggingNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for LoggingNavigator {
    fn current_path(&self) -> String {
        match self.current.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn replace(&self, path: &str) {
        match self.current.lock() {
            Ok(mut guard) => *guard = path.to_string(),
            Err(poisoned) => *poisoned.into_inner() = path.to_string(),
        }
        tracing::info!(path = %path, "Navigation requested");
    }
}
