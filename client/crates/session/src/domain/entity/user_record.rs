//! User Record Entity
//!
//! The authenticated user's profile as the API reports it. The record is
//! replaced wholesale on every refresh; the session layer never patches
//! individual fields (profile edits go through their own API round trip).

use chrono::{DateTime, Utc};
use kernel::id::{Id, markers};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{account_type::AccountType, email::Email, handle::Handle};

/// Typed identifier for users
pub type UserId = Id<markers::User>;

/// Authenticated user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// API identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Account email
    pub email: Email,
    /// Public username
    pub username: Handle,
    /// URL slug for the public profile page
    pub slug: String,
    /// Account type (client, artist, studio)
    pub account_type: AccountType,
    /// Profile bio
    pub bio: Option<String>,
    /// Free-form location string
    pub location: Option<String>,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Whether this user publishes a bookable portfolio
    pub fn is_bookable(&self) -> bool {
        self.account_type.is_bookable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserRecord {
        UserRecord {
            id: UserId::from_raw(7),
            name: "Nora Nielsen".to_string(),
            email: Email::new("nora@example.com").unwrap(),
            username: Handle::new("needle.nora").unwrap(),
            slug: "nora-nielsen".to_string(),
            account_type: AccountType::Artist,
            bio: Some("Fine line and botanical work".to_string()),
            location: Some("Copenhagen".to_string()),
            avatar_url: None,
            created_at: "2024-05-01T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_serde_camel_case() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains(r#""accountType":"artist""#));
        assert!(json.contains(r#""avatarUrl":null"#));

        let back: UserRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_bookable() {
        assert!(sample().is_bookable());
    }
}
