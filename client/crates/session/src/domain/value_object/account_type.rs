use serde::{Deserialize, Serialize};
use std::fmt;

/// Marketplace account type carried on every user record.
///
/// Clients browse and book; artists publish work and take bookings;
/// studios are artist collectives with a shared book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum AccountType {
    #[default]
    Client = 0,
    Artist = 1,
    Studio = 2,
}

impl AccountType {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use AccountType::*;
        match self {
            Client => "client",
            Artist => "artist",
            Studio => "studio",
        }
    }

    /// Whether this account publishes a portfolio and takes bookings
    #[inline]
    pub const fn is_bookable(&self) -> bool {
        use AccountType::*;
        matches!(self, Artist | Studio)
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use AccountType::*;
        match code {
            "client" => Some(Client),
            "artist" => Some(Artist),
            "studio" => Some(Studio),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
