//! Cache Key Registry
//!
//! The centralized list of persisted local-storage keys. Every cached
//! resource the client writes must be registered here so the janitor can
//! purge it; an unregistered key would survive logout.
//!
//! Keys come in two classes:
//! - auth-core: the session's own material (token, cached user record)
//! - derived: caches keyed off browsing activity and UI flags
//!
//! Within both classes, identity-linked keys are the ones that embed who
//! the user is; those are additionally purged when an auth error is seen
//! before expiry is confirmed.

/// Storage class of a cached entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheClass {
    /// Session material, never meaningful across users
    AuthCore,
    /// Browsing caches and UI flags
    Derived,
}

/// Registered persisted keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey {
    /// Cached user record blob
    UserData,
    /// Cached user id
    UserId,
    /// API token
    AuthToken,
    /// CSRF token echo
    CsrfToken,
    /// Tattoo feed cache
    TattoosCache,
    /// Artist directory cache
    ArtistsCache,
    /// Style reference list cache
    StylesCache,
    /// Cached profile photo reference
    ProfilePhoto,
    /// "distance hint dismissed" UI flag
    DistanceDismissed,
    /// Account type chosen during onboarding
    OnboardingUserType,
}

impl CacheKey {
    /// Every registered key, in purge order
    pub const ALL: [CacheKey; 10] = [
        CacheKey::UserData,
        CacheKey::UserId,
        CacheKey::AuthToken,
        CacheKey::CsrfToken,
        CacheKey::TattoosCache,
        CacheKey::ArtistsCache,
        CacheKey::StylesCache,
        CacheKey::ProfilePhoto,
        CacheKey::DistanceDismissed,
        CacheKey::OnboardingUserType,
    ];

    /// Storage key name
    pub const fn name(&self) -> &'static str {
        match self {
            CacheKey::UserData => "user_data",
            CacheKey::UserId => "user_id",
            CacheKey::AuthToken => "auth_token",
            CacheKey::CsrfToken => "csrf_token",
            CacheKey::TattoosCache => "tattoos_cache",
            CacheKey::ArtistsCache => "artists_cache",
            CacheKey::StylesCache => "styles_cache",
            CacheKey::ProfilePhoto => "profile_photo",
            CacheKey::DistanceDismissed => "distance_dismissed",
            CacheKey::OnboardingUserType => "onboarding_user_type",
        }
    }

    /// Storage class
    pub const fn class(&self) -> CacheClass {
        match self {
            CacheKey::UserData | CacheKey::UserId | CacheKey::AuthToken | CacheKey::CsrfToken => {
                CacheClass::AuthCore
            }
            _ => CacheClass::Derived,
        }
    }

    /// Whether the entry embeds the user's identity
    ///
    /// Identity-linked entries must not be trusted once an auth error is
    /// observed; non-identity reference caches may be kept to avoid
    /// refetch churn.
    pub const fn identity_linked(&self) -> bool {
        matches!(
            self,
            CacheKey::UserData | CacheKey::UserId | CacheKey::ProfilePhoto
        )
    }
}
