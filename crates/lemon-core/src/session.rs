//! # Session Capability
//!
//! The app's session object is an external collaborator. The menu cache only
//! relies on its shape: a profile stored as a text-keyed mapping, and the
//! three operations below.
//!
//! ```text
//! onboard(profile) ──► profile stored, user counts as onboarded
//! update(profile)  ──► profile replaced
//! logout()         ──► profile cleared, user is back to onboarding
//! ```
//!
//! A user is onboarded exactly when a non-empty profile is stored.

use async_trait::async_trait;
use std::collections::BTreeMap;

/// Profile fields keyed by name (`firstName`, `email`, `newsletter`, ...).
pub type Profile = BTreeMap<String, serde_json::Value>;

/// Returns true if this profile marks a completed onboarding.
pub fn is_onboarded(profile: &Profile) -> bool {
    !profile.is_empty()
}

/// Session capability consumed by presentation code.
///
/// Passed explicitly through constructors; there is no global session.
#[async_trait]
pub trait Session: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the stored profile, if any.
    async fn load(&self) -> Result<Option<Profile>, Self::Error>;

    /// Stores the first profile and completes onboarding.
    async fn onboard(&self, profile: &Profile) -> Result<(), Self::Error>;

    /// Replaces the stored profile.
    async fn update(&self, profile: &Profile) -> Result<(), Self::Error>;

    /// Forgets the profile.
    async fn logout(&self) -> Result<(), Self::Error>;

    /// Whether a non-empty profile is stored.
    async fn is_onboarded(&self) -> Result<bool, Self::Error> {
        Ok(self.load().await?.as_ref().is_some_and(is_onboarded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_profile_is_not_onboarded() {
        assert!(!is_onboarded(&Profile::new()));

        let mut profile = Profile::new();
        profile.insert("firstName".to_string(), json!("Tilly"));
        assert!(is_onboarded(&profile));
    }
}
