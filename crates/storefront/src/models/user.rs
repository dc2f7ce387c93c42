//! User and session models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use beaulytics_core::{Email, SkinProfile, UserId};

/// A storefront user row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Raw questionnaire payload: answers, AI summary, updated_at.
    pub skin_profile: Option<serde_json::Value>,
    /// Cleaned tag list produced by the questionnaire analysis.
    pub skin_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name: full name when set, otherwise the email local part.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.full_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self.email.local_part().to_string(),
        }
    }

    /// Distilled skin profile derived from the stored tags.
    #[must_use]
    pub fn profile(&self) -> Option<SkinProfile> {
        if self.skin_tags.is_empty() {
            None
        } else {
            Some(SkinProfile::from_tags(&self.skin_tags))
        }
    }
}

/// The stored shape of the `skin_profile` jsonb column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSkinProfile {
    /// Question key → selected answer text.
    pub answers: std::collections::BTreeMap<String, String>,
    /// Cleaned one-line AI summary.
    pub summary: String,
    pub updated_at: DateTime<Utc>,
}

/// The session-resident view of a logged-in user.
///
/// Kept deliberately small: everything else is re-read from the database
/// per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
}

impl CurrentUser {
    /// Build the session view from a user row.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            full_name: user.full_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beaulytics_core::SkinType;

    fn user_with(full_name: Option<&str>, tags: &[&str]) -> User {
        User {
            id: UserId::generate(),
            email: Email::parse("tika@example.com").expect("valid email"),
            full_name: full_name.map(String::from),
            avatar_url: None,
            skin_profile: None,
            skin_tags: tags.iter().map(|s| (*s).to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        assert_eq!(user_with(Some("Tika"), &[]).display_name(), "Tika");
        assert_eq!(user_with(None, &[]).display_name(), "tika");
        assert_eq!(user_with(Some("  "), &[]).display_name(), "tika");
    }

    #[test]
    fn test_profile_requires_tags() {
        assert!(user_with(None, &[]).profile().is_none());

        let profile = user_with(None, &["Dry Skin", "Acne Prone"])
            .profile()
            .expect("profile");
        assert_eq!(profile.skin_type, SkinType::Dry);
    }
}
