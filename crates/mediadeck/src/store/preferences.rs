//! User preferences
//!
//! Nested preference record with per-section partial updates. Every field
//! has a default, so a missing or partial stored value always deserializes.

use serde::{Deserialize, Serialize};

/// Notification preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notifications {
    #[serde(default = "default_true")]
    pub email: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default = "default_true")]
    pub new_articles: bool,
    #[serde(default)]
    pub trending: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            email: true,
            push: false,
            new_articles: true,
            trending: false,
        }
    }
}

/// Content preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// News categories the user follows
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            language: default_language(),
            region: default_region(),
            categories: default_categories(),
        }
    }
}

/// Privacy preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Privacy {
    #[serde(default = "default_true")]
    pub analytics: bool,
    #[serde(default = "default_true")]
    pub personalization: bool,
}

impl Default for Privacy {
    fn default() -> Self {
        Self {
            analytics: true,
            personalization: true,
        }
    }
}

/// The full preference record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default)]
    pub notifications: Notifications,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub privacy: Privacy,
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

fn default_region() -> String {
    "us".to_string()
}

fn default_categories() -> Vec<String> {
    vec!["general".to_string(), "technology".to_string()]
}

// =============================================================================
// PreferencesPatch - partial update
// =============================================================================

/// Partial update for preferences (only specified fields are changed)
///
/// Sections merge independently; within a section only the fields that are
/// `Some` are applied, so patching `content.language` leaves
/// `content.categories` intact.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PreferencesPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<PrivacyPatch>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct NotificationsPatch {
    pub email: Option<bool>,
    pub push: Option<bool>,
    pub new_articles: Option<bool>,
    pub trending: Option<bool>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ContentPatch {
    pub language: Option<String>,
    pub region: Option<String>,
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PrivacyPatch {
    pub analytics: Option<bool>,
    pub personalization: Option<bool>,
}

impl PreferencesPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content language
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.content
            .get_or_insert_with(ContentPatch::default)
            .language = Some(language.into());
        self
    }

    /// Set the content region
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.content.get_or_insert_with(ContentPatch::default).region = Some(region.into());
        self
    }

    /// Replace the followed categories
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.content
            .get_or_insert_with(ContentPatch::default)
            .categories = Some(categories);
        self
    }

    /// Apply this patch to a preference record
    pub fn apply_to(self, prefs: &mut Preferences) {
        if let Some(n) = self.notifications {
            if let Some(email) = n.email {
                prefs.notifications.email = email;
            }
            if let Some(push) = n.push {
                prefs.notifications.push = push;
            }
            if let Some(new_articles) = n.new_articles {
                prefs.notifications.new_articles = new_articles;
            }
            if let Some(trending) = n.trending {
                prefs.notifications.trending = trending;
            }
        }
        if let Some(c) = self.content {
            if let Some(language) = c.language {
                prefs.content.language = language;
            }
            if let Some(region) = c.region {
                prefs.content.region = region;
            }
            if let Some(categories) = c.categories {
                prefs.content.categories = categories;
            }
        }
        if let Some(p) = self.privacy {
            if let Some(analytics) = p.analytics {
                prefs.privacy.analytics = analytics;
            }
            if let Some(personalization) = p.personalization {
                prefs.privacy.personalization = personalization;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert!(prefs.notifications.email);
        assert!(!prefs.notifications.push);
        assert!(prefs.notifications.new_articles);
        assert!(!prefs.notifications.trending);
        assert_eq!(prefs.content.language, "en");
        assert_eq!(prefs.content.region, "us");
        assert_eq!(prefs.content.categories, vec!["general", "technology"]);
        assert!(prefs.privacy.analytics);
        assert!(prefs.privacy.personalization);
    }

    #[test]
    fn test_language_patch_preserves_other_fields() {
        let mut prefs = Preferences::default();
        let before = prefs.clone();

        PreferencesPatch::new().language("es").apply_to(&mut prefs);

        assert_eq!(prefs.content.language, "es");
        assert_eq!(prefs.content.categories, before.content.categories);
        assert_eq!(prefs.content.region, before.content.region);
        assert_eq!(prefs.notifications, before.notifications);
        assert_eq!(prefs.privacy, before.privacy);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut prefs = Preferences::default();
        let before = prefs.clone();

        PreferencesPatch::new().apply_to(&mut prefs);

        assert_eq!(prefs, before);
    }

    #[test]
    fn test_sections_merge_independently() {
        let mut prefs = Preferences::default();

        let patch = PreferencesPatch {
            notifications: Some(NotificationsPatch {
                push: Some(true),
                ..Default::default()
            }),
            privacy: Some(PrivacyPatch {
                analytics: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        patch.apply_to(&mut prefs);

        assert!(prefs.notifications.push);
        assert!(prefs.notifications.email); // untouched
        assert!(!prefs.privacy.analytics);
        assert!(prefs.privacy.personalization); // untouched
        assert_eq!(prefs.content, Content::default());
    }

    #[test]
    fn test_partial_stored_value_fills_defaults() {
        // Only content.language present: everything else defaults
        let prefs: Preferences =
            serde_json::from_str(r#"{"content":{"language":"fr"}}"#).unwrap();
        assert_eq!(prefs.content.language, "fr");
        assert_eq!(prefs.content.categories, vec!["general", "technology"]);
        assert!(prefs.notifications.email);
    }
}
