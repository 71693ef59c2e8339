use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Who is consulting the oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    /// `YYYY-MM-DD`, optional at onboarding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// What the user is seeking
    pub quest: String,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, birth_date: Option<String>, quest: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birth_date: birth_date.filter(|d| !d.trim().is_empty()),
            quest: quest.into(),
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

/// One oracle answer kept in the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: String,
    pub portal_id: String,
    pub portal_name: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,
    pub response: String,
    /// Journaling field, edited after the reading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Reading {
    pub fn new(
        portal_id: impl Into<String>,
        portal_name: impl Into<String>,
        user_input: Option<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            portal_id: portal_id.into(),
            portal_name: portal_name.into(),
            timestamp: Utc::now().timestamp_millis(),
            user_input,
            response: response.into(),
            notes: None,
        }
    }
}

/// A card or vision saved to the altar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltarItem {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub timestamp: i64,
}

impl AltarItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            image_url,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
