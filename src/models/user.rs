//! User record as returned by the API and kept in local storage.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// User profile shared with the UI for the duration of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Backend user ID (numeric IDs are normalized to strings)
    #[serde(deserialize_with = "deserialize_id")]
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_completed_onboarding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
    /// Timestamps of completed check-ins (ISO 8601)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub check_in_dates: Vec<String>,
    /// Any other fields the backend sends, kept so the record round-trips.
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub extra: Map<String, Value>,
}

/// User preferences.
///
/// The signup form sends a plain list; older records may hold an object,
/// which is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(untagged)]
pub enum UserPreferences {
    List(Vec<String>),
    Other(
        #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, unknown>"))] Value,
    ),
}

impl User {
    /// First word of the user's name, for greetings.
    pub fn display_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("User")
    }

    /// Check whether the user selected a preference.
    pub fn has_preference(&self, preference: &str) -> bool {
        match &self.preferences {
            Some(UserPreferences::List(items)) => items.iter().any(|p| p == preference),
            Some(UserPreferences::Other(Value::Array(items))) => {
                items.iter().any(|p| p.as_str() == Some(preference))
            }
            _ => false,
        }
    }

    /// Validate that the record carries a usable identity.
    pub fn check(&self) -> Result<(), crate::error::ClientError> {
        self.validate()
            .map_err(|e| crate::error::ClientError::InvalidUser(e.to_string()))
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for id, got {}",
            other
        ))),
    }
}
