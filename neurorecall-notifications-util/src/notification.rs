use chrono::{DateTime, Utc};
use neurorecall_notifications_config::Language;
use serde::{Deserialize, Serialize};

use crate::time_ago::time_ago;
use crate::timestamp::parse_server_timestamp;

/// Separator between the English and Farsi segments of a bilingual message.
pub const BILINGUAL_DELIMITER: &str = " | ";

/// A single admin notification as served by the REST backend.
///
/// `id` is stable across fetches. `created_at` is the server's naive UTC
/// timestamp string; parse it with [`Notification::created_at_utc`] rather
/// than comparing raw strings. Fields beyond the core four describe the
/// test-completion event the notification was raised for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub created_at: String,
    pub is_read: bool,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub test_number: u32,
    #[serde(default)]
    pub attempt_number: u32,
}

impl Notification {
    /// Select the message segment for the given language.
    ///
    /// Bilingual messages carry both segments joined by [`BILINGUAL_DELIMITER`],
    /// English first. A message without the delimiter, or with an empty
    /// secondary segment, is returned whole.
    pub fn message_for(&self, language: Language) -> &str {
        match self.message.split_once(BILINGUAL_DELIMITER) {
            Some((primary, secondary)) => match language {
                Language::En => primary,
                Language::Fa => {
                    if secondary.is_empty() {
                        &self.message
                    } else {
                        secondary
                    }
                }
            },
            None => &self.message,
        }
    }

    /// Parse `created_at` as a UTC instant.
    ///
    /// The backend emits naive `isoformat()` timestamps with no zone suffix;
    /// they are always interpreted as UTC.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        let parsed = parse_server_timestamp(&self.created_at);
        if parsed.is_none() {
            tracing::warn!(
                "Unparseable created_at {:?} on notification {}",
                self.created_at,
                self.id
            );
        }
        parsed
    }

    /// Relative age label for display ("5m ago" and friends).
    ///
    /// `None` when `created_at` cannot be parsed.
    pub fn relative_age(&self, now: DateTime<Utc>, language: Language) -> Option<String> {
        self.created_at_utc()
            .map(|created| time_ago(created, now, language))
    }
}
