use chrono::{DateTime, Utc};
use neurorecall_notifications_config::Language;

/// Coarse relative-age label for a notification timestamp.
///
/// Buckets match what the dropdown shows: under a minute, minutes, hours,
/// then days. Timestamps in the future (clock skew) read as "Just now".
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>, language: Language) -> String {
    let minutes = (now - created_at).num_minutes();

    if minutes < 1 {
        return match language {
            Language::En => "Just now".to_string(),
            Language::Fa => "همین الان".to_string(),
        };
    }
    if minutes < 60 {
        return match language {
            Language::En => format!("{minutes}m ago"),
            Language::Fa => format!("{minutes} دقیقه پیش"),
        };
    }

    let hours = minutes / 60;
    if hours < 24 {
        return match language {
            Language::En => format!("{hours}h ago"),
            Language::Fa => format!("{hours} ساعت پیش"),
        };
    }

    let days = hours / 24;
    match language {
        Language::En => format!("{days}d ago"),
        Language::Fa => format!("{days} روز پیش"),
    }
}
