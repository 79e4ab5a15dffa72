use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a backend timestamp string as a UTC instant.
///
/// The backend stores `datetime.utcnow()` and serializes it with
/// `isoformat()`, so the wire format is a naive ISO 8601 timestamp with no
/// zone suffix. The policy here is to always interpret such timestamps as
/// UTC. Timestamps that do carry an explicit offset are honored as written.
pub fn parse_server_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Some(aware.with_timezone(&Utc));
    }

    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}
