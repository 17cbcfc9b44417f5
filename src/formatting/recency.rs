use chrono::{DateTime, Utc};

use crate::core::Recency;

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;

/// Coarse age of `past` relative to `now`.
///
/// Buckets: under a minute is "just now", then whole minutes, hours, and
/// days, always floored. A `past` later than `now` is clamped to "just now".
pub fn age_label(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(past).num_seconds();
    match seconds {
        s if s < MINUTE => "just now".to_string(),
        s if s < HOUR => format!("{} minutes ago", s / MINUTE),
        s if s < DAY => format!("{} hours ago", s / HOUR),
        s => format!("{} days ago", s / DAY),
    }
}

/// Age label for a record's recency marker. Pre-rendered labels from the
/// feed are shown as given.
pub fn recency_label(recency: &Recency, now: DateTime<Utc>) -> String {
    match recency {
        Recency::Timestamp(ts) => age_label(*ts, now),
        Recency::Relative(label) => label.clone(),
    }
}

/// `Oct 18, 2026, 02:30 PM`
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y, %I:%M %p").to_string()
}
