//! Duration grammar shared by descriptor fields and environment knobs.

use serde::{Deserializer, Serializer};
use std::time::Duration;

/// Parse a duration string. Accepts `500ms`, `30s`, `5m`, `2h`; a bare
/// number means seconds.
pub fn parse_duration(text: &str) -> std::result::Result<Duration, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Empty duration".to_string());
    }

    // "ms" first so it is not misread as an "s" suffix
    let (digits, unit_millis) = if let Some(rest) = text.strip_suffix("ms") {
        (rest, 1u64)
    } else if let Some(rest) = text.strip_suffix('s') {
        (rest, 1_000)
    } else if let Some(rest) = text.strip_suffix('m') {
        (rest, 60 * 1_000)
    } else if let Some(rest) = text.strip_suffix('h') {
        (rest, 60 * 60 * 1_000)
    } else {
        (text, 1_000)
    };

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("Invalid duration: {}", text))?;
    let millis = value
        .checked_mul(unit_millis)
        .ok_or_else(|| format!("Duration out of range: {}", text))?;
    Ok(Duration::from_millis(millis))
}

/// Format a duration using the largest unit that divides it evenly
pub fn format_duration(duration: &Duration) -> String {
    let millis = duration.as_millis() as u64;
    if millis == 0 {
        return "0s".to_string();
    }

    if millis % (60 * 60 * 1_000) == 0 {
        format!("{}h", millis / (60 * 60 * 1_000))
    } else if millis % (60 * 1_000) == 0 {
        format!("{}m", millis / (60 * 1_000))
    } else if millis % 1_000 == 0 {
        format!("{}s", millis / 1_000)
    } else {
        format!("{}ms", millis)
    }
}

/// Deserialize a duration from either a string (`"30s"`) or a bare number
/// of seconds
pub fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct DurationText;

    impl serde::de::Visitor<'_> for DurationText {
        type Value = Duration;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a duration string like \"30s\" or a number of seconds")
        }

        fn visit_u64<E: serde::de::Error>(self, value: u64) -> std::result::Result<Duration, E> {
            Ok(Duration::from_secs(value))
        }

        fn visit_i64<E: serde::de::Error>(self, value: i64) -> std::result::Result<Duration, E> {
            u64::try_from(value)
                .map(Duration::from_secs)
                .map_err(|_| E::custom(format!("Negative duration: {}", value)))
        }

        fn visit_str<E: serde::de::Error>(self, value: &str) -> std::result::Result<Duration, E> {
            parse_duration(value).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(DurationText)
}

/// Serialize a duration as the string form of [`format_duration`]
pub fn serialize_duration<S>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_duration(duration))
}
