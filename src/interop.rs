//! Deserialization helpers for task data written by the browser dashboard.
//!
//! Stored records carry dates either as plain `YYYY-MM-DD` strings or as
//! full ISO timestamps (`2024-03-01T00:00:00.000Z`), and ids either as
//! strings or as numeric millisecond stamps. Serialization always emits the
//! canonical form (`YYYY-MM-DD`, string ids).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, de};

/// Parse a calendar date from either a bare date or a timestamp string. For
/// timestamps the UTC date part is kept.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.naive_utc().date());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|stamp| stamp.date())
}

pub fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{raw}'")))
}

pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date '{raw}'"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(text) => text,
        StringOrNumber::Integer(value) => value.to_string(),
        StringOrNumber::Float(value) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(parse_date("2024-03-01"), expected);
        assert_eq!(parse_date("2024-03-01T00:00:00.000Z"), expected);
        assert_eq!(parse_date("2024-03-01T10:30:00+00:00"), expected);
        assert_eq!(parse_date("2024-03-01T08:15:00"), expected);
        assert_eq!(parse_date("March 1st"), None);
    }
}
