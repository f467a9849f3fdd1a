//! UTC timestamp formatting for the wire.
//!
//! Every timestamp exchanged with callers uses second precision and a
//! literal `Z` suffix: `YYYY-MM-DDTHH:MM:SSZ`.

use chrono::{DateTime, NaiveDateTime, Utc};

/// `strftime` pattern for wire timestamps.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Render a timestamp in wire format.
pub fn format_utc(at: &DateTime<Utc>) -> String {
    at.format(WIRE_FORMAT).to_string()
}

/// Parse a wire-format timestamp.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, WIRE_FORMAT).map(|naive| naive.and_utc())
}

/// Serde adapter for `DateTime<Utc>` fields in wire format.
pub mod wire {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_utc(at))
    }

    /// Deserialize from `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_utc(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Option<DateTime<Utc>>` fields in wire format.
pub mod wire_option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as a wire timestamp or `null`.
    pub fn serialize<S: Serializer>(
        at: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match at {
            Some(at) => serializer.serialize_some(&super::format_utc(at)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from a wire timestamp or `null`.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| super::parse_utc(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_drops_subseconds() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 18, 5, 7).unwrap()
            + chrono::TimeDelta::milliseconds(450);
        assert_eq!(format_utc(&at), "2025-03-09T18:05:07Z");
    }

    #[test]
    fn test_parse_accepts_wire_format() {
        let at = parse_utc("2025-03-09T18:05:07Z").unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2025, 3, 9, 18, 5, 7).unwrap());
        assert!(parse_utc("2025-03-09 18:05:07").is_err());
    }
}
