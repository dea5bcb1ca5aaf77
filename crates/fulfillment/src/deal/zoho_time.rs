//! Serde helpers for the CRM's `yyyy-MM-ddTHH:mm:ss` datetime format.
//!
//! The CRM rejects RFC 3339 strings with fractional seconds or a trailing
//! `Z`, so deal timestamps are always written in this reduced form (UTC).
//! Reading also accepts RFC 3339 for values coming back from other systems.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

/// Datetime format accepted by the CRM.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a CRM datetime, falling back to RFC 3339.
///
/// # Errors
///
/// Returns the chrono parse error if neither format matches.
pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, FORMAT)
        .map(|naive| naive.and_utc())
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)))
}

/// Format a datetime for the CRM.
#[must_use]
pub fn format(value: &DateTime<Utc>) -> String {
    value.format(FORMAT).to_string()
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(D::Error::custom)
}

/// Same format for optional fields; `None` serializes as `null`.
pub mod option {
    use super::{DateTime, Deserialize, Deserializer, Serializer, Utc, format, parse};
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&format(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw))
            .transpose()
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_drops_fraction_and_zone() {
        let dt = Utc
            .with_ymd_and_hms(2025, 3, 9, 14, 5, 7)
            .unwrap()
            .checked_add_signed(chrono::TimeDelta::milliseconds(250))
            .unwrap();
        assert_eq!(format(&dt), "2025-03-09T14:05:07");
    }

    #[test]
    fn test_parse_accepts_both_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(parse("2025-03-09T14:05:07").unwrap(), expected);
        assert_eq!(parse("2025-03-09T14:05:07Z").unwrap(), expected);
        assert_eq!(parse("2025-03-09T09:05:07-05:00").unwrap(), expected);
        assert!(parse("03/09/2025").is_err());
    }
}
