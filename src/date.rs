//! Parses post dates into [`Timestamp`]s and formats them for display. Dates
//! are formatted in the `en-US` short convention (`M/D/YYYY`, e.g. `1/5/2024`
//! for January 5, 2024). Parsing never fails: anything that can't be read as a
//! date becomes [`Timestamp::Invalid`], which displays as [`INVALID_DATE`].

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use std::fmt;

/// The display string for dates which couldn't be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// The result of parsing a date string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timestamp {
    /// A successfully-parsed point in time. The offset is retained so the
    /// calendar date can be displayed as it was written.
    Valid(DateTime<FixedOffset>),

    /// The sentinel for input which isn't a recognized date.
    Invalid,
}

impl Timestamp {
    /// Parses a date string. The following forms are recognized (surrounding
    /// whitespace is ignored):
    ///
    /// * RFC 3339 (`2024-01-05T10:00:00Z`, `2024-01-05T10:00:00+02:00`)
    /// * date-time without an offset, separated by `T` or a space
    ///   (`2024-01-05T10:00:00`, `2024-01-05 10:00:00.250`,
    ///   `2024-01-05 10:00`), read as UTC
    /// * date only (`2024-01-05`), read as midnight UTC. Month and day may
    ///   be unpadded (`2024-1-5`), in date-times as well
    /// * year and month (`2024-01`) or year alone (`2024`), read as the first
    ///   day of the period
    ///
    /// Anything else yields [`Timestamp::Invalid`].
    pub fn parse(input: &str) -> Timestamp {
        match parse_datetime(input.trim()) {
            Some(dt) => Timestamp::Valid(dt),
            None => Timestamp::Invalid,
        }
    }

    /// Returns the parsed date-time, or `None` for [`Timestamp::Invalid`].
    pub fn datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Timestamp::Valid(dt) => Some(dt),
            Timestamp::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Timestamp::Valid(_))
    }
}

impl fmt::Display for Timestamp {
    /// Displays a [`Timestamp`] as an `en-US` short date, or [`INVALID_DATE`]
    /// for the invalid sentinel.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Timestamp::Valid(dt) => {
                write!(f, "{}/{}/{}", dt.month(), dt.day(), dt.year())
            }
            Timestamp::Invalid => f.write_str(INVALID_DATE),
        }
    }
}

/// Formats a date string for display (e.g. `2024-01-05` becomes `1/5/2024`).
/// Unparseable input yields [`INVALID_DATE`].
pub fn format_date(input: &str) -> String {
    Timestamp::parse(input).to_string()
}

fn parse_datetime(input: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt);
    }

    // `%.f` also matches an absent fractional part.
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in &formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(utc(&naive));
        }
    }

    let date = match input.len() {
        4 if is_digits(input) => {
            NaiveDate::parse_from_str(&format!("{}-01-01", input), "%Y-%m-%d")
        }
        7 if input.get(..4).map_or(false, is_digits)
            && input.as_bytes()[4] == b'-' =>
        {
            NaiveDate::parse_from_str(&format!("{}-01", input), "%Y-%m-%d")
        }
        _ => NaiveDate::parse_from_str(input, "%Y-%m-%d"),
    }
    .ok()?;
    Some(utc(&date.and_hms_opt(0, 0, 0)?))
}

fn utc(naive: &NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(naive).into()
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_date_only() {
        assert_eq!("1/5/2024", format_date("2024-01-05"));
        assert_eq!("12/31/1999", format_date("1999-12-31"));
    }

    #[test]
    fn test_format_keeps_written_offset() {
        // 23:30 at -05:00 is already January 6 in UTC, but the date as
        // written is January 5.
        assert_eq!("1/5/2024", format_date("2024-01-05T23:30:00-05:00"));
        assert_eq!("1/5/2024", format_date("2024-01-05T10:00:00Z"));
    }

    #[test]
    fn test_format_without_offset() {
        assert_eq!("3/9/2023", format_date("2023-03-09T08:15:00"));
        assert_eq!("3/9/2023", format_date("2023-03-09T08:15:00.250"));
        assert_eq!("3/9/2023", format_date("2023-03-09T08:15"));
        assert_eq!("1/5/2024", format_date("2024-01-05 10:00:00"));
        assert_eq!("1/5/2024", format_date("2024-01-05 10:00:00.5"));
        assert_eq!("1/5/2024", format_date("2024-01-05 10:00"));
        assert_eq!(
            Timestamp::parse("2024-01-05T10:00:00"),
            Timestamp::parse("2024-01-05 10:00:00")
        );
    }

    #[test]
    fn test_format_partial_dates() {
        assert_eq!("7/1/2021", format_date("2021-07"));
        assert_eq!("1/1/2021", format_date("2021"));
        assert_eq!("1/5/2024", format_date("  2024-01-05\n"));
    }

    #[test]
    fn test_format_unpadded_dates() {
        assert_eq!("1/5/2024", format_date("2024-1-5"));
        assert_eq!(Timestamp::parse("2024-01-05"), Timestamp::parse("2024-1-5"));
        assert_eq!("1/5/2024", format_date("2024-1-5 09:30"));
        // A month alone must be padded.
        assert_eq!(INVALID_DATE, format_date("2024-1"));
    }

    #[test]
    fn test_format_is_deterministic() {
        assert_eq!(format_date("2022-02-14"), format_date("2022-02-14"));
    }

    #[test]
    fn test_format_invalid() {
        let inputs = [
            "",
            "yesterday",
            "2024-13-01",
            "2024-02-30",
            "20x4",
            "202é-01",
            "1/5/2024",
        ];
        for input in &inputs {
            assert_eq!(INVALID_DATE, format_date(input), "input: {:?}", input);
        }
    }

    #[test]
    fn test_parse_orders_instants() {
        let earlier = Timestamp::parse("2024-01-05");
        let later = Timestamp::parse("2024-01-05T00:00:01Z");
        assert!(earlier.datetime() < later.datetime());
        assert!(earlier.is_valid());
        assert!(!Timestamp::parse("nope").is_valid());
        assert_eq!(None, Timestamp::parse("nope").datetime());
    }
}
