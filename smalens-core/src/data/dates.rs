//! Lenient calendar-date coercion.
//!
//! Anything that does not parse maps to `None`, which the cleaner treats as
//! the "invalid" sentinel and drops.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y", "%d %b %Y"];

// `%.f` also matches an absent fractional part.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parses date cells using the built-in formats followed by any extras.
#[derive(Debug, Clone, Default)]
pub struct DateParser {
    extra_formats: Vec<String>,
}

impl DateParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add formats tried after the built-ins, in the order given.
    pub fn with_formats(extra_formats: Vec<String>) -> Self {
        Self { extra_formats }
    }

    pub fn extra_formats(&self) -> &[String] {
        &self.extra_formats
    }

    /// Coerce a cell to a calendar date. Date-times keep only their date part.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Some(d) = parse_compact(s) {
            return Some(d);
        }

        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                return Some(d);
            }
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(dt.date_naive());
            }
        }

        self.extra_formats.iter().find_map(|fmt| {
            NaiveDate::parse_from_str(s, fmt)
                .ok()
                .or_else(|| NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date()))
        })
    }
}

/// `YYYYMMDD`, parsed by hand: `%Y` would swallow all eight digits.
fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// True when chrono can compile `fmt` into format items.
pub fn is_valid_format(fmt: &str) -> bool {
    !fmt.is_empty() && !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn parses_iso_dates() {
        let p = DateParser::new();
        assert_eq!(p.parse("2024-01-02"), ymd(2024, 1, 2));
        assert_eq!(p.parse("  2024-01-02 "), ymd(2024, 1, 2));
    }

    #[test]
    fn parses_datetimes_to_their_date() {
        let p = DateParser::new();
        assert_eq!(p.parse("2024-01-02 00:00:00"), ymd(2024, 1, 2));
        assert_eq!(p.parse("2024-01-02T15:30:00.250"), ymd(2024, 1, 2));
        assert_eq!(p.parse("2024-01-02 09:15"), ymd(2024, 1, 2));
    }

    #[test]
    fn parses_offsets_in_their_own_zone() {
        let p = DateParser::new();
        assert_eq!(p.parse("2024-01-02T23:00:00+05:30"), ymd(2024, 1, 2));
        assert_eq!(p.parse("2024-01-02 00:00:00+05:30"), ymd(2024, 1, 2));
    }

    #[test]
    fn parses_slash_and_named_month_forms() {
        let p = DateParser::new();
        assert_eq!(p.parse("2024/03/04"), ymd(2024, 3, 4));
        // Month first, like most CSV writers.
        assert_eq!(p.parse("03/04/2024"), ymd(2024, 3, 4));
        assert_eq!(p.parse("04-Mar-2024"), ymd(2024, 3, 4));
        assert_eq!(p.parse("20240304"), ymd(2024, 3, 4));
    }

    #[test]
    fn rejects_garbage() {
        let p = DateParser::new();
        assert_eq!(p.parse("not-a-date"), None);
        assert_eq!(p.parse(""), None);
        assert_eq!(p.parse("NaT"), None);
        assert_eq!(p.parse("2024-02-30"), None);
        assert_eq!(p.parse("20241340"), None);
    }

    #[test]
    fn extra_formats_are_tried_last() {
        let p = DateParser::with_formats(vec!["%d.%m.%Y".into()]);
        assert_eq!(p.parse("05.06.2024"), ymd(2024, 6, 5));
        assert_eq!(DateParser::new().parse("05.06.2024"), None);
    }

    #[test]
    fn format_validation() {
        assert!(is_valid_format("%d.%m.%Y"));
        assert!(!is_valid_format("%Q"));
        assert!(!is_valid_format(""));
    }
}
