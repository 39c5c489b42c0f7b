//! Timestamp prefix recognition for header-line classification.
//!
//! Two patterns are tried in priority order:
//! 1. `YYYY-MM-DD[ T]HH:MM:SS(.fff)?(Z|±HH:MM)?`
//! 2. `YYYY-MM-DD` alone (time defaults to midnight).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

/// Compiled once per `RecordParser` instance and reused across every line
/// of the file it parses.
pub struct HeaderRecognizer {
    datetime_re: Regex,
    date_only_re: Regex,
}

impl HeaderRecognizer {
    pub fn new() -> Self {
        Self {
            datetime_re: Regex::new(
                r"^(\d{4})-(\d{2})-(\d{2})[ T](\d{2}):(\d{2}):(\d{2})(?:\.(\d{1,9}))?(?:(Z)|([+-]\d{2}):?(\d{2}))?",
            )
            .expect("static pattern compiles"),
            date_only_re: Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("static pattern compiles"),
        }
    }

    /// Returns the parsed timestamp when `line` starts with a recognizable
    /// timestamp prefix, `None` otherwise. The line is a header iff this
    /// returns `Some`, except for the parser's first-line fallback.
    pub fn recognize(&self, line: &str) -> Option<NaiveDateTime> {
        if let Some(caps) = self.datetime_re.captures(line) {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            let hour: u32 = caps[4].parse().ok()?;
            let minute: u32 = caps[5].parse().ok()?;
            let second: u32 = caps[6].parse().ok()?;
            let nanos: u32 = caps
                .get(7)
                .map(|m| pad_nanos(m.as_str()))
                .unwrap_or(0);

            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)?;
            return Some(NaiveDateTime::new(date, time));
        }

        if let Some(caps) = self.date_only_re.captures(line) {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            return Some(date.and_hms_opt(0, 0, 0)?);
        }

        None
    }

}

impl Default for HeaderRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

fn pad_nanos(fraction: &str) -> u32 {
    let mut digits = fraction.to_string();
    while digits.len() < 9 {
        digits.push('0');
    }
    digits.truncate(9);
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_space_separated_datetime() {
        let rec = HeaderRecognizer::new();
        let ts = rec.recognize("2026-01-08 10:15:30 connection opened").unwrap();
        assert_eq!(ts.to_string(), "2026-01-08 10:15:30");
    }

    #[test]
    fn recognizes_t_separated_datetime_with_millis_and_offset() {
        let rec = HeaderRecognizer::new();
        let ts = rec
            .recognize("2026-01-08T10:15:30.250+02:00 connection opened")
            .unwrap();
        assert_eq!(ts.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn recognizes_zulu_suffix() {
        let rec = HeaderRecognizer::new();
        assert!(rec.recognize("2026-01-08T10:15:30Z started").is_some());
    }

    #[test]
    fn recognizes_date_only() {
        let rec = HeaderRecognizer::new();
        let ts = rec.recognize("2026-01-08 daily rollup").unwrap();
        assert_eq!(ts.to_string(), "2026-01-08 00:00:00");
    }

    #[test]
    fn continuation_line_does_not_match() {
        let rec = HeaderRecognizer::new();
        assert!(rec.recognize("    at com.example.Foo.bar(Foo.java:42)").is_none());
    }

    #[test]
    fn invalid_calendar_date_is_not_recognized() {
        let rec = HeaderRecognizer::new();
        assert!(rec.recognize("2026-02-30 10:00:00 bad date").is_none());
    }
}
