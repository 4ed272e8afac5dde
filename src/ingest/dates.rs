// src/ingest/dates.rs
//! Lenient timestamp parsing for feed dates. Naive values are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %Hh%M",
    "%a, %d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
    "%d %b %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y"];

/// Parse a date string in any of the shapes feeds use in practice and normalise
/// it to UTC. Returns `None` when nothing matches.
pub fn parse_lenient_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let naive_candidates = [s, strip_zone_name(s)];
    for candidate in naive_candidates {
        for fmt in NAIVE_FORMATS {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(candidate, fmt) {
                return Some(ndt.and_utc());
            }
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
        }
    }

    None
}

/// "Tue, 14 May 2024 10:30:00 BRT" → "Tue, 14 May 2024 10:30:00".
/// Unknown zone abbreviations are dropped and the remainder read as UTC.
fn strip_zone_name(s: &str) -> &str {
    match s.rsplit_once(' ') {
        Some((head, tail)) if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_alphabetic()) => {
            head.trim_end()
        }
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn rfc2822_with_offset() {
        assert_eq!(
            parse_lenient_datetime("Tue, 14 May 2024 10:30:00 -0300"),
            Some(utc(2024, 5, 14, 13, 30))
        );
        assert_eq!(
            parse_lenient_datetime("Tue, 14 May 2024 10:30:00 GMT"),
            Some(utc(2024, 5, 14, 10, 30))
        );
    }

    #[test]
    fn rfc3339_and_iso_variants() {
        assert_eq!(
            parse_lenient_datetime("2024-05-14T10:30:00Z"),
            Some(utc(2024, 5, 14, 10, 30))
        );
        assert_eq!(
            parse_lenient_datetime("2024-05-14T10:30:00.123-03:00"),
            Some(
                utc(2024, 5, 14, 13, 30) + chrono::Duration::milliseconds(123)
            )
        );
        assert_eq!(
            parse_lenient_datetime("2024-05-14 10:30:00-0300"),
            Some(utc(2024, 5, 14, 13, 30))
        );
    }

    #[test]
    fn naive_values_are_utc() {
        assert_eq!(
            parse_lenient_datetime("2024-05-14T10:30:00"),
            Some(utc(2024, 5, 14, 10, 30))
        );
        assert_eq!(
            parse_lenient_datetime("2024-05-14 10:30"),
            Some(utc(2024, 5, 14, 10, 30))
        );
        assert_eq!(
            parse_lenient_datetime("14/05/2024 10:30"),
            Some(utc(2024, 5, 14, 10, 30))
        );
        assert_eq!(
            parse_lenient_datetime(" 2024-05-14 "),
            Some(utc(2024, 5, 14, 0, 0))
        );
    }

    #[test]
    fn unknown_zone_name_is_dropped() {
        assert_eq!(
            parse_lenient_datetime("Tue, 14 May 2024 10:30:00 BRT"),
            Some(utc(2024, 5, 14, 10, 30))
        );
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_lenient_datetime(""), None);
        assert_eq!(parse_lenient_datetime("ontem à tarde"), None);
        assert_eq!(parse_lenient_datetime("2024-13-45"), None);
    }
}
