//! Conditional GET support
//!
//! `Last-Modified` generation and `If-Modified-Since` evaluation.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::SystemTime;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date header value
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whether a 304 should be sent instead of the file
///
/// `If-None-Match` takes precedence; when present the date is ignored.
/// Unparseable dates never match.
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    // Header dates carry whole seconds only
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(format_http_date(at(784_111_777)), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_parse_roundtrip() {
        let parsed = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_not_modified() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(is_not_modified(Some(header), false, at(784_111_777)));
        assert!(is_not_modified(Some(header), false, at(784_111_700)));
        assert!(!is_not_modified(Some(header), false, at(784_111_778)));
    }

    #[test]
    fn test_subsecond_mtime_is_truncated() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        let modified = at(784_111_777) + Duration::from_millis(600);
        assert!(is_not_modified(Some(header), false, modified));
    }

    #[test]
    fn test_if_none_match_wins() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(!is_not_modified(Some(header), true, at(0)));
        assert!(!is_not_modified(None, false, at(0)));
        assert!(!is_not_modified(Some("garbage"), false, at(0)));
    }
}
