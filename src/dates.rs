//! Lenient interpretation of stored date text
//!
//! Article and comment dates are kept exactly as crawled. These helpers turn
//! the common forms into UTC timestamps without touching the stored text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{ArchiveError, Result};

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];
const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a crawled date string into a UTC timestamp
///
/// Accepted forms, tried in order:
/// - RFC 2822 / RFC 5322 (`Tue, 1 Mar 2016 10:15:00 +0530`), `GMT` allowed
/// - RFC 3339 (`2016-03-01T10:15:00+05:30`)
/// - `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD HH:MM`, read as UTC
/// - `YYYY-MM-DD`, read as midnight UTC
///
/// # Examples
///
/// ```
/// use news_archive::dates::parse_date;
///
/// let a = parse_date("Tue, 1 Mar 2016 10:15:00 GMT").unwrap();
/// let b = parse_date("2016-03-01 10:15").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_date("last tuesday").is_err());
/// ```
pub fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Some sources write "GMT" instead of "+0000"
    if date_str.contains("GMT") {
        let normalized = date_str.replace("GMT", "+0000");
        if let Ok(dt) = DateTime::parse_from_rfc2822(&normalized) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc());
        }
    }

    if let Some(dt) = NaiveDate::parse_from_str(date_str, NAIVE_DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt.and_utc());
    }

    Err(ArchiveError::InvalidValue {
        field: "date",
        value: date_str.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc2822() {
        let dt = parse_date("Tue, 1 Mar 2016 10:15:00 +0530").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2016, 3, 1, 4, 45, 0).unwrap());
    }

    #[test]
    fn test_parse_gmt_suffix() {
        let dt = parse_date("Tue, 1 Mar 2016 10:15:00 GMT").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2016, 3, 1, 10, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_date("2016-03-01T10:15:00+05:30").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2016, 3, 1, 4, 45, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2016, 3, 1, 10, 15, 0).unwrap();
        assert_eq!(parse_date("2016-03-01 10:15:00").unwrap(), expected);
        assert_eq!(parse_date("2016-03-01 10:15").unwrap(), expected);
        assert_eq!(
            parse_date(" 2016-03-01 ").unwrap(),
            Utc.with_ymd_and_hms(2016, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = parse_date("01/03/2016").unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidValue { field: "date", .. }));
        assert!(parse_date("").is_err());
        assert!(parse_date("2016-13-01").is_err());
    }
}
