//! Field validation for request bodies.
//!
//! Request models expose a `validate` method that feeds a [`Validator`]. All failures are
//! collected and returned together as [`Error::Validation`], which renders as
//! `{"error": "Invalid data", "details": [{"field", "message"}]}` with status 400.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use url::Url;

use crate::errors::{Error, FieldError, Result};

/// Collects field errors for a single request.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Character-count bounds (inclusive).
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            self.errors
                .push(FieldError::new(field, format!("Must be at least {min} characters")));
        } else if len > max {
            self.errors
                .push(FieldError::new(field, format!("Must be at most {max} characters")));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(is_valid_email(value), field, "Invalid email address")
    }

    pub fn url(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(is_valid_url(value), field, "Invalid URL")
    }

    pub fn range(&mut self, field: &str, value: i32, min: i32, max: i32) -> &mut Self {
        self.check(
            (min..=max).contains(&value),
            field,
            format!("Must be between {min} and {max}"),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert the collected errors into a result.
    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { details: self.errors })
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date as midnight UTC.
pub fn parse_datetime(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date '{value}', expected RFC 3339 or YYYY-MM-DD"))
}

/// Deserialize an optional date where `null` and `""` both mean "no date".
pub fn blank_as_none_datetime<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_datetime(s).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Tri-state date for partial updates, used with `#[serde(default)]`:
/// absent leaves the column unchanged, `null` or `""` clears it, a value sets it.
pub fn nullable_datetime<'de, D>(deserializer: D) -> std::result::Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    blank_as_none_datetime(deserializer).map(Some)
}

/// Interpret a query-string enum filter. Absent, `ALL` and unknown values mean "no filter".
pub fn enum_filter<T: DeserializeOwned>(raw: Option<&str>) -> Option<T> {
    match raw.map(str::trim) {
        None | Some("") | Some("ALL") => None,
        Some(value) => serde_json::from_value(serde_json::Value::String(value.to_string())).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::projects::ProjectStatus;

    #[test]
    fn collects_every_failure() {
        let mut v = Validator::new();
        v.length("title", "ab", 3, 200)
            .email("email", "not-an-email")
            .range("progress", 101, 0, 100);

        match v.finish() {
            Err(Error::Validation { details }) => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["title", "email", "progress"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut v = Validator::new();
        v.length("name", "Ñú", 2, 2);
        assert!(v.is_empty());
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana @example.com"));
        assert!(!is_valid_email("ana@@example.com"));
    }

    #[test]
    fn url_requires_http_scheme() {
        assert!(is_valid_url("https://res.example.com/img/1.jpg"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("not a url"));
    }

    #[test]
    fn dates_accept_rfc3339_and_plain_dates() {
        let dt = parse_datetime("2025-03-01T10:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-01T10:30:00+00:00");

        let dt = parse_datetime("2025-03-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-01T00:00:00+00:00");

        assert!(parse_datetime("01/03/2025").is_err());
    }

    #[test]
    fn enum_filter_ignores_all_and_unknown() {
        assert_eq!(enum_filter::<ProjectStatus>(Some("COMPLETED")), Some(ProjectStatus::Completed));
        assert_eq!(enum_filter::<ProjectStatus>(Some("ALL")), None);
        assert_eq!(enum_filter::<ProjectStatus>(Some("bogus")), None);
        assert_eq!(enum_filter::<ProjectStatus>(None), None);
    }
}
