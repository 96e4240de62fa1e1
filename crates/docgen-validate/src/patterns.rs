//! Precompiled regex patterns, built once per process rather than per call.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// RFC-5322-lite: good enough to catch the overwhelming majority of
    /// malformed addresses without chasing the full grammar.
    pub static ref EMAIL: Regex =
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .expect("EMAIL regex is a valid literal");

    pub static ref DATE_YYYY_MM: Regex =
        Regex::new(r"^\d{4}-\d{2}$").expect("DATE_YYYY_MM regex is a valid literal");

    pub static ref DATE_YYYY_MM_DD: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("DATE_YYYY_MM_DD regex is a valid literal");

    pub static ref DATE_MM_YYYY: Regex =
        Regex::new(r"^\d{2}-\d{4}$").expect("DATE_MM_YYYY regex is a valid literal");

    pub static ref DATE_MM_DD_YYYY: Regex =
        Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("DATE_MM_DD_YYYY regex is a valid literal");

    pub static ref HAS_SCHEME: Regex =
        Regex::new(r"^https?://").expect("HAS_SCHEME regex is a valid literal");
}

/// Checks whether `s` matches one of the four accepted date shapes, the
/// empty string, or the case-insensitive literal `Present`.
pub fn is_valid_date_shape(s: &str) -> bool {
    if s.is_empty() || s.eq_ignore_ascii_case("present") {
        return true;
    }
    DATE_YYYY_MM.is_match(s)
        || DATE_YYYY_MM_DD.is_match(s)
        || DATE_MM_YYYY.is_match(s)
        || DATE_MM_DD_YYYY.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_documented_date_shapes() {
        for s in ["2020-01", "2020-01-15", "01-2020", "01-15-2020", "", "Present", "present"] {
            assert!(is_valid_date_shape(s), "expected {s:?} to be valid");
        }
    }

    #[test]
    fn rejects_garbage_dates() {
        for s in ["not-a-date", "2020/01", "Jan 2020"] {
            assert!(!is_valid_date_shape(s), "expected {s:?} to be invalid");
        }
    }

    #[test]
    fn email_regex_accepts_common_forms() {
        assert!(EMAIL.is_match("a.b+tag@example.co"));
        assert!(!EMAIL.is_match("not-an-email"));
        assert!(!EMAIL.is_match("missing@"));
    }
}
