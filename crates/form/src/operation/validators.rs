//! Validator predicates
//!
//! Every predicate takes the text representation of the working value and
//! answers whether it passes. Messages and field context are attached by
//! the chain.

use std::net::IpAddr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

static NUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("numeric pattern is valid"));

static INT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:0|[1-9][0-9]*)$").expect("int pattern is valid"));

static DECIMAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("decimal pattern is valid")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

/// Date-only layouts accepted by [`is_date`].
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time layouts accepted by [`is_date`].
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

const URL_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

// ============================================================================
// TYPE / FORMAT
// ============================================================================

/// Optional minus sign followed by digits.
pub fn is_numeric(input: &str) -> bool {
    NUMERIC_REGEX.is_match(input)
}

/// An integer without leading zeros.
pub fn is_int(input: &str) -> bool {
    INT_REGEX.is_match(input)
}

/// A signed decimal number with an optional fraction.
pub fn is_decimal(input: &str) -> bool {
    DECIMAL_REGEX.is_match(input)
}

/// Same acceptance as [`is_decimal`].
pub fn is_float(input: &str) -> bool {
    is_decimal(input)
}

/// A calendar date or date-time in one of the common textual layouts.
pub fn is_date(input: &str) -> bool {
    let input = input.trim();
    if input.is_empty() {
        return false;
    }
    DateTime::parse_from_rfc3339(input).is_ok()
        || DateTime::parse_from_rfc2822(input).is_ok()
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(input, fmt).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(input, fmt).is_ok())
}

/// An address of the form `local@domain.tld`.
pub fn is_email(input: &str) -> bool {
    EMAIL_REGEX.is_match(input)
}

/// An absolute http, https or ftp URL with a host.
pub fn is_url(input: &str) -> bool {
    url::Url::parse(input)
        .is_ok_and(|url| URL_SCHEMES.contains(&url.scheme()) && url.host_str().is_some())
}

/// An IPv4 or IPv6 address.
pub fn is_ip(input: &str) -> bool {
    input.parse::<IpAddr>().is_ok()
}

/// One or more ASCII letters.
pub fn is_alpha(input: &str) -> bool {
    !input.is_empty() && input.chars().all(|c| c.is_ascii_alphabetic())
}

/// One or more ASCII letters or digits.
pub fn is_alphanumeric(input: &str) -> bool {
    !input.is_empty() && input.chars().all(|c| c.is_ascii_alphanumeric())
}

/// No uppercase letters.
pub fn is_lowercase(input: &str) -> bool {
    input == input.to_lowercase()
}

/// No lowercase letters.
pub fn is_uppercase(input: &str) -> bool {
    input == input.to_uppercase()
}

// ============================================================================
// CONTENT
// ============================================================================

/// Something other than whitespace.
pub fn not_empty(input: &str) -> bool {
    !input.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("123", true)]
    #[case("-123", true)]
    #[case("0012", true)]
    #[case("1.5", false)]
    #[case("", false)]
    #[case("12a", false)]
    fn numeric(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_numeric(input), expected);
    }

    #[rstest]
    #[case("0", true)]
    #[case("-42", true)]
    #[case("012", false)]
    #[case("4.2", false)]
    #[case("", false)]
    fn int(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_int(input), expected);
    }

    #[rstest]
    #[case("1.5", true)]
    #[case("-0.25", true)]
    #[case(".5", true)]
    #[case("10", true)]
    #[case("1.", true)]
    #[case(".", false)]
    #[case("", false)]
    #[case("1.2.3", false)]
    fn decimal_and_float(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_decimal(input), expected);
        assert_eq!(is_float(input), expected);
    }

    #[rstest]
    #[case("2024-02-29", true)]
    #[case("2024/02/29", true)]
    #[case("02/29/2024", true)]
    #[case("2024-02-29T10:00:00Z", true)]
    #[case("2024-02-29 10:00:00", true)]
    #[case("Thu, 29 Feb 2024 10:00:00 +0000", true)]
    #[case("2023-02-29", false)]
    #[case("yesterday", false)]
    #[case("", false)]
    fn date(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_date(input), expected);
    }

    #[rstest]
    #[case("user@example.com", true)]
    #[case("first.last+tag@sub.example.org", true)]
    #[case("user@localhost", false)]
    #[case("@example.com", false)]
    #[case("user@", false)]
    #[case("invalid", false)]
    fn email(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_email(input), expected);
    }

    #[rstest]
    #[case("http://example.com", true)]
    #[case("https://example.com/path?q=1", true)]
    #[case("ftp://files.example.com", true)]
    #[case("mailto:user@example.com", false)]
    #[case("example.com", false)]
    #[case("", false)]
    fn url(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_url(input), expected);
    }

    #[rstest]
    #[case("127.0.0.1", true)]
    #[case("::1", true)]
    #[case("2001:db8::ff00:42:8329", true)]
    #[case("256.0.0.1", false)]
    #[case("localhost", false)]
    fn ip(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_ip(input), expected);
    }

    #[test]
    fn alpha_and_alphanumeric() {
        assert!(is_alpha("abcXYZ"));
        assert!(!is_alpha("abc1"));
        assert!(!is_alpha(""));
        assert!(is_alphanumeric("abc123"));
        assert!(!is_alphanumeric("abc_123"));
        assert!(!is_alphanumeric(""));
    }

    #[test]
    fn letter_case() {
        assert!(is_lowercase("hello 123"));
        assert!(!is_lowercase("Hello"));
        assert!(is_uppercase("HELLO 123"));
        assert!(!is_uppercase("HeLLO"));
    }

    #[test]
    fn emptiness() {
        assert!(not_empty(" x "));
        assert!(!not_empty(" \t\n"));
        assert!(!not_empty(""));
    }
}
