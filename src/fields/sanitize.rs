//! Field sanitizers
//!
//! Pure normalisation of a raw transcript into the canonical value for a
//! field. The resolution pipeline collapses whitespace afterwards, so these
//! only need to handle field-specific concerns.

use regex::Regex;
use std::sync::LazyLock;

use crate::parsing::{parse_password_dictation, parse_spoken_date};

/// Anything that is not a letter (incl. accented), apostrophe, hyphen or whitespace
static NAME_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z\u{00C0}-\u{017E}'\s\-]").unwrap());

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Collapse whitespace runs to a single space and trim
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value, " ").trim().to_string()
}

/// Keep letters, apostrophes, hyphens and spaces
pub fn sanitize_name(value: &str) -> String {
    collapse_whitespace(&NAME_DISALLOWED.replace_all(value, ""))
}

/// Remove all whitespace and lowercase
pub fn sanitize_email(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Translate a dictated password into its literal form
pub fn sanitize_password(value: &str) -> String {
    parse_password_dictation(value)
}

/// Turn a spoken or typed birthdate into ISO form where possible
pub fn sanitize_birthdate(value: &str) -> String {
    parse_spoken_date(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name_keeps_accents() {
        assert_eq!(sanitize_name("Ján"), "Ján");
        assert_eq!(sanitize_name("  Mária   Anna "), "Mária Anna");
    }

    #[test]
    fn test_sanitize_name_strips_symbols_and_digits() {
        assert_eq!(sanitize_name("Novák 2."), "Novák");
        assert_eq!(sanitize_name("O'Brien-Kováč!"), "O'Brien-Kováč");
    }

    #[test]
    fn test_sanitize_email() {
        assert_eq!(sanitize_email(" Jan @ X.sk "), "jan@x.sk");
        assert_eq!(sanitize_email("JAN.NOVAK@EXAMPLE.COM"), "jan.novak@example.com");
    }

    #[test]
    fn test_sanitize_password_delegates_to_dictation() {
        assert_eq!(sanitize_password("velke a cislo dva"), "A2");
    }

    #[test]
    fn test_sanitize_birthdate_delegates_to_date_parser() {
        assert_eq!(sanitize_birthdate("12 januara 1990"), "1990-01-12");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace(" a \t b\n c "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
