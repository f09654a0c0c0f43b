//! Field validators
//!
//! Each validator accepts a sanitized value or returns the Slovak message to
//! show the user. Password strength checks are ordered and fail fast: only
//! the first failing rule is reported.

use regex::Regex;
use std::sync::LazyLock;

use super::RegistrationData;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static ISO_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Characters that count as "special" for password strength
const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum number of digits in a birthdate that is not already ISO
const MIN_BIRTHDATE_DIGITS: usize = 6;

type PasswordRule = (fn(&str) -> bool, &'static str);

/// Password rules in reporting order
const PASSWORD_RULES: &[PasswordRule] = &[
    (
        |v| v.chars().count() >= MIN_PASSWORD_LENGTH,
        "Heslo musí mať aspoň 8 znakov.",
    ),
    (
        |v| v.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)),
        "Pridaj aspoň jeden špeciálny znak.",
    ),
    (
        |v| v.chars().any(|c| c.is_ascii_digit()),
        "Pridaj aspoň jedno číslo.",
    ),
    (
        |v| v.chars().any(char::is_uppercase),
        "Pridaj aspoň jedno veľké písmeno.",
    ),
    (
        |v| v.chars().any(char::is_lowercase),
        "Pridaj aspoň jedno malé písmeno.",
    ),
];

/// Require a single `@` and a dotted domain
pub fn validate_email(value: &str) -> Result<(), String> {
    if EMAIL_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err("Email sa mi nezdá platný. Skús ho zopakovať.".to_string())
    }
}

/// Check password strength, reporting only the first failing rule
pub fn validate_password_strength(value: &str) -> Result<(), String> {
    match PASSWORD_RULES.iter().find(|(passes, _)| !passes(value)) {
        Some((_, message)) => Err((*message).to_string()),
        None => Ok(()),
    }
}

/// The confirmation must follow a captured password and match it exactly
pub fn validate_password_confirm(value: &str, data: &RegistrationData) -> Result<(), String> {
    if data.password.is_empty() {
        return Err("Najprv prosím nadiktuj celé heslo.".to_string());
    }
    if value != data.password {
        return Err("Heslá sa nezhodujú, skús to znova.".to_string());
    }
    Ok(())
}

/// Accept ISO dates, or anything carrying at least six digits
pub fn validate_birthdate(value: &str) -> Result<(), String> {
    let normalised = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalised.is_empty() {
        return Err("Nepočul som dátum narodenia. Skús ho zopakovať.".to_string());
    }
    if ISO_DATE_PATTERN.is_match(&normalised) {
        return Ok(());
    }
    let digits = normalised.chars().filter(char::is_ascii_digit).count();
    if digits < MIN_BIRTHDATE_DIGITS {
        return Err("Dátum znie neúplne. Skús povedať napríklad 12. január 1990.".to_string());
    }
    Ok(())
}
