//! Registration fields and their resolution pipeline
//!
//! Every transcript for a step goes through the same ordered stages:
//!
//! ```text
//! sanitize ──► non-empty ──► length guard ──► validate ──► validate with state
//! ```
//!
//! The first stage that fails short-circuits with its error; the step's
//! value is only committed when every stage passes.

pub mod sanitize;
pub mod steps;
pub mod validate;

pub use steps::{step_flow, STEP_COUNT};

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;

/// One field collected by the dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKey {
    FirstName,
    LastName,
    Email,
    Password,
    PasswordConfirm,
    Birthdate,
}

impl StepKey {
    /// All keys in dialogue order
    pub const ALL: [StepKey; 6] = [
        StepKey::FirstName,
        StepKey::LastName,
        StepKey::Email,
        StepKey::Password,
        StepKey::PasswordConfirm,
        StepKey::Birthdate,
    ];

    /// Wire name of the key, matching its serde form
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKey::FirstName => "firstName",
            StepKey::LastName => "lastName",
            StepKey::Email => "email",
            StepKey::Password => "password",
            StepKey::PasswordConfirm => "passwordConfirm",
            StepKey::Birthdate => "birthdate",
        }
    }

    /// Name of the manual form field a host may mirror this value into.
    ///
    /// Only the fields that are tedious to type by hand are mirrored.
    pub fn form_field_name(&self) -> Option<&'static str> {
        match self {
            StepKey::Password => Some("password"),
            StepKey::PasswordConfirm => Some("password_confirm"),
            StepKey::Birthdate => Some("birthdate"),
            _ => None,
        }
    }

    /// Whether the value must stay out of logs
    pub fn is_secret(&self) -> bool {
        matches!(self, StepKey::Password | StepKey::PasswordConfirm)
    }
}

/// Values collected so far, one per step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub birthdate: String,
}

impl RegistrationData {
    /// Value stored for a key (empty when not yet captured)
    pub fn get(&self, key: StepKey) -> &str {
        match key {
            StepKey::FirstName => &self.first_name,
            StepKey::LastName => &self.last_name,
            StepKey::Email => &self.email,
            StepKey::Password => &self.password,
            StepKey::PasswordConfirm => &self.password_confirm,
            StepKey::Birthdate => &self.birthdate,
        }
    }

    /// Store a value for a key
    pub fn set(&mut self, key: StepKey, value: String) {
        let slot = match key {
            StepKey::FirstName => &mut self.first_name,
            StepKey::LastName => &mut self.last_name,
            StepKey::Email => &mut self.email,
            StepKey::Password => &mut self.password,
            StepKey::PasswordConfirm => &mut self.password_confirm,
            StepKey::Birthdate => &mut self.birthdate,
        };
        *slot = value;
    }

    /// Copy of the data with one value replaced
    pub fn with(&self, key: StepKey, value: String) -> Self {
        let mut next = self.clone();
        next.set(key, value);
        next
    }

    /// Clear every field
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether every field has a value
    pub fn is_complete(&self) -> bool {
        StepKey::ALL.iter().all(|key| !self.get(*key).is_empty())
    }
}

/// Immutable description of one step of the dialogue
#[derive(Debug, Clone)]
pub struct StepConfig {
    pub key: StepKey,
    /// Short label for display ("Meno")
    pub label: &'static str,
    /// Prompt used when the step is first armed
    pub prompt: &'static str,
    /// Prompt used when the step is retried
    pub retry_prompt: &'static str,
    /// Longest accepted sanitized value, in characters
    pub max_length: usize,
    pub sanitize: Option<fn(&str) -> String>,
    pub validate: Option<fn(&str) -> Result<(), String>>,
    pub validate_with_state: Option<fn(&str, &RegistrationData) -> Result<(), String>>,
}

/// One stage of the resolution pipeline
type Stage = fn(&StepConfig, String, &RegistrationData) -> Result<String, RegistrationError>;

/// Stages applied after sanitizing, in order
const STAGES: [Stage; 4] = [
    require_non_empty,
    guard_length,
    run_validator,
    run_state_validator,
];

/// Resolve a raw transcript for `step` against the data captured so far.
///
/// Returns the value to commit, or the first stage error.
pub fn resolve_step(
    step: &StepConfig,
    transcript: &str,
    data: &RegistrationData,
) -> Result<String, RegistrationError> {
    let sanitized = match step.sanitize {
        Some(sanitize) => sanitize(transcript),
        None => transcript.trim().to_string(),
    };
    let value = sanitize::collapse_whitespace(&sanitized);

    STAGES
        .iter()
        .try_fold(value, |value, stage| stage(step, value, data))
}

fn require_non_empty(
    step: &StepConfig,
    value: String,
    _data: &RegistrationData,
) -> Result<String, RegistrationError> {
    if value.is_empty() {
        return Err(RegistrationError::EmptyTranscript {
            retry_prompt: step.retry_prompt.to_string(),
        });
    }
    Ok(value)
}

fn guard_length(
    step: &StepConfig,
    value: String,
    _data: &RegistrationData,
) -> Result<String, RegistrationError> {
    if value.chars().count() > step.max_length {
        return Err(RegistrationError::LengthExceeded {
            limit: step.max_length,
        });
    }
    Ok(value)
}

fn run_validator(
    step: &StepConfig,
    value: String,
    _data: &RegistrationData,
) -> Result<String, RegistrationError> {
    if let Some(validate) = step.validate {
        validate(&value).map_err(RegistrationError::validation)?;
    }
    Ok(value)
}

fn run_state_validator(
    step: &StepConfig,
    value: String,
    data: &RegistrationData,
) -> Result<String, RegistrationError> {
    if let Some(validate) = step.validate_with_state {
        let tentative = data.with(step.key, value.clone());
        validate(&value, &tentative).map_err(RegistrationError::validation)?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(key: StepKey) -> StepConfig {
        step_flow()
            .into_iter()
            .find(|s| s.key == key)
            .expect("step exists")
    }

    #[test]
    fn test_step_key_serialisation_matches_as_str() {
        for key in StepKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn test_form_field_names() {
        assert_eq!(StepKey::Password.form_field_name(), Some("password"));
        assert_eq!(
            StepKey::PasswordConfirm.form_field_name(),
            Some("password_confirm")
        );
        assert_eq!(StepKey::Birthdate.form_field_name(), Some("birthdate"));
        assert_eq!(StepKey::Email.form_field_name(), None);
    }

    #[test]
    fn test_registration_data_set_get_clear() {
        let mut data = RegistrationData::default();
        assert!(!data.is_complete());

        for key in StepKey::ALL {
            data.set(key, format!("value-{}", key.as_str()));
        }
        assert!(data.is_complete());
        assert_eq!(data.get(StepKey::Email), "value-email");

        data.clear();
        assert_eq!(data, RegistrationData::default());
    }

    #[test]
    fn test_registration_data_serialises_camel_case() {
        let json = serde_json::to_value(RegistrationData::default()).unwrap();
        assert!(json.get("passwordConfirm").is_some());
        assert!(json.get("firstName").is_some());
    }

    #[test]
    fn test_resolve_name() {
        let data = RegistrationData::default();
        assert_eq!(
            resolve_step(&step(StepKey::FirstName), "  Ján ", &data).unwrap(),
            "Ján"
        );
    }

    #[test]
    fn test_resolve_empty_after_sanitize() {
        let data = RegistrationData::default();
        let err = resolve_step(&step(StepKey::FirstName), "123 !!", &data).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::EmptyTranscript {
                retry_prompt: step(StepKey::FirstName).retry_prompt.to_string()
            }
        );
    }

    #[test]
    fn test_length_guard_runs_before_validator() {
        let data = RegistrationData::default();
        let long_email = format!("{}@x.sk", "a".repeat(80));
        let err = resolve_step(&step(StepKey::Email), &long_email, &data).unwrap_err();
        assert_eq!(err, RegistrationError::LengthExceeded { limit: 80 });

        // Invalid and too long: the length guard wins
        let err = resolve_step(&step(StepKey::Email), &"b".repeat(81), &data).unwrap_err();
        assert_eq!(err, RegistrationError::LengthExceeded { limit: 80 });
    }

    #[test]
    fn test_validator_failure_is_reported() {
        let data = RegistrationData::default();
        let err = resolve_step(&step(StepKey::Email), "jan at x", &data).unwrap_err();
        assert!(matches!(err, RegistrationError::ValidationFailed { .. }));
    }

    #[test]
    fn test_state_validator_sees_captured_password() {
        let data = RegistrationData {
            password: "Abc5.def".to_string(),
            ..Default::default()
        };
        let confirm = step(StepKey::PasswordConfirm);
        assert_eq!(
            resolve_step(&confirm, "velke a b c cislo pat bodka d e f", &data).unwrap(),
            "Abc5.def"
        );
        assert!(resolve_step(&confirm, "abc", &data).is_err());
    }

    #[test]
    fn test_step_without_sanitizer_is_trimmed_and_collapsed() {
        let plain = StepConfig {
            sanitize: None,
            validate: None,
            validate_with_state: None,
            ..step(StepKey::FirstName)
        };
        let data = RegistrationData::default();
        assert_eq!(resolve_step(&plain, "  a   b ", &data).unwrap(), "a b");
    }
}
