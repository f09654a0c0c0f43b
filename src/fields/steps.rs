//! The registration step flow
//!
//! Six steps in a fixed order. Prompts and messages are Slovak; the
//! dialogue is Slovak-only.

use super::sanitize::{sanitize_birthdate, sanitize_email, sanitize_name, sanitize_password};
use super::validate::{
    validate_birthdate, validate_email, validate_password_confirm, validate_password_strength,
};
use super::{StepConfig, StepKey};

/// Number of steps in the registration flow
pub const STEP_COUNT: usize = 6;

/// Registration steps in dialogue order
pub const STEP_FLOW: [StepConfig; STEP_COUNT] = [
    StepConfig {
        key: StepKey::FirstName,
        label: "Meno",
        prompt: "Prosím, povedz svoje meno.",
        retry_prompt: "Nerozumel som menu, skús ho zopakovať.",
        max_length: 40,
        sanitize: Some(sanitize_name),
        validate: None,
        validate_with_state: None,
    },
    StepConfig {
        key: StepKey::LastName,
        label: "Priezvisko",
        prompt: "Teraz povedz svoje priezvisko.",
        retry_prompt: "Nerozumel som priezvisku, povedz ho ešte raz.",
        max_length: 50,
        sanitize: Some(sanitize_name),
        validate: None,
        validate_with_state: None,
    },
    StepConfig {
        key: StepKey::Email,
        label: "Email",
        prompt: "Teraz povedz svoju e-mailovú adresu.",
        retry_prompt: "Emailu som nerozumel, skús ho prosím zopakovať.",
        max_length: 80,
        sanitize: Some(sanitize_email),
        validate: Some(validate_email),
        validate_with_state: None,
    },
    StepConfig {
        key: StepKey::Password,
        label: "Heslo",
        prompt: "Prosím, nadiktuj svoje nové heslo.",
        retry_prompt: "Heslu som nerozumel, skús ho zopakovať.",
        max_length: 72,
        sanitize: Some(sanitize_password),
        validate: Some(validate_password_strength),
        validate_with_state: None,
    },
    StepConfig {
        key: StepKey::PasswordConfirm,
        label: "Potvrdenie hesla",
        prompt: "Potvrď svoje heslo ešte raz.",
        retry_prompt: "Potvrdenie hesla nepasovalo, povedz ho prosím znova.",
        max_length: 72,
        sanitize: Some(sanitize_password),
        validate: None,
        validate_with_state: Some(validate_password_confirm),
    },
    StepConfig {
        key: StepKey::Birthdate,
        label: "Dátum narodenia",
        prompt: "Napokon povedz svoj dátum narodenia.",
        retry_prompt: "Dátumu som nerozumel, skús ho zopakovať.",
        max_length: 60,
        sanitize: Some(sanitize_birthdate),
        validate: Some(validate_birthdate),
        validate_with_state: None,
    },
];

/// Owned copy of the registration flow
pub fn step_flow() -> Vec<StepConfig> {
    STEP_FLOW.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_covers_every_key_once_in_order() {
        let keys: Vec<StepKey> = STEP_FLOW.iter().map(|s| s.key).collect();
        assert_eq!(keys, StepKey::ALL.to_vec());
    }

    #[test]
    fn test_max_lengths() {
        let limits: Vec<usize> = STEP_FLOW.iter().map(|s| s.max_length).collect();
        assert_eq!(limits, vec![40, 50, 80, 72, 72, 60]);
    }

    #[test]
    fn test_prompts_differ_from_retry_prompts() {
        for step in &STEP_FLOW {
            assert_ne!(step.prompt, step.retry_prompt, "{:?}", step.key);
        }
    }
}
