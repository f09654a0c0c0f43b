//! Error types for the voice registration dialogue
//!
//! `RegistrationError` is the user-facing taxonomy: its `Display` output is
//! the Slovak message shown by the host. `EngineError` is what a speech
//! engine reports when it cannot start, and `DialogError` covers rejected
//! control operations on the controller.

use serde::Serialize;

use crate::dialog::DialogPhase;

/// Message surfaced when the pause timer expires without a result
pub const TIMEOUT_MESSAGE: &str = "Nezachytil som nič. Povedz to, prosím, ešte raz.";

/// Failures that can occur while resolving one step of the dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistrationError {
    /// No speech recognition is available on this device
    #[error("Hlasové zadávanie nie je na tomto zariadení dostupné.")]
    CapabilityUnavailable,

    /// The recogniser returned nothing usable after sanitizing
    #[error("{retry_prompt}")]
    EmptyTranscript { retry_prompt: String },

    /// The sanitized value is longer than the step allows
    #[error("Zaznamenaný text je príliš dlhý (max {limit} znakov). Skús to povedať znova.")]
    LengthExceeded { limit: usize },

    /// A field validator rejected the value
    #[error("{message}")]
    ValidationFailed { message: String },

    /// The speech engine reported an error during the session
    #[error("{retry_prompt}")]
    Engine {
        message: String,
        retry_prompt: String,
    },

    /// Nothing was heard before the pause timer fired
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,
}

impl RegistrationError {
    /// Whether the same step can be retried after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RegistrationError::CapabilityUnavailable)
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        RegistrationError::ValidationFailed {
            message: message.into(),
        }
    }
}

/// Errors reported by a speech engine when arming a session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Speech recognition is not available")]
    Unavailable,

    #[error("Failed to start speech recognition: {0}")]
    StartFailed(String),
}

/// Errors returned by controller operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("Cannot {action} from current phase: {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: DialogPhase,
    },

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_capability_error_is_fatal() {
        assert!(!RegistrationError::CapabilityUnavailable.is_recoverable());
        assert!(RegistrationError::Timeout.is_recoverable());
        assert!(RegistrationError::LengthExceeded { limit: 40 }.is_recoverable());
        assert!(RegistrationError::validation("x").is_recoverable());
    }

    #[test]
    fn test_length_message_names_limit() {
        let err = RegistrationError::LengthExceeded { limit: 72 };
        assert_eq!(
            err.to_string(),
            "Zaznamenaný text je príliš dlhý (max 72 znakov). Skús to povedať znova."
        );
    }

    #[test]
    fn test_timeout_message_matches_constant() {
        assert_eq!(RegistrationError::Timeout.to_string(), TIMEOUT_MESSAGE);
    }

    #[test]
    fn test_engine_error_displays_retry_prompt() {
        let err = RegistrationError::Engine {
            message: "network".to_string(),
            retry_prompt: "Skús to znova.".to_string(),
        };
        assert_eq!(err.to_string(), "Skús to znova.");
    }

    #[test]
    fn test_error_serialisation_is_tagged() {
        let json = serde_json::to_value(RegistrationError::LengthExceeded { limit: 50 }).unwrap();
        assert_eq!(json["kind"], "length_exceeded");
        assert_eq!(json["limit"], 50);

        let json = serde_json::to_value(RegistrationError::Timeout).unwrap();
        assert_eq!(json["kind"], "timeout");
    }

    #[test]
    fn test_dialog_error_wraps_registration_error() {
        let err: DialogError = RegistrationError::CapabilityUnavailable.into();
        assert_eq!(
            err.to_string(),
            RegistrationError::CapabilityUnavailable.to_string()
        );
    }
}
