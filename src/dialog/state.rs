//! Dialogue phases and the flow state shown to the host

use serde::Serialize;

use crate::error::RegistrationError;

/// Prompt shown before the dialogue starts
pub const READY_PROMPT: &str = "Pripravené na spustenie hlasovej registrácie.";

/// Prompt shown after the user pauses the dialogue
pub const PAUSED_PROMPT: &str = "Hlasová registrácia bola pozastavená.";

/// Prompt shown once every step is resolved
pub const COMPLETED_PROMPT: &str = "Ďakujeme, hlasové zadanie je pripravené na odoslanie.";

/// Where the dialogue is in its step flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DialogPhase {
    /// Not started, reset, or blocked by a missing recogniser
    #[default]
    Idle,
    /// A session is armed for `step`
    Listening { step: usize },
    /// `step` needs a driving call (retry) before listening again
    AwaitingRetry { step: usize },
    /// Every step is resolved
    Completed,
}

impl DialogPhase {
    /// Returns a human-readable description of the phase
    pub fn description(&self) -> &'static str {
        match self {
            DialogPhase::Idle => "Waiting for start",
            DialogPhase::Listening { .. } => "Listening for the current field",
            DialogPhase::AwaitingRetry { .. } => "Waiting for a retry",
            DialogPhase::Completed => "Registration complete",
        }
    }

    /// Step the phase refers to, if any
    pub fn step(&self) -> Option<usize> {
        match self {
            DialogPhase::Listening { step } | DialogPhase::AwaitingRetry { step } => Some(*step),
            DialogPhase::Idle | DialogPhase::Completed => None,
        }
    }

    /// Whether a manual retry is meaningful in this phase
    pub fn is_retryable(&self) -> bool {
        self.step().is_some()
    }
}

/// Why the controller changed phase (for logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    Started,
    StepResolved,
    FlowCompleted,
    ValueRejected,
    EngineError,
    SessionEnded,
    Timeout,
    ManualRetry,
    Paused,
    Reset,
    CapabilityMissing,
}

/// Recogniser status as the host should render it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    #[default]
    Idle,
    Listening,
    Error,
}

/// Snapshot of everything the host needs to render the dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowState {
    /// Step being collected; equals the step count once completed
    pub active_step_index: usize,
    pub status: FlowStatus,
    /// Whether the dialogue is running (a session is armed or an engine error awaits retry)
    pub flow_active: bool,
    pub completed: bool,
    /// Last error, shown until the step resolves or the dialogue resets
    pub error: Option<RegistrationError>,
    /// Current prompt for the user
    pub prompt: String,
}

impl Default for FlowState {
    fn default() -> Self {
        Self {
            active_step_index: 0,
            status: FlowStatus::Idle,
            flow_active: false,
            completed: false,
            error: None,
            prompt: READY_PROMPT.to_string(),
        }
    }
}

impl FlowState {
    /// User-facing error message, if any
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Whether the host should offer a retry button
    pub fn can_retry(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(RegistrationError::is_recoverable)
    }

    /// One-line status hint for the user
    pub fn status_hint(&self) -> &'static str {
        match self.status {
            FlowStatus::Listening => "Počúvam... pokojne dokonči vetu.",
            FlowStatus::Error => "Mikrofón nahlásil chybu, spusti krok znova.",
            FlowStatus::Idle if self.flow_active => "Čakáme na tvoju odpoveď.",
            FlowStatus::Idle => "Stlač tlačidlo a začni hovoriť, keď budeš pripravený.",
        }
    }
}
