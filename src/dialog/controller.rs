//! The registration dialogue state machine

use tokio::time::Instant;

use super::observer::DialogObserver;
use super::state::{
    DialogPhase, FlowState, FlowStatus, TransitionReason, COMPLETED_PROMPT, PAUSED_PROMPT,
};
use crate::config::SpeechConfig;
use crate::error::{DialogError, EngineError, RegistrationError};
use crate::fields::{resolve_step, step_flow, RegistrationData, StepConfig};
use crate::speech::{
    RecognizerSettings, SessionEvent, SessionEvents, SessionManager, SessionOutcome, SpeechEngine,
};

/// Drives the step flow: arms sessions, resolves transcripts, commits values.
///
/// The controller is synchronous. Engine events arrive on the
/// [`SessionEvents`] receiver returned by [`DialogController::new`] and are
/// fed back through [`handle_session_event`](Self::handle_session_event);
/// the host checks the pause deadline with [`poll_timeout`](Self::poll_timeout).
/// [`DialogDriver`](super::DialogDriver) does both on a tokio runtime.
pub struct DialogController<E: SpeechEngine, O: DialogObserver> {
    steps: Vec<StepConfig>,
    sessions: SessionManager<E>,
    observer: O,
    data: RegistrationData,
    state: FlowState,
    phase: DialogPhase,
}

impl<E: SpeechEngine, O: DialogObserver> DialogController<E, O> {
    /// Create a controller over the standard registration steps
    pub fn new(engine: E, observer: O, config: &SpeechConfig) -> (Self, SessionEvents) {
        Self::with_steps(engine, observer, config, step_flow())
    }

    /// Create a controller over a custom step list
    pub fn with_steps(
        engine: E,
        observer: O,
        config: &SpeechConfig,
        steps: Vec<StepConfig>,
    ) -> (Self, SessionEvents) {
        let (sessions, events) = SessionManager::new(
            engine,
            RecognizerSettings::from(config),
            config.pause_timeout(),
        );
        let controller = Self {
            steps,
            sessions,
            observer,
            data: RegistrationData::default(),
            state: FlowState::default(),
            phase: DialogPhase::Idle,
        };
        (controller, events)
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn data(&self) -> &RegistrationData {
        &self.data
    }

    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn engine(&self) -> &E {
        self.sessions.engine()
    }

    /// Whether speech recognition exists on this platform
    pub fn is_available(&self) -> bool {
        self.sessions.is_available()
    }

    /// Step currently being collected, if the flow is not complete
    pub fn current_step(&self) -> Option<&StepConfig> {
        if self.state.completed {
            return None;
        }
        self.steps.get(self.state.active_step_index)
    }

    /// Fraction of steps resolved, in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.state.completed {
            return 1.0;
        }
        if self.steps.is_empty() {
            return 0.0;
        }
        (self.state.active_step_index as f64 / self.steps.len() as f64).min(1.0)
    }

    /// When the live session times out, if one is armed
    pub fn session_deadline(&self) -> Option<Instant> {
        self.sessions.deadline()
    }

    /// Start (or restart) the dialogue from the first step.
    ///
    /// Clears any captured data. Fails with `CapabilityUnavailable` when the
    /// platform has no recogniser.
    pub fn start(&mut self) -> Result<(), DialogError> {
        self.sessions.teardown();

        if !self.sessions.is_available() {
            return Err(self.disable().into());
        }

        self.data.clear();
        self.state = FlowState {
            flow_active: true,
            ..FlowState::default()
        };

        tracing::info!("Starting voice registration ({} steps)", self.steps.len());

        if self.steps.is_empty() {
            self.complete();
            return Ok(());
        }
        self.listen(0, false, TransitionReason::Started)
    }

    /// Re-arm the current step using its retry prompt
    pub fn retry(&mut self) -> Result<(), DialogError> {
        let step_index = match self.phase {
            DialogPhase::Listening { step } | DialogPhase::AwaitingRetry { step } => step,
            phase => {
                return Err(DialogError::InvalidTransition {
                    action: "retry",
                    phase,
                })
            }
        };

        self.sessions.teardown();
        self.listen(step_index, true, TransitionReason::ManualRetry)
    }

    /// Pause the dialogue, keeping the data captured so far
    pub fn stop(&mut self) {
        self.sessions.teardown();

        if let Some(step) = self.phase.step() {
            self.state.status = FlowStatus::Idle;
            self.state.flow_active = false;
            self.state.prompt = PAUSED_PROMPT.to_string();
            self.set_phase(
                DialogPhase::AwaitingRetry { step },
                TransitionReason::Paused,
            );
        }
    }

    /// Discard everything and return to `Idle`
    pub fn reset(&mut self) {
        self.sessions.teardown();
        self.data.clear();
        self.state = FlowState::default();
        self.set_phase(DialogPhase::Idle, TransitionReason::Reset);
    }

    /// Feed an engine event from the session channel
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        if let Some(outcome) = self.sessions.accept(event) {
            self.apply_outcome(outcome);
        }
    }

    /// Time out the live session if its pause deadline has passed.
    ///
    /// Returns whether a timeout fired.
    pub fn poll_timeout(&mut self, now: Instant) -> bool {
        match self.sessions.check_timeout(now) {
            Some(outcome) => {
                self.apply_outcome(outcome);
                true
            }
            None => false,
        }
    }

    fn apply_outcome(&mut self, outcome: SessionOutcome) {
        let step_index = outcome.step_index();
        if self.phase != (DialogPhase::Listening { step: step_index }) {
            tracing::warn!(
                "Dropping session outcome for step {} in phase {:?}",
                step_index,
                self.phase
            );
            return;
        }

        match outcome {
            SessionOutcome::Transcript { transcript, .. } => {
                self.resolve_transcript(step_index, &transcript)
            }
            SessionOutcome::Failed { message, .. } => {
                let retry_prompt = self.steps[step_index].retry_prompt.to_string();
                self.await_retry(
                    step_index,
                    Some(RegistrationError::Engine {
                        message,
                        retry_prompt,
                    }),
                    TransitionReason::EngineError,
                );
                self.state.status = FlowStatus::Error;
            }
            SessionOutcome::Ended { .. } => {
                self.await_retry(step_index, None, TransitionReason::SessionEnded);
            }
            SessionOutcome::TimedOut { .. } => {
                self.await_retry(
                    step_index,
                    Some(RegistrationError::Timeout),
                    TransitionReason::Timeout,
                );
            }
        }
    }

    fn resolve_transcript(&mut self, step_index: usize, transcript: &str) {
        let step = &self.steps[step_index];
        let key = step.key;

        match resolve_step(step, transcript, &self.data) {
            Ok(value) => self.commit(step_index, value),
            Err(err) => {
                tracing::info!("Rejected value for {}: {}", key.as_str(), err);
                self.await_retry(step_index, Some(err), TransitionReason::ValueRejected);
            }
        }
    }

    fn commit(&mut self, step_index: usize, value: String) {
        let key = self.steps[step_index].key;

        if key.is_secret() {
            tracing::info!(
                "Resolved {} ({} characters)",
                key.as_str(),
                value.chars().count()
            );
        } else {
            tracing::info!("Resolved {}", key.as_str());
            tracing::debug!("Value for {}: {:?}", key.as_str(), value);
        }

        self.data.set(key, value);
        self.state.error = None;
        self.observer.on_step_resolved(key, self.data.get(key));

        let next = step_index + 1;
        self.state.active_step_index = next;

        if next < self.steps.len() {
            if let Err(err) = self.listen(next, false, TransitionReason::StepResolved) {
                tracing::warn!("Could not arm step {}: {}", next, err);
            }
        } else {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.sessions.teardown();
        self.state.status = FlowStatus::Idle;
        self.state.flow_active = false;
        self.state.completed = true;
        self.state.active_step_index = self.steps.len();
        self.state.prompt = COMPLETED_PROMPT.to_string();
        self.set_phase(DialogPhase::Completed, TransitionReason::FlowCompleted);
        self.observer.on_complete(&self.data);
    }

    /// Arm a session for `step_index` and move to `Listening`
    fn listen(
        &mut self,
        step_index: usize,
        retry: bool,
        reason: TransitionReason,
    ) -> Result<(), DialogError> {
        let step = &self.steps[step_index];
        let prompt = if retry { step.retry_prompt } else { step.prompt };
        let retry_prompt = step.retry_prompt;

        self.state.active_step_index = step_index;

        match self.sessions.arm(step_index) {
            Ok(_) => {
                self.state.status = FlowStatus::Listening;
                self.state.flow_active = true;
                self.state.prompt = prompt.to_string();
                self.set_phase(DialogPhase::Listening { step: step_index }, reason);
                Ok(())
            }
            Err(EngineError::Unavailable) => Err(self.disable().into()),
            Err(err @ EngineError::StartFailed(_)) => {
                let error = RegistrationError::Engine {
                    message: err.to_string(),
                    retry_prompt: retry_prompt.to_string(),
                };
                self.await_retry(
                    step_index,
                    Some(error.clone()),
                    TransitionReason::EngineError,
                );
                self.state.status = FlowStatus::Error;
                Err(error.into())
            }
        }
    }

    /// Settle on `step_index` until a driving call re-arms it
    fn await_retry(
        &mut self,
        step_index: usize,
        error: Option<RegistrationError>,
        reason: TransitionReason,
    ) {
        self.sessions.teardown();
        self.state.status = FlowStatus::Idle;
        // Only an engine error keeps the flow active; the host offers a retry.
        self.state.flow_active = matches!(error, Some(RegistrationError::Engine { .. }));

        if let Some(error) = error {
            self.state.prompt = self.steps[step_index].retry_prompt.to_string();
            self.state.error = Some(error);
        }

        self.set_phase(DialogPhase::AwaitingRetry { step: step_index }, reason);
    }

    /// Enter the disabled state for a missing recogniser
    fn disable(&mut self) -> RegistrationError {
        let error = RegistrationError::CapabilityUnavailable;
        self.state.status = FlowStatus::Error;
        self.state.flow_active = false;
        self.state.error = Some(error.clone());
        self.state.prompt = error.to_string();
        self.set_phase(DialogPhase::Idle, TransitionReason::CapabilityMissing);
        error
    }

    fn set_phase(&mut self, phase: DialogPhase, reason: TransitionReason) {
        let previous = self.phase;
        self.phase = phase;
        tracing::info!(
            "Dialog phase transition: {:?} -> {:?} (reason: {:?}): {}",
            previous,
            phase,
            reason,
            phase.description()
        );
    }
}
