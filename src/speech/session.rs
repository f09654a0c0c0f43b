//! Speech session management
//!
//! Owns the engine and at most one live session. Arming a session always
//! tears down the previous one first, and every terminal event (result,
//! error, end, pause timeout) tears the session down as well, which cancels
//! its pause deadline. A session is identified by its [`Generation`]; events
//! from any other generation are ignored.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::{
    Generation, RecognizerSettings, SessionEvent, SessionEventKind, SessionEvents, SessionSink,
    SpeechEngine,
};
use crate::error::EngineError;

/// Default pause before an unanswered session times out
pub const DEFAULT_PAUSE_TIMEOUT: Duration = Duration::from_secs(7);

/// The session currently armed
#[derive(Debug, Clone, Copy)]
struct LiveSession {
    generation: Generation,
    step_index: usize,
    deadline: Instant,
}

/// How a session ended, as seen by the dialogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The engine recognised an utterance
    Transcript { step_index: usize, transcript: String },
    /// The engine reported an error
    Failed { step_index: usize, message: String },
    /// The engine stopped without a result or an error
    Ended { step_index: usize },
    /// Nothing arrived before the pause deadline
    TimedOut { step_index: usize },
}

impl SessionOutcome {
    /// Step the finished session was armed for
    pub fn step_index(&self) -> usize {
        match self {
            SessionOutcome::Transcript { step_index, .. }
            | SessionOutcome::Failed { step_index, .. }
            | SessionOutcome::Ended { step_index }
            | SessionOutcome::TimedOut { step_index } => *step_index,
        }
    }
}

/// Manages single-shot recognition sessions on one engine
pub struct SessionManager<E: SpeechEngine> {
    engine: E,
    settings: RecognizerSettings,
    pause_timeout: Duration,
    tx: mpsc::UnboundedSender<SessionEvent>,
    last_generation: u64,
    live: Option<LiveSession>,
}

impl<E: SpeechEngine> SessionManager<E> {
    /// Create a manager and the receiver on which engine events arrive
    pub fn new(
        engine: E,
        settings: RecognizerSettings,
        pause_timeout: Duration,
    ) -> (Self, SessionEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let manager = Self {
            engine,
            settings,
            pause_timeout,
            tx,
            last_generation: 0,
            live: None,
        };
        (manager, rx)
    }

    /// Whether the engine exists on this platform
    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    /// The engine, for hosts that need to inspect it
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn pause_timeout(&self) -> Duration {
        self.pause_timeout
    }

    /// Generation of the live session, if any
    pub fn live_generation(&self) -> Option<Generation> {
        self.live.map(|live| live.generation)
    }

    /// Step the live session is armed for, if any
    pub fn live_step(&self) -> Option<usize> {
        self.live.map(|live| live.step_index)
    }

    /// When the live session times out, if one is armed
    pub fn deadline(&self) -> Option<Instant> {
        self.live.map(|live| live.deadline)
    }

    /// Arm a new session for `step_index`, tearing down any previous one
    pub fn arm(&mut self, step_index: usize) -> Result<Generation, EngineError> {
        self.teardown();

        if !self.engine.is_available() {
            return Err(EngineError::Unavailable);
        }

        self.last_generation += 1;
        let generation = Generation(self.last_generation);
        let sink = SessionSink::new(generation, self.tx.clone());

        self.engine.start(&self.settings, sink)?;

        self.live = Some(LiveSession {
            generation,
            step_index,
            deadline: Instant::now() + self.pause_timeout,
        });

        tracing::debug!(
            "Armed speech session {:?} for step {} (locale={}, timeout={:?})",
            generation,
            step_index,
            self.settings.locale,
            self.pause_timeout
        );
        Ok(generation)
    }

    /// Stop the live session, if any. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if let Some(live) = self.live.take() {
            self.engine.stop();
            self.engine.abort();
            tracing::debug!("Tore down speech session {:?}", live.generation);
        }
    }

    /// Match an engine event against the live session.
    ///
    /// Returns `None` for events from sessions that are no longer live.
    pub fn accept(&mut self, event: SessionEvent) -> Option<SessionOutcome> {
        let live = match self.live {
            Some(live) if live.generation == event.generation => live,
            _ => {
                tracing::debug!(
                    "Ignoring event from stale speech session {:?} (live: {:?})",
                    event.generation,
                    self.live_generation()
                );
                return None;
            }
        };

        self.teardown();

        let step_index = live.step_index;
        let outcome = match event.kind {
            SessionEventKind::Result { transcript } => SessionOutcome::Transcript {
                step_index,
                transcript,
            },
            SessionEventKind::Error { message } => {
                tracing::warn!("Speech engine error on step {}: {}", step_index, message);
                SessionOutcome::Failed {
                    step_index,
                    message,
                }
            }
            SessionEventKind::End => SessionOutcome::Ended { step_index },
        };
        Some(outcome)
    }

    /// Time out the live session if its pause deadline has passed
    pub fn check_timeout(&mut self, now: Instant) -> Option<SessionOutcome> {
        let live = self.live?;
        if now < live.deadline {
            return None;
        }

        self.teardown();
        tracing::info!(
            "Speech session {:?} timed out on step {}",
            live.generation,
            live.step_index
        );
        Some(SessionOutcome::TimedOut {
            step_index: live.step_index,
        })
    }
}

impl<E: SpeechEngine> Drop for SessionManager<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}
