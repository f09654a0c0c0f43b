//! Speech recognition seam
//!
//! The dialogue drives a single-shot recogniser through the [`SpeechEngine`]
//! trait. Each armed session hands the engine a [`SessionSink`] bound to a
//! generation id; the engine reports its result, error or end through that
//! sink. Events carrying a generation other than the live one are dropped
//! by the [`SessionManager`], so a recogniser that calls back after being
//! stopped can never answer for a later step.

pub mod engines;
pub mod session;

pub use engines::{BridgeRequest, BridgedEngine, UnavailableEngine};
pub use session::{SessionManager, SessionOutcome};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::config::SpeechConfig;
use crate::error::EngineError;

/// Identifies one armed session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

/// Settings applied to the recogniser for every session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerSettings {
    /// BCP 47 locale, e.g. "sk-SK"
    pub locale: String,
    /// Whether partial results are delivered (always false for this dialogue)
    pub interim_results: bool,
    /// Number of alternatives requested per result
    pub max_alternatives: u32,
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            locale: "sk-SK".to_string(),
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

impl From<&SpeechConfig> for RecognizerSettings {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            locale: config.locale.clone(),
            interim_results: config.interim_results,
            max_alternatives: config.max_alternatives,
        }
    }
}

/// A single-shot "recognise once" device
pub trait SpeechEngine {
    /// Whether the device exists on this platform
    fn is_available(&self) -> bool;

    /// Begin recognising one utterance, reporting through `sink`
    fn start(&mut self, settings: &RecognizerSettings, sink: SessionSink)
        -> Result<(), EngineError>;

    /// Ask the device to finish the current utterance
    fn stop(&mut self);

    /// Cancel the current utterance without a result
    fn abort(&mut self);
}

/// What the engine reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEventKind {
    /// Best alternative transcript (empty when the engine had none)
    Result { transcript: String },
    /// The engine failed mid-session
    Error { message: String },
    /// The engine stopped listening
    End,
}

/// An engine callback tagged with the session it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub generation: Generation,
    pub kind: SessionEventKind,
}

/// Channel end on which session events arrive
pub type SessionEvents = mpsc::UnboundedReceiver<SessionEvent>;

/// Callback handle given to the engine for one session.
///
/// Cloneable and `Send`, so platform threads can report back directly.
#[derive(Debug, Clone)]
pub struct SessionSink {
    generation: Generation,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionSink {
    pub(crate) fn new(generation: Generation, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { generation, tx }
    }

    /// Session this sink reports for
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Report a result; only the first alternative is used
    pub fn result<I, S>(&self, alternatives: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let transcript: String = alternatives
            .into_iter()
            .next()
            .map(Into::into)
            .unwrap_or_default();
        self.send(SessionEventKind::Result { transcript });
    }

    /// Report an engine error
    pub fn error(&self, message: impl Into<String>) {
        self.send(SessionEventKind::Error {
            message: message.into(),
        });
    }

    /// Report that the engine stopped listening
    pub fn end(&self) {
        self.send(SessionEventKind::End);
    }

    fn send(&self, kind: SessionEventKind) {
        let event = SessionEvent {
            generation: self.generation,
            kind,
        };
        if self.tx.send(event).is_err() {
            tracing::debug!(
                "Dropping speech event for session {:?}: dialogue is gone",
                self.generation
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_slovak_single_shot() {
        let settings = RecognizerSettings::default();
        assert_eq!(settings.locale, "sk-SK");
        assert!(!settings.interim_results);
        assert_eq!(settings.max_alternatives, 1);
    }

    #[test]
    fn test_sink_uses_first_alternative() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = SessionSink::new(Generation(3), tx);

        sink.result(["Ján", "Jan"]);
        let event = rx.try_recv().unwrap();
        assert_eq!(event.generation, Generation(3));
        assert_eq!(
            event.kind,
            SessionEventKind::Result {
                transcript: "Ján".to_string()
            }
        );
    }

    #[test]
    fn test_sink_result_without_alternatives_is_empty() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = SessionSink::new(Generation(1), tx);

        sink.result(Vec::<String>::new());
        assert_eq!(
            rx.try_recv().unwrap().kind,
            SessionEventKind::Result {
                transcript: String::new()
            }
        );
    }

    #[test]
    fn test_sink_survives_dropped_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = SessionSink::new(Generation(1), tx);
        drop(rx);

        sink.error("network");
        sink.end();
    }
}
