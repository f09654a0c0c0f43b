//! Built-in speech engines
//!
//! The dialogue does not recognise speech itself. A host either bridges a
//! platform recogniser through [`BridgedEngine`] or, when none exists, uses
//! [`UnavailableEngine`] so the dialogue degrades to its disabled state.

use tokio::sync::mpsc;

use super::{RecognizerSettings, SessionSink, SpeechEngine};
use crate::error::EngineError;

/// Engine for platforms without speech recognition
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

impl SpeechEngine for UnavailableEngine {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self, _settings: &RecognizerSettings, _sink: SessionSink) -> Result<(), EngineError> {
        Err(EngineError::Unavailable)
    }

    fn stop(&mut self) {}

    fn abort(&mut self) {}
}

/// Request sent to the host that owns the real recogniser
#[derive(Debug, Clone)]
pub enum BridgeRequest {
    /// Start recognising; answer through `sink`
    Start {
        settings: RecognizerSettings,
        sink: SessionSink,
    },
    /// Finish the current utterance
    Stop,
    /// Cancel the current utterance
    Abort,
}

/// Engine that forwards every call to a host over a channel.
///
/// The host keeps the [`SessionSink`] from each `Start` request and reports
/// through it, so an answer that arrives late stays bound to its own session.
#[derive(Debug)]
pub struct BridgedEngine {
    available: bool,
    requests: mpsc::UnboundedSender<BridgeRequest>,
}

impl BridgedEngine {
    /// Create the engine and the receiver the host listens on.
    ///
    /// `available` is the host's feature-detection result.
    pub fn new(available: bool) -> (Self, mpsc::UnboundedReceiver<BridgeRequest>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (
            Self {
                available,
                requests,
            },
            rx,
        )
    }

    fn forward(&self, request: BridgeRequest) -> bool {
        self.requests.send(request).is_ok()
    }
}

impl SpeechEngine for BridgedEngine {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&mut self, settings: &RecognizerSettings, sink: SessionSink) -> Result<(), EngineError> {
        if !self.available {
            return Err(EngineError::Unavailable);
        }
        let request = BridgeRequest::Start {
            settings: settings.clone(),
            sink,
        };
        if self.forward(request) {
            Ok(())
        } else {
            Err(EngineError::StartFailed(
                "speech host is no longer listening".to_string(),
            ))
        }
    }

    fn stop(&mut self) {
        if !self.forward(BridgeRequest::Stop) {
            tracing::debug!("Speech host gone, stop request dropped");
        }
    }

    fn abort(&mut self) {
        if !self.forward(BridgeRequest::Abort) {
            tracing::debug!("Speech host gone, abort request dropped");
        }
    }
}
