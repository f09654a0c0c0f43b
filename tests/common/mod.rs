//! Shared test doubles for the dialogue integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use voice_registration::fields::{RegistrationData, StepKey};
use voice_registration::speech::SessionEvents;
use voice_registration::{
    DialogController, DialogObserver, EngineError, RecognizerSettings, SessionSink, SpeechEngine,
};

/// What the scripted engine does when a session is armed
#[derive(Debug, Clone)]
pub enum Reply {
    /// Report this transcript immediately
    Say(String),
    /// Report an engine error immediately
    Fail(String),
    /// End the session without a result
    End,
    /// Stay silent until stopped or timed out
    Silence,
}

pub fn say(transcript: &str) -> Reply {
    Reply::Say(transcript.to_string())
}

/// A call the dialogue made on the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Start { locale: String },
    Stop,
    Abort,
}

#[derive(Default)]
struct Script {
    available: bool,
    replies: VecDeque<Reply>,
    calls: Vec<EngineCall>,
    sinks: Vec<SessionSink>,
}

/// Engine double that plays back a list of replies, one per armed session.
///
/// Clones share the same script, so a test can keep one clone while the
/// controller owns the other. Once the replies run out every session is
/// silent.
#[derive(Clone)]
pub struct ScriptedEngine {
    script: Arc<Mutex<Script>>,
}

impl ScriptedEngine {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                available: true,
                replies: replies.into_iter().collect(),
                ..Default::default()
            })),
        }
    }

    pub fn unavailable() -> Self {
        let engine = Self::new(Vec::new());
        engine.script.lock().available = false;
        engine
    }

    /// Queue more replies
    pub fn push(&self, reply: Reply) {
        self.script.lock().replies.push_back(reply);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.script.lock().calls.clone()
    }

    pub fn starts(&self) -> usize {
        self.script
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, EngineCall::Start { .. }))
            .count()
    }

    /// Sink of the most recently armed session
    pub fn last_sink(&self) -> Option<SessionSink> {
        self.script.lock().sinks.last().cloned()
    }

    /// Sink of the `n`th armed session (0-based)
    pub fn sink(&self, n: usize) -> Option<SessionSink> {
        self.script.lock().sinks.get(n).cloned()
    }
}

impl SpeechEngine for ScriptedEngine {
    fn is_available(&self) -> bool {
        self.script.lock().available
    }

    fn start(&mut self, settings: &RecognizerSettings, sink: SessionSink) -> Result<(), EngineError> {
        let reply = {
            let mut script = self.script.lock();
            script.calls.push(EngineCall::Start {
                locale: settings.locale.clone(),
            });
            script.sinks.push(sink.clone());
            script.replies.pop_front().unwrap_or(Reply::Silence)
        };

        match reply {
            Reply::Say(transcript) => sink.result([transcript]),
            Reply::Fail(message) => sink.error(message),
            Reply::End => sink.end(),
            Reply::Silence => {}
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.script.lock().calls.push(EngineCall::Stop);
    }

    fn abort(&mut self) {
        self.script.lock().calls.push(EngineCall::Abort);
    }
}

/// Observer that records every upward event
#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub resolved: Arc<Mutex<Vec<(StepKey, String)>>>,
    pub completions: Arc<Mutex<Vec<RegistrationData>>>,
}

impl DialogObserver for RecordingObserver {
    fn on_step_resolved(&mut self, key: StepKey, value: &str) {
        self.resolved.lock().push((key, value.to_string()));
    }

    fn on_complete(&mut self, data: &RegistrationData) {
        self.completions.lock().push(data.clone());
    }
}

/// Feed every queued engine event to the controller, including events
/// produced by sessions armed while pumping.
pub fn pump<E: SpeechEngine, O: DialogObserver>(
    controller: &mut DialogController<E, O>,
    events: &mut SessionEvents,
) {
    while let Ok(event) = events.try_recv() {
        controller.handle_session_event(event);
    }
}
