//! Upward events from the dialogue to its host
//!
//! The host learns about committed values and completion only through a
//! [`DialogObserver`]. Prompts, progress and errors are read from the
//! controller's [`FlowState`](super::FlowState) instead.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::fields::{RegistrationData, StepKey};

/// Receives committed step values and the completed registration
pub trait DialogObserver {
    /// A step passed every check and its value was committed
    fn on_step_resolved(&mut self, key: StepKey, value: &str);

    /// Every step is resolved; called once per completed flow
    fn on_complete(&mut self, data: &RegistrationData);
}

/// Observer that ignores every event
impl DialogObserver for () {
    fn on_step_resolved(&mut self, _key: StepKey, _value: &str) {}

    fn on_complete(&mut self, _data: &RegistrationData) {}
}

/// Serialisable form of an upward event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogEvent {
    StepResolved {
        key: StepKey,
        value: String,
        /// Manual form field the host may mirror the value into
        #[serde(skip_serializing_if = "Option::is_none")]
        form_field: Option<&'static str>,
    },
    Completed {
        data: RegistrationData,
    },
}

/// Observer that forwards events over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<DialogEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DialogEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: DialogEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Dialogue event dropped: no host is listening");
        }
    }
}

impl DialogObserver for ChannelObserver {
    fn on_step_resolved(&mut self, key: StepKey, value: &str) {
        self.emit(DialogEvent::StepResolved {
            key,
            value: value.to_string(),
            form_field: key.form_field_name(),
        });
    }

    fn on_complete(&mut self, data: &RegistrationData) {
        self.emit(DialogEvent::Completed { data: data.clone() });
    }
}
