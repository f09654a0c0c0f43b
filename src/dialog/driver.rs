//! Tokio event loop around a [`DialogController`]
//!
//! The driver owns the controller and multiplexes three sources: host
//! commands, engine events and the pause deadline of the live session.

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::controller::DialogController;
use super::observer::DialogObserver;
use super::state::FlowState;
use crate::fields::RegistrationData;
use crate::speech::{SessionEvents, SpeechEngine};

/// Control operations a host can send to a running driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogCommand {
    Start,
    Stop,
    Retry,
    Reset,
    Shutdown,
}

/// The driver has exited and no longer accepts commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Dialogue driver has stopped")]
pub struct DriverClosed;

/// Cloneable handle for sending commands to a [`DialogDriver`]
#[derive(Debug, Clone)]
pub struct DialogHandle {
    tx: mpsc::UnboundedSender<DialogCommand>,
}

impl DialogHandle {
    pub fn send(&self, command: DialogCommand) -> Result<(), DriverClosed> {
        self.tx.send(command).map_err(|_| DriverClosed)
    }

    pub fn start(&self) -> Result<(), DriverClosed> {
        self.send(DialogCommand::Start)
    }

    pub fn stop(&self) -> Result<(), DriverClosed> {
        self.send(DialogCommand::Stop)
    }

    pub fn retry(&self) -> Result<(), DriverClosed> {
        self.send(DialogCommand::Retry)
    }

    pub fn reset(&self) -> Result<(), DriverClosed> {
        self.send(DialogCommand::Reset)
    }

    pub fn shutdown(&self) -> Result<(), DriverClosed> {
        self.send(DialogCommand::Shutdown)
    }
}

/// Final state reported when the driver exits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogOutcome {
    pub completed: bool,
    pub data: RegistrationData,
    pub state: FlowState,
}

/// Runs a controller until shutdown
pub struct DialogDriver<E: SpeechEngine, O: DialogObserver> {
    controller: DialogController<E, O>,
    events: SessionEvents,
    commands: mpsc::UnboundedReceiver<DialogCommand>,
}

impl<E: SpeechEngine, O: DialogObserver> DialogDriver<E, O> {
    /// Wrap a controller and the event receiver it was created with
    pub fn new(controller: DialogController<E, O>, events: SessionEvents) -> (Self, DialogHandle) {
        let (tx, commands) = mpsc::unbounded_channel();
        let driver = Self {
            controller,
            events,
            commands,
        };
        (driver, DialogHandle { tx })
    }

    pub fn controller(&self) -> &DialogController<E, O> {
        &self.controller
    }

    /// Process commands, engine events and timeouts until `Shutdown` arrives
    /// or every handle is dropped. The live session is torn down on exit.
    pub async fn run(mut self) -> DialogOutcome {
        tracing::debug!("Dialogue driver started");

        loop {
            let deadline = self.controller.session_deadline();

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(DialogCommand::Shutdown) | None => break,
                    Some(command) => apply_command(&mut self.controller, command),
                },
                Some(event) = self.events.recv() => {
                    self.controller.handle_session_event(event);
                }
                _ = sleep_until(deadline) => {
                    self.controller.poll_timeout(Instant::now());
                }
            }
        }

        tracing::debug!("Dialogue driver stopped");

        let state = self.controller.state().clone();
        DialogOutcome {
            completed: state.completed,
            data: self.controller.data().clone(),
            state,
        }
    }
}

fn apply_command<E: SpeechEngine, O: DialogObserver>(
    controller: &mut DialogController<E, O>,
    command: DialogCommand,
) {
    let result = match command {
        DialogCommand::Start => controller.start(),
        DialogCommand::Retry => controller.retry(),
        DialogCommand::Stop => {
            controller.stop();
            Ok(())
        }
        DialogCommand::Reset => {
            controller.reset();
            Ok(())
        }
        DialogCommand::Shutdown => Ok(()),
    };

    if let Err(err) = result {
        tracing::warn!("Dialogue command {:?} failed: {}", command, err);
    }
}

/// Wait for the session deadline, or forever when none is armed
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
