//! Voice registration dialogue
//!
//! Collects the six registration fields by arming one speech session per
//! step, resolving each transcript through the field pipeline and committing
//! the value before moving on.
//!
//! ## Phases
//!
//! 1. **IDLE** - Not started, reset, or no recogniser on this platform
//! 2. **LISTENING(i)** - A session is armed for step `i`
//! 3. **AWAITING_RETRY(i)** - Step `i` failed, timed out or was paused
//! 4. **COMPLETED** - Every field is resolved
//!
//! ## Phase Transitions
//!
//! ```text
//!                         resolved (i < last): arm i+1
//!                        ┌──────────────────────┐
//!                        │                      │
//!                        ▼                      │
//! ┌──────┐  start  ┌──────────────┐  resolved   │     ┌───────────┐
//! │ IDLE │────────►│ LISTENING(i) │─────────────┴────►│ COMPLETED │
//! └──────┘         └──────────────┘   (i = last)      └───────────┘
//!    ▲                 │      ▲
//!    │   rejected /    │      │ retry
//!    │   error / end / │      │
//!    │   timeout / stop▼      │
//!    │           ┌──────────────────┐
//!    │   reset   │ AWAITING_RETRY(i)│
//!    │◄──────────└──────────────────┘
//! ```
//!
//! `reset` returns to IDLE from any phase; `start` restarts from any phase.
//!
//! ## Events
//!
//! The host is told about committed values and completion through a
//! [`DialogObserver`]; [`ChannelObserver`] turns them into [`DialogEvent`]s.
//! Everything else (prompt, progress, errors) is read from [`FlowState`].

pub mod controller;
pub mod driver;
pub mod observer;
pub mod state;

pub use controller::DialogController;
pub use driver::{DialogCommand, DialogDriver, DialogHandle, DialogOutcome, DriverClosed};
pub use observer::{ChannelObserver, DialogEvent, DialogObserver};
pub use state::{
    DialogPhase, FlowState, FlowStatus, TransitionReason, COMPLETED_PROMPT, PAUSED_PROMPT,
    READY_PROMPT,
};
