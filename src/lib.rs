//! Voice registration - spoken Slovak sign-up dialogue
//!
//! Collects first name, last name, email, password, password confirmation
//! and birthdate by driving a single-shot speech recogniser one step at a
//! time, translating spoken dates and dictated passwords into literal
//! values and validating each field before moving on.

use anyhow::Context;

pub mod config;
pub mod dialog;
pub mod error;
pub mod fields;
pub mod parsing;
pub mod speech;

pub use config::{default_config_path, Config, LoggingConfig, SpeechConfig};
pub use dialog::{
    ChannelObserver, DialogCommand, DialogController, DialogDriver, DialogEvent, DialogHandle,
    DialogObserver, DialogOutcome, DialogPhase, FlowState, FlowStatus,
};
pub use error::{DialogError, EngineError, RegistrationError};
pub use fields::{RegistrationData, StepConfig, StepKey};
pub use parsing::{parse_password_dictation, parse_spoken_date};
pub use speech::{
    BridgeRequest, BridgedEngine, RecognizerSettings, SessionSink, SpeechEngine,
    UnavailableEngine,
};

/// Format timestamps using the system's local time via chrono
struct LocalTimer;

impl tracing_subscriber::fmt::time::FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. When `config.log_file`
/// is set, output is also appended to that file without ANSI colours.
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    let file_layer = match &config.log_file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_timer(LocalTimer)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_timer(LocalTimer))
        .with(file_layer)
        .try_init()
        .context("Logging is already initialised")?;

    Ok(())
}
