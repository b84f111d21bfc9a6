//! Error types for the measurement engine and the harness around it.

use thiserror::Error;

/// Errors raised while configuring timers, collecting results or writing reports.
///
/// A panic inside a benchmarked closure is not represented here: it unwinds
/// straight through the timers to whoever called `measure`.
#[derive(Error, Debug)]
pub enum MeasureError {
    /// Invalid combination of timer options, detected before any timed work runs
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A result with this name is already present in the collection
    #[error("Duplicate result name: '{name}'")]
    DuplicateName { name: String },

    /// No benchmark area is registered under this name
    #[error("Unrecognised area '{name}'")]
    UnknownArea { name: String },

    /// Writing a report failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeasureError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, MeasureError>;
