//! Error types for the dialer core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for dialer operations
pub type DialerResult<T> = Result<T, DialerError>;

/// Errors that can occur in the dialer core
///
/// None of these are fatal. Each one is handled where it is detected and,
/// when the user needs to know about it, surfaced as a [`Notice`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DialerError {
    /// A call was requested while the number buffer was empty
    #[error("No number to call")]
    EmptyNumber,

    /// The platform has no telephony facility to hand the number to
    #[error("Dialing is not supported on this device: {number}")]
    DialUnsupported { number: String },

    /// The platform telephony facility rejected or failed the hand-off
    #[error("Failed to dial {number}: {reason}")]
    DialFailed { number: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The controller task is no longer running
    #[error("Dialer has shut down")]
    ShutDown,
}

impl DialerError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a dial failure error
    pub fn dial_failed(number: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DialFailed {
            number: number.into(),
            reason: reason.into(),
        }
    }

    /// User-facing notice for this error, if the user should see one
    pub fn notice(&self) -> Option<Notice> {
        match self {
            DialerError::EmptyNumber => Some(Notice::blocking(
                "No Number",
                "Please enter a phone number to call.",
            )),
            DialerError::DialUnsupported { .. } => Some(Notice::informational(
                "Dialing Unavailable",
                "This device cannot place phone calls.",
            )),
            DialerError::DialFailed { reason, .. } => Some(Notice::informational(
                "Call Failed",
                format!("Error making call: {}", reason),
            )),
            DialerError::Configuration { .. } | DialerError::ShutDown => None,
        }
    }
}

/// How strongly a notice interrupts the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    /// Must be dismissed before continuing (alert dialog)
    Blocking,
    /// Shown without interrupting the current screen
    Informational,
}

/// A message the rendering layer shows to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn blocking(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Blocking,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn informational(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Informational,
            title: title.into(),
            message: message.into(),
        }
    }
}
