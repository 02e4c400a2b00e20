use std::io::ErrorKind;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{DialerError, DialerResult};

/// Result of handing a number to the platform telephony facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialOutcome {
    /// The platform accepted the number
    Supported,
    /// The platform has no way to place calls
    Unsupported,
    /// The platform tried and failed
    Failed { reason: String },
}

impl DialOutcome {
    pub fn into_result(self, number: &str) -> DialerResult<()> {
        match self {
            DialOutcome::Supported => Ok(()),
            DialOutcome::Unsupported => Err(DialerError::DialUnsupported {
                number: number.to_string(),
            }),
            DialOutcome::Failed { reason } => Err(DialerError::dial_failed(number, reason)),
        }
    }
}

/// Platform capability to place a real call
///
/// The outcome is informational. The simulated call progresses the same way
/// whatever this returns.
#[async_trait]
pub trait NativeDialer: Send + Sync {
    async fn attempt_dial(&self, number: &str) -> DialOutcome;
}

/// Build a `tel:` URI for a dialed number
///
/// `#` is a fragment delimiter in URIs and must be escaped; `*` and `+` are
/// allowed as-is.
pub fn tel_uri(number: &str) -> String {
    format!("tel:{}", number.replace('#', "%23"))
}

/// Dialer for platforms without telephony
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedDialer;

#[async_trait]
impl NativeDialer for UnsupportedDialer {
    async fn attempt_dial(&self, _number: &str) -> DialOutcome {
        DialOutcome::Unsupported
    }
}

/// Hands the `tel:` URI to an external opener program such as `xdg-open`
#[derive(Debug, Clone)]
pub struct CommandDialer {
    program: String,
    args: Vec<String>,
}

impl CommandDialer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the URI
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl NativeDialer for CommandDialer {
    async fn attempt_dial(&self, number: &str) -> DialOutcome {
        let uri = tel_uri(number);
        debug!("Opening {} with {}", uri, self.program);

        match Command::new(&self.program).args(&self.args).arg(&uri).status().await {
            Ok(status) if status.success() => DialOutcome::Supported,
            Ok(status) => {
                warn!("{} exited with {} for {}", self.program, status, uri);
                DialOutcome::Failed {
                    reason: format!("{} exited with {}", self.program, status),
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} is not installed, dialing unsupported", self.program);
                DialOutcome::Unsupported
            }
            Err(e) => {
                warn!("Failed to run {}: {}", self.program, e);
                DialOutcome::Failed { reason: e.to_string() }
            }
        }
    }
}
