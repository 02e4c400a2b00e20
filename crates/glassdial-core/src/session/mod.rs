//! Call session data model
//!
//! A single [`CallSession`] exists per dialer. Its position in the state
//! machine is a [`SessionState`], which the rendering layer sees split into
//! a [`Screen`] and, while on the in-call screen, a [`CallStatus`].

mod duration;

pub use duration::{format_duration, initials};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session ID type
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(format!("session-{}", uuid::Uuid::new_v4()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which screen is showing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Screen {
    Dialer,
    Incoming,
    InCall,
}

/// Progress of the call shown on the in-call screen
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CallStatus {
    Calling,
    Ringing,
    Connected,
}

/// Position of the session in the state machine
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    Dialer,
    Incoming,
    InCall(CallStatus),
}

impl SessionState {
    pub fn screen(&self) -> Screen {
        match self {
            SessionState::Dialer => Screen::Dialer,
            SessionState::Incoming => Screen::Incoming,
            SessionState::InCall(_) => Screen::InCall,
        }
    }

    /// Call status, only meaningful on the in-call screen
    pub fn status(&self) -> Option<CallStatus> {
        match self {
            SessionState::InCall(status) => Some(*status),
            _ => None,
        }
    }

    pub fn is_in_call(&self) -> bool {
        matches!(self, SessionState::InCall(_))
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, SessionState::InCall(CallStatus::Connected))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Dialer => write!(f, "Dialer"),
            SessionState::Incoming => write!(f, "Incoming"),
            SessionState::InCall(status) => write!(f, "InCall({:?})", status),
        }
    }
}

/// Whether the call was placed or received
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallDirection {
    Outgoing,
    Incoming,
}

/// The one call session of the dialer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSession {
    /// Identifier of the current call, `None` while on the dialer
    pub id: Option<SessionId>,
    pub state: SessionState,
    pub direction: Option<CallDirection>,
    pub peer_name: String,
    pub peer_number: String,
    pub duration_seconds: u64,
    pub muted: bool,
    pub speaker_on: bool,
    /// When the call reached `Connected`
    pub connected_at: Option<DateTime<Utc>>,
}

impl Default for CallSession {
    fn default() -> Self {
        Self {
            id: None,
            state: SessionState::Dialer,
            direction: None,
            peer_name: String::new(),
            peer_number: String::new(),
            duration_seconds: 0,
            muted: false,
            speaker_on: false,
            connected_at: None,
        }
    }
}

impl CallSession {
    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    pub fn status(&self) -> Option<CallStatus> {
        self.state.status()
    }

    /// Back to dialer defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Text shown under the contact on the call screens
    pub fn status_text(&self) -> String {
        match self.state {
            SessionState::Dialer => String::new(),
            SessionState::Incoming => "Incoming Call".to_string(),
            SessionState::InCall(CallStatus::Calling) => "Calling...".to_string(),
            SessionState::InCall(CallStatus::Ringing) => "Ringing...".to_string(),
            SessionState::InCall(CallStatus::Connected) => format_duration(self.duration_seconds),
        }
    }
}
