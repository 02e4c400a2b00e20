//! Render descriptions for the presentation layer
//!
//! [`render`] is a pure function of the number buffer and the call session.
//! The presentation layer re-renders from its output on every change and
//! never reads controller internals.

use serde::Serialize;

use crate::keypad::{Keypad, KEYPAD};
use crate::number::NumberBuffer;
use crate::session::{initials, CallSession, SessionState};

/// Placeholder shown while nothing has been dialed
pub const NUMBER_PLACEHOLDER: &str = "Enter a phone number";

/// Name shown for a peer without a display name
pub const UNKNOWN_CONTACT: &str = "Unknown";

/// Controls offered on the in-call screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallControls {
    /// Mute toggle and its current state, when offered
    pub mute: Option<bool>,
    /// Speaker toggle and its current state, when offered
    pub speaker: Option<bool>,
    pub end_call: bool,
}

/// What the presentation layer should draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DialerView {
    Dialer {
        /// Grouped number, or empty when nothing has been dialed
        display: String,
        placeholder: Option<&'static str>,
        /// The delete control is only shown while there is something to delete
        show_delete: bool,
        keypad: &'static Keypad,
    },
    Incoming {
        caller_name: String,
        caller_number: String,
        initials: String,
        status_text: String,
    },
    InCall {
        contact_name: String,
        contact_number: String,
        initials: String,
        status_text: String,
        controls: CallControls,
    },
}

/// Build the view for the current state
pub fn render(number: &NumberBuffer, session: &CallSession) -> DialerView {
    match session.state {
        SessionState::Dialer => DialerView::Dialer {
            display: number.formatted(),
            placeholder: number.is_empty().then_some(NUMBER_PLACEHOLDER),
            show_delete: !number.is_empty(),
            keypad: &KEYPAD,
        },
        SessionState::Incoming => DialerView::Incoming {
            caller_name: contact_name(session).to_string(),
            caller_number: session.peer_number.clone(),
            initials: initials(contact_name(session)),
            status_text: session.status_text(),
        },
        SessionState::InCall(_) => {
            let connected = session.state.is_connected();
            DialerView::InCall {
                contact_name: contact_name(session).to_string(),
                contact_number: session.peer_number.clone(),
                initials: initials(contact_name(session)),
                status_text: session.status_text(),
                controls: CallControls {
                    mute: connected.then_some(session.muted),
                    speaker: connected.then_some(session.speaker_on),
                    end_call: true,
                },
            }
        }
    }
}

fn contact_name(session: &CallSession) -> &str {
    if session.peer_name.trim().is_empty() {
        UNKNOWN_CONTACT
    } else {
        &session.peer_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CallStatus;
    use pretty_assertions::assert_eq;

    fn number(digits: &str) -> NumberBuffer {
        let mut buffer = NumberBuffer::default();
        for d in digits.chars() {
            buffer.append_digit(d);
        }
        buffer
    }

    #[test]
    fn test_empty_dialer_shows_placeholder() {
        let view = render(&NumberBuffer::default(), &CallSession::default());
        assert_eq!(
            view,
            DialerView::Dialer {
                display: String::new(),
                placeholder: Some(NUMBER_PLACEHOLDER),
                show_delete: false,
                keypad: &KEYPAD,
            }
        );
    }

    #[test]
    fn test_dialer_formats_number() {
        let view = render(&number("5551234567"), &CallSession::default());
        assert_eq!(
            view,
            DialerView::Dialer {
                display: "(555) 123-4567".to_string(),
                placeholder: None,
                show_delete: true,
                keypad: &KEYPAD,
            }
        );
    }

    #[test]
    fn test_incoming_view() {
        let session = CallSession {
            state: SessionState::Incoming,
            peer_name: "Jane Smith".to_string(),
            peer_number: "+1 (555) 987-6543".to_string(),
            ..Default::default()
        };
        assert_eq!(
            render(&NumberBuffer::default(), &session),
            DialerView::Incoming {
                caller_name: "Jane Smith".to_string(),
                caller_number: "+1 (555) 987-6543".to_string(),
                initials: "JS".to_string(),
                status_text: "Incoming Call".to_string(),
            }
        );
    }

    #[test]
    fn test_calling_offers_end_call_only() {
        let session = CallSession {
            state: SessionState::InCall(CallStatus::Calling),
            peer_number: "5551234567".to_string(),
            ..Default::default()
        };
        assert_eq!(
            render(&NumberBuffer::default(), &session),
            DialerView::InCall {
                contact_name: UNKNOWN_CONTACT.to_string(),
                contact_number: "5551234567".to_string(),
                initials: "U".to_string(),
                status_text: "Calling...".to_string(),
                controls: CallControls {
                    mute: None,
                    speaker: None,
                    end_call: true,
                },
            }
        );
    }

    #[test]
    fn test_connected_offers_audio_controls() {
        let session = CallSession {
            state: SessionState::InCall(CallStatus::Connected),
            peer_name: "Bob Wilson".to_string(),
            peer_number: "+1 (555) 555-5555".to_string(),
            duration_seconds: 65,
            muted: true,
            ..Default::default()
        };
        let DialerView::InCall { status_text, controls, initials, .. } = render(&NumberBuffer::default(), &session)
        else {
            panic!("expected in-call view");
        };
        assert_eq!(status_text, "01:05");
        assert_eq!(initials, "BW");
        assert_eq!(
            controls,
            CallControls {
                mute: Some(true),
                speaker: Some(false),
                end_call: true,
            }
        );
    }

    #[test]
    fn test_view_serializes_for_the_rendering_layer() {
        let view = render(&number("555"), &CallSession::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["Dialer"]["display"], "(555)");
        assert_eq!(json["Dialer"]["show_delete"], true);
        assert_eq!(json["Dialer"]["keypad"]["rows"][3][1]["letters"], "+");
    }
}
