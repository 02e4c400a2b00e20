use crate::session::{CallStatus, SessionState};
use crate::state_table::{Action, EventType, StateTableBuilder};

const ALL_STATUSES: [CallStatus; 3] = [CallStatus::Calling, CallStatus::Ringing, CallStatus::Connected];

/// Add hang-up from any in-call status plus the connected-only controls
pub fn add_in_call_transitions(builder: &mut StateTableBuilder) {
    for status in ALL_STATUSES {
        builder.add_state_change(
            SessionState::InCall(status),
            EventType::EndCall,
            vec![
                Action::CancelAllTimers,
                Action::PublishCallEnded,
                Action::ResetAudioRoute,
                Action::ResetSession,
            ],
            SessionState::Dialer,
        );
    }

    let connected = SessionState::InCall(CallStatus::Connected);
    builder.add_self_transition(connected, EventType::DurationTick, vec![Action::IncrementDuration]);
    builder.add_self_transition(connected, EventType::ToggleMute, vec![Action::ToggleMute]);
    builder.add_self_transition(connected, EventType::ToggleSpeaker, vec![Action::ToggleSpeaker]);
}
