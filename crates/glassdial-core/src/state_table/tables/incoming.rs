use crate::session::{CallDirection, CallStatus, SessionState};
use crate::state_table::{Action, EventType, StateTableBuilder};

/// Add the simulated incoming call: Dialer -> Incoming -> Connected | Dialer
pub fn add_incoming_transitions(builder: &mut StateTableBuilder) {
    builder.add_state_change(
        SessionState::Dialer,
        EventType::SimulateIncoming,
        vec![
            Action::CancelAllTimers,
            Action::BeginSession(CallDirection::Incoming),
            Action::LoadIncomingCaller,
        ],
        SessionState::Incoming,
    );

    builder.add_state_change(
        SessionState::Incoming,
        EventType::Answer,
        vec![Action::MarkConnected, Action::StartDurationTicker],
        SessionState::InCall(CallStatus::Connected),
    );

    builder.add_state_change(
        SessionState::Incoming,
        EventType::Decline,
        vec![Action::CancelAllTimers, Action::ResetSession],
        SessionState::Dialer,
    );
}
