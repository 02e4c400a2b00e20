use crate::session::{CallDirection, CallStatus, SessionState};
use crate::state_table::{Action, EventType, Guard, StateTableBuilder};
use crate::timers::TimerKind;

/// Add the simulated outgoing progression: Dialer -> Calling -> Ringing -> Connected
pub fn add_outgoing_transitions(builder: &mut StateTableBuilder) {
    // Dialer -> Calling: place the call
    builder.add_guarded(
        SessionState::Dialer,
        EventType::PlaceCall,
        vec![Guard::NumberNotEmpty],
        vec![
            Action::CancelAllTimers,
            Action::BeginSession(CallDirection::Outgoing),
            Action::CapturePeerFromNumber,
            Action::RequestNativeDial,
            Action::ArmTimer(TimerKind::Dial),
        ],
        SessionState::InCall(CallStatus::Calling),
    );

    // Calling -> Ringing: T1 elapsed
    builder.add_state_change(
        SessionState::InCall(CallStatus::Calling),
        EventType::DialTimerElapsed,
        vec![Action::ArmTimer(TimerKind::Ring)],
        SessionState::InCall(CallStatus::Ringing),
    );

    // Ringing -> Connected: T2 elapsed
    builder.add_state_change(
        SessionState::InCall(CallStatus::Ringing),
        EventType::RingTimerElapsed,
        vec![Action::MarkConnected, Action::StartDurationTicker],
        SessionState::InCall(CallStatus::Connected),
    );
}
