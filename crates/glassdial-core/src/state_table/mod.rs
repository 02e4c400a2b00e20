//! Declarative transition table for the call session
//!
//! Every legal `(state, event)` pair maps to a [`Transition`]: guards to
//! check, actions to run in order, and the state to end up in. A pair that
//! is not in the table is an input the current state does not accept, and
//! the controller ignores it.

pub mod builder;
pub mod tables;
pub mod types;

pub use builder::StateTableBuilder;
pub use types::*;

use std::sync::Arc;

use lazy_static::lazy_static;

lazy_static! {
    /// The master state table - single source of truth for all transitions
    pub static ref MASTER_TABLE: Arc<StateTable> = Arc::new(build_master_table());
}

/// Build the complete master state table
pub fn build_master_table() -> StateTable {
    let mut builder = StateTableBuilder::new();
    tables::add_outgoing_transitions(&mut builder);
    tables::add_incoming_transitions(&mut builder);
    tables::add_in_call_transitions(&mut builder);
    let table = builder.build();

    if let Err(errors) = table.validate() {
        tracing::error!("Call session state table is inconsistent: {:?}", errors);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CallStatus, SessionState};
    use crate::timers::TimerKind;

    const CALLING: SessionState = SessionState::InCall(CallStatus::Calling);
    const RINGING: SessionState = SessionState::InCall(CallStatus::Ringing);
    const CONNECTED: SessionState = SessionState::InCall(CallStatus::Connected);

    #[test]
    fn test_master_table_is_valid() {
        assert!(MASTER_TABLE.validate().is_ok());
        assert_eq!(MASTER_TABLE.transition_count(), 12);
    }

    #[test]
    fn test_outgoing_flow() {
        let table = &*MASTER_TABLE;

        let place = table.get(SessionState::Dialer, EventType::PlaceCall).expect("PlaceCall transition");
        assert_eq!(place.guards, vec![Guard::NumberNotEmpty]);
        assert_eq!(place.next_state, Some(CALLING));
        assert!(place.actions.contains(&Action::RequestNativeDial));
        assert_eq!(place.actions.last(), Some(&Action::ArmTimer(TimerKind::Dial)));

        let ring = table.get(CALLING, EventType::DialTimerElapsed).expect("T1 transition");
        assert_eq!(ring.next_state, Some(RINGING));
        assert_eq!(ring.actions, vec![Action::ArmTimer(TimerKind::Ring)]);

        let connect = table.get(RINGING, EventType::RingTimerElapsed).expect("T2 transition");
        assert_eq!(connect.next_state, Some(CONNECTED));
        assert!(connect.actions.contains(&Action::StartDurationTicker));
    }

    #[test]
    fn test_outgoing_flow_never_skips_or_goes_back() {
        let table = &*MASTER_TABLE;
        assert!(!table.has_transition(CALLING, EventType::RingTimerElapsed));
        assert!(!table.has_transition(SessionState::Dialer, EventType::DialTimerElapsed));
        assert!(!table.has_transition(CONNECTED, EventType::DialTimerElapsed));
        assert!(!table.has_transition(RINGING, EventType::DialTimerElapsed));
    }

    #[test]
    fn test_incoming_flow() {
        let table = &*MASTER_TABLE;

        let incoming = table.get(SessionState::Dialer, EventType::SimulateIncoming).unwrap();
        assert_eq!(incoming.next_state, Some(SessionState::Incoming));
        assert!(incoming.actions.contains(&Action::LoadIncomingCaller));

        let answer = table.get(SessionState::Incoming, EventType::Answer).unwrap();
        assert_eq!(answer.next_state, Some(CONNECTED));

        let decline = table.get(SessionState::Incoming, EventType::Decline).unwrap();
        assert_eq!(decline.next_state, Some(SessionState::Dialer));
        assert_eq!(decline.actions[0], Action::CancelAllTimers);
    }

    #[test]
    fn test_end_call_from_every_in_call_status() {
        for state in [CALLING, RINGING, CONNECTED] {
            let end = MASTER_TABLE.get(state, EventType::EndCall).unwrap();
            assert_eq!(end.next_state, Some(SessionState::Dialer));
            assert_eq!(end.actions[0], Action::CancelAllTimers);
            assert!(end.actions.contains(&Action::ResetSession));
        }
        assert!(!MASTER_TABLE.has_transition(SessionState::Incoming, EventType::EndCall));
    }

    #[test]
    fn test_controls_only_while_connected() {
        for event in [EventType::ToggleMute, EventType::ToggleSpeaker, EventType::DurationTick] {
            let t = MASTER_TABLE.get(CONNECTED, event).unwrap();
            assert_eq!(t.next_state, None);
            assert!(!MASTER_TABLE.has_transition(CALLING, event));
            assert!(!MASTER_TABLE.has_transition(RINGING, event));
            assert!(!MASTER_TABLE.has_transition(SessionState::Dialer, event));
        }
    }

    #[test]
    fn test_answer_and_decline_ignored_in_call() {
        for state in [CALLING, RINGING, CONNECTED] {
            assert!(!MASTER_TABLE.has_transition(state, EventType::Answer));
            assert!(!MASTER_TABLE.has_transition(state, EventType::Decline));
        }
    }

    #[test]
    fn test_validate_catches_missing_exit() {
        let mut builder = StateTableBuilder::new();
        builder.add_state_change(SessionState::Dialer, EventType::SimulateIncoming, vec![], SessionState::Incoming);
        let errors = builder.build().validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Incoming has no exit")));
    }

    #[test]
    fn test_validate_requires_cancel_before_leaving_call() {
        let mut builder = StateTableBuilder::new();
        tables::add_outgoing_transitions(&mut builder);
        tables::add_incoming_transitions(&mut builder);
        tables::add_in_call_transitions(&mut builder);
        builder.add_state_change(RINGING, EventType::EndCall, vec![Action::ResetSession], SessionState::Dialer);
        let errors = builder.build().validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("without cancelling timers"));
    }
}
