use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::session::{CallDirection, CallStatus, SessionState};
use crate::timers::TimerKind;

/// Inputs that can move the session
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum EventType {
    // User-initiated events
    PlaceCall,
    SimulateIncoming,
    Answer,
    Decline,
    EndCall,
    ToggleMute,
    ToggleSpeaker,

    // Timer events
    DialTimerElapsed,
    RingTimerElapsed,
    DurationTick,
}

impl EventType {
    pub fn type_name(&self) -> &'static str {
        match self {
            EventType::PlaceCall => "PlaceCall",
            EventType::SimulateIncoming => "SimulateIncoming",
            EventType::Answer => "Answer",
            EventType::Decline => "Decline",
            EventType::EndCall => "EndCall",
            EventType::ToggleMute => "ToggleMute",
            EventType::ToggleSpeaker => "ToggleSpeaker",
            EventType::DialTimerElapsed => "DialTimerElapsed",
            EventType::RingTimerElapsed => "RingTimerElapsed",
            EventType::DurationTick => "DurationTick",
        }
    }

    /// Event produced when a timer of the given kind fires
    pub fn from_timer(kind: TimerKind) -> Self {
        match kind {
            TimerKind::Dial => EventType::DialTimerElapsed,
            TimerKind::Ring => EventType::RingTimerElapsed,
            TimerKind::DurationTick => EventType::DurationTick,
        }
    }
}

/// Key for looking up transitions in the state table
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct StateKey {
    pub state: SessionState,
    pub event: EventType,
}

/// Conditions that must hold for a transition to be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guard {
    /// The number buffer has at least one character
    NumberNotEmpty,
}

/// Side effects executed, in order, while taking a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Abort every timer of the current generation and start a new one
    CancelAllTimers,
    /// Assign a fresh session id and direction
    BeginSession(CallDirection),
    /// Copy the number buffer into `peer_number`
    CapturePeerFromNumber,
    /// Ask the incoming-caller source for name and number
    LoadIncomingCaller,
    /// Hand the peer number to the native dialer, in the background
    RequestNativeDial,
    /// Arm a one-shot timer
    ArmTimer(TimerKind),
    /// Start the periodic duration ticker
    StartDurationTicker,
    IncrementDuration,
    MarkConnected,
    ToggleMute,
    ToggleSpeaker,
    /// Announce the end of the call with its final duration
    PublishCallEnded,
    /// Return mute and speaker routing to their defaults
    ResetAudioRoute,
    /// Back to dialer defaults
    ResetSession,
}

/// Transition definition - what happens when an event occurs in a state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Conditions that must be true for this transition
    pub guards: Vec<Guard>,
    /// Actions to execute
    pub actions: Vec<Action>,
    /// Next state (if changing)
    pub next_state: Option<SessionState>,
}

/// States that must always have an exit
const STATES_REQUIRING_EXITS: &[SessionState] = &[
    SessionState::Incoming,
    SessionState::InCall(CallStatus::Calling),
    SessionState::InCall(CallStatus::Ringing),
    SessionState::InCall(CallStatus::Connected),
];

/// All transitions of the call session
#[derive(Debug, Default)]
pub struct StateTable {
    transitions: HashMap<StateKey, Transition>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: StateKey, transition: Transition) {
        self.transitions.insert(key, transition);
    }

    pub fn get(&self, state: SessionState, event: EventType) -> Option<&Transition> {
        self.transitions.get(&StateKey { state, event })
    }

    pub fn has_transition(&self, state: SessionState, event: EventType) -> bool {
        self.get(state, event).is_some()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Collect all states referenced in this table
    pub fn collect_used_states(&self) -> HashSet<SessionState> {
        let mut states = HashSet::new();
        for (key, transition) in &self.transitions {
            states.insert(key.state);
            if let Some(next_state) = transition.next_state {
                states.insert(next_state);
            }
        }
        states
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let used_states = self.collect_used_states();

        for state in STATES_REQUIRING_EXITS {
            if !used_states.contains(state) {
                errors.push(format!("State {} is unreachable", state));
                continue;
            }
            let has_exit = self
                .transitions
                .iter()
                .any(|(key, t)| key.state == *state && t.next_state.is_some_and(|next| next != *state));
            if !has_exit {
                errors.push(format!("State {} has no exit transitions", state));
            }
        }

        // Every way out of a call must leave no timer behind
        for (key, transition) in &self.transitions {
            let leaves_call = key.state != SessionState::Dialer
                && transition.next_state == Some(SessionState::Dialer);
            if leaves_call && transition.actions.first() != Some(&Action::CancelAllTimers) {
                errors.push(format!(
                    "{} on {} returns to the dialer without cancelling timers first",
                    key.event.type_name(),
                    key.state
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
