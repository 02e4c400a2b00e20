use super::types::{Action, EventType, Guard, StateKey, StateTable, Transition};
use crate::session::SessionState;

/// Builder for constructing the state table
pub struct StateTableBuilder {
    table: StateTable,
}

impl StateTableBuilder {
    pub fn new() -> Self {
        Self {
            table: StateTable::new(),
        }
    }

    pub fn add_transition(&mut self, state: SessionState, event: EventType, transition: Transition) -> &mut Self {
        self.table.insert(StateKey { state, event }, transition);
        self
    }

    /// Add a guarded transition that runs `actions` and moves to `next`
    pub fn add_guarded(
        &mut self,
        state: SessionState,
        event: EventType,
        guards: Vec<Guard>,
        actions: Vec<Action>,
        next: SessionState,
    ) -> &mut Self {
        self.add_transition(
            state,
            event,
            Transition {
                guards,
                actions,
                next_state: Some(next),
            },
        )
    }

    /// Add an unguarded transition that runs `actions` and moves to `next`
    pub fn add_state_change(
        &mut self,
        state: SessionState,
        event: EventType,
        actions: Vec<Action>,
        next: SessionState,
    ) -> &mut Self {
        self.add_guarded(state, event, vec![], actions, next)
    }

    /// Add a transition that runs `actions` without leaving `state`
    pub fn add_self_transition(&mut self, state: SessionState, event: EventType, actions: Vec<Action>) -> &mut Self {
        self.add_transition(
            state,
            event,
            Transition {
                guards: vec![],
                actions,
                next_state: None,
            },
        )
    }

    pub fn build(self) -> StateTable {
        self.table
    }
}
