mod in_call;
mod incoming;
mod outgoing;

pub use in_call::add_in_call_transitions;
pub use incoming::add_incoming_transitions;
pub use outgoing::add_outgoing_transitions;
