//! Events published by the dialer
//!
//! The rendering layer can rebuild everything from [`crate::DialerSnapshot`]
//! alone; these events exist for consumers that care about individual
//! changes, such as tests, loggers and sound effects.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::adapters::DialOutcome;
use crate::error::Notice;
use crate::session::{CallStatus, Screen, SessionId};

/// Events emitted by the dialer
#[derive(Debug, Clone, PartialEq)]
pub enum DialerEvent {
    /// The number buffer changed
    NumberChanged {
        digits: String,
        formatted: String,
    },

    /// A different screen is showing
    ScreenChanged {
        from: Screen,
        to: Screen,
    },

    /// The in-call status moved on
    StatusChanged {
        session_id: Option<SessionId>,
        previous: Option<CallStatus>,
        status: CallStatus,
    },

    /// One more second of connected call time
    DurationTick {
        session_id: Option<SessionId>,
        duration_secs: u64,
    },

    MuteChanged {
        muted: bool,
    },

    SpeakerChanged {
        speaker_on: bool,
    },

    /// The native dial attempt finished
    DialOutcome {
        number: String,
        outcome: DialOutcome,
    },

    /// Something the user should be told
    Notice(Notice),

    /// A call left the in-call screen
    CallEnded {
        session_id: Option<SessionId>,
        peer_number: String,
        duration_secs: u64,
        ended_at: DateTime<Utc>,
    },
}

/// Dialer events as a `Stream`; lagging shows up as `Err` items
pub type EventStream = BroadcastStream<DialerEvent>;

/// Pulls dialer events one at a time
///
/// Events dropped because this subscriber fell more than `event_capacity`
/// behind are skipped and counted in [`EventIterator::missed`].
pub struct EventIterator {
    stream: EventStream,
    missed: u64,
}

impl EventIterator {
    pub fn new(stream: EventStream) -> Self {
        Self { stream, missed: 0 }
    }

    /// Next event, or `None` once the dialer has shut down
    pub async fn next(&mut self) -> Option<DialerEvent> {
        use tokio_stream::StreamExt;
        while let Some(item) = self.stream.next().await {
            match item {
                Ok(event) => return Some(event),
                Err(BroadcastStreamRecvError::Lagged(count)) => self.missed += count,
            }
        }
        None
    }

    /// Events skipped so far
    pub fn missed(&self) -> u64 {
        self.missed
    }
}

/// Fans dialer events out to every subscriber
#[derive(Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<DialerEvent>,
}

impl EventEmitter {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn emit(&self, event: DialerEvent) {
        // No subscribers yet
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> EventStream {
        BroadcastStream::new(self.sender.subscribe())
    }

    pub fn subscribe_simple(&self) -> EventIterator {
        EventIterator::new(self.subscribe())
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_without_receivers_is_fine() {
        let emitter = EventEmitter::new(4);
        assert_eq!(emitter.receiver_count(), 0);
        emitter.emit(DialerEvent::MuteChanged { muted: true });
    }

    #[tokio::test]
    async fn test_subscriber_sees_events_in_order() {
        let emitter = EventEmitter::new(8);
        let mut events = emitter.subscribe_simple();

        emitter.emit(DialerEvent::MuteChanged { muted: true });
        emitter.emit(DialerEvent::SpeakerChanged { speaker_on: true });
        drop(emitter);

        assert_eq!(events.next().await, Some(DialerEvent::MuteChanged { muted: true }));
        assert_eq!(events.next().await, Some(DialerEvent::SpeakerChanged { speaker_on: true }));
        assert_eq!(events.next().await, None);
    }

    #[tokio::test]
    async fn test_lagged_receiver_skips_to_newest() {
        let emitter = EventEmitter::new(2);
        let mut events = emitter.subscribe_simple();
        for muted in [true, false, true] {
            emitter.emit(DialerEvent::MuteChanged { muted });
        }
        drop(emitter);

        assert_eq!(events.next().await, Some(DialerEvent::MuteChanged { muted: false }));
        assert_eq!(events.next().await, Some(DialerEvent::MuteChanged { muted: true }));
        assert_eq!(events.missed(), 1);
    }
}
