//! Shared fakes and helpers for the dialer integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::FutureExt;

use glassdial_core::{
    AudioRoute, CallStatus, Caller, DialOutcome, Dialer, DialerConfig, DialerEvent, EventIterator,
    FixedCallerSource, NativeDialer,
};

/// Native dialer that records every number and answers with a fixed outcome
pub struct RecordingDialer {
    outcome: DialOutcome,
    pub numbers: Mutex<Vec<String>>,
}

impl RecordingDialer {
    pub fn new(outcome: DialOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            numbers: Mutex::new(Vec::new()),
        })
    }

    pub fn numbers(&self) -> Vec<String> {
        self.numbers.lock().unwrap().clone()
    }
}

#[async_trait]
impl NativeDialer for RecordingDialer {
    async fn attempt_dial(&self, number: &str) -> DialOutcome {
        self.numbers.lock().unwrap().push(number.to_string());
        self.outcome.clone()
    }
}

/// Audio route that records every change
#[derive(Default)]
pub struct RecordingAudioRoute {
    pub changes: Mutex<Vec<(&'static str, bool)>>,
}

impl RecordingAudioRoute {
    pub fn changes(&self) -> Vec<(&'static str, bool)> {
        self.changes.lock().unwrap().clone()
    }
}

impl AudioRoute for RecordingAudioRoute {
    fn set_muted(&self, muted: bool) {
        self.changes.lock().unwrap().push(("mute", muted));
    }

    fn set_speaker(&self, on: bool) {
        self.changes.lock().unwrap().push(("speaker", on));
    }
}

pub struct TestDialer {
    pub dialer: Dialer,
    pub native: Arc<RecordingDialer>,
    pub audio: Arc<RecordingAudioRoute>,
}

/// Dialer with recording collaborators and a fixed incoming caller
pub fn test_dialer(outcome: DialOutcome) -> TestDialer {
    let native = RecordingDialer::new(outcome);
    let audio = Arc::new(RecordingAudioRoute::default());
    let dialer = Dialer::builder(DialerConfig::default())
        .native_dialer(native.clone())
        .audio_route(audio.clone())
        .caller_source(Arc::new(FixedCallerSource::new(Caller::new(
            "Jane Smith",
            "+1 (555) 987-6543",
        ))))
        .build()
        .unwrap();
    TestDialer { dialer, native, audio }
}

pub async fn dial(dialer: &Dialer, digits: &str) {
    for digit in digits.chars() {
        assert!(dialer.press_digit(digit).await.unwrap(), "key {:?} was not accepted", digit);
    }
}

/// Every event that has already been emitted
pub fn drain(events: &mut EventIterator) -> Vec<DialerEvent> {
    let mut drained = Vec::new();
    while let Some(Some(event)) = events.next().now_or_never() {
        drained.push(event);
    }
    drained
}

/// The call statuses announced in `events`, in order
pub fn statuses(events: &[DialerEvent]) -> Vec<CallStatus> {
    events
        .iter()
        .filter_map(|event| match event {
            DialerEvent::StatusChanged { status, .. } => Some(*status),
            _ => None,
        })
        .collect()
}
