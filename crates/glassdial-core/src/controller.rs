//! Call session controller
//!
//! [`CallSessionController`] owns the number buffer, the call session and
//! every timer. It looks each input up in the [`MASTER_TABLE`], checks the
//! guards, runs the actions in order and moves to the next state. Inputs the
//! table has no entry for are ignored.
//!
//! The controller is synchronous and expects to be driven from a single
//! task inside a tokio runtime; timers and the native dial hand-off are
//! spawned as separate tasks and report back through channels that the
//! owning task feeds into [`CallSessionController::on_timer`] and
//! [`CallSessionController::on_dial_completed`].

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, debug_span, info, trace, warn};

use crate::adapters::{
    AudioRoute, DialOutcome, FixedCallerSource, IncomingCallerSource, LoggingAudioRoute, NativeDialer,
    UnsupportedDialer,
};
use crate::config::DialerConfig;
use crate::error::{DialerError, DialerResult};
use crate::events::{DialerEvent, EventEmitter};
use crate::number::{EditOp, NumberBuffer};
use crate::session::{CallSession, Screen, SessionId, SessionState};
use crate::state_table::{Action, EventType, Guard, StateTable, MASTER_TABLE};
use crate::timers::{Generation, TimerFired, TimerKind, TimerSet};
use crate::view::{render, DialerView};

/// Everything the rendering layer needs, published after every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialerSnapshot {
    pub number: NumberBuffer,
    pub session: CallSession,
    /// Timer generation the snapshot was taken in
    pub generation: Generation,
}

impl DialerSnapshot {
    pub fn screen(&self) -> Screen {
        self.session.screen()
    }

    pub fn view(&self) -> DialerView {
        render(&self.number, &self.session)
    }
}

/// External capabilities used by the controller
#[derive(Clone)]
pub struct Collaborators {
    pub native_dialer: Arc<dyn NativeDialer>,
    pub caller_source: Arc<dyn IncomingCallerSource>,
    pub audio_route: Arc<dyn AudioRoute>,
}

impl Collaborators {
    /// Defaults for a dialer without any platform integration
    ///
    /// Dialing is reported as unsupported, incoming calls present the
    /// configured demo caller and audio routing changes are only logged.
    pub fn from_config(config: &DialerConfig) -> Self {
        Self {
            native_dialer: Arc::new(UnsupportedDialer),
            caller_source: Arc::new(FixedCallerSource::new(config.demo_caller.clone().into())),
            audio_route: Arc::new(LoggingAudioRoute),
        }
    }

    pub fn with_native_dialer(mut self, dialer: Arc<dyn NativeDialer>) -> Self {
        self.native_dialer = dialer;
        self
    }

    pub fn with_caller_source(mut self, source: Arc<dyn IncomingCallerSource>) -> Self {
        self.caller_source = source;
        self
    }

    pub fn with_audio_route(mut self, route: Arc<dyn AudioRoute>) -> Self {
        self.audio_route = route;
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::from_config(&DialerConfig::default())
    }
}

/// Result of a background native dial, delivered back to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialCompleted {
    pub session_id: Option<SessionId>,
    pub number: String,
    pub outcome: DialOutcome,
}

/// Executes the call session state table
pub struct CallSessionController {
    config: DialerConfig,
    table: Arc<StateTable>,
    number: NumberBuffer,
    session: CallSession,
    timers: TimerSet,
    collaborators: Collaborators,
    events: EventEmitter,
    dial_tx: mpsc::UnboundedSender<DialCompleted>,
}

impl CallSessionController {
    pub fn new(
        config: DialerConfig,
        collaborators: Collaborators,
        events: EventEmitter,
        timer_tx: mpsc::UnboundedSender<TimerFired>,
        dial_tx: mpsc::UnboundedSender<DialCompleted>,
    ) -> Self {
        Self {
            number: NumberBuffer::new(config.max_number_length),
            session: CallSession::default(),
            timers: TimerSet::new(timer_tx),
            table: Arc::clone(&MASTER_TABLE),
            config,
            collaborators,
            events,
            dial_tx,
        }
    }

    /// Use a different transition table
    pub fn with_table(mut self, table: Arc<StateTable>) -> Self {
        self.table = table;
        self
    }

    pub fn number(&self) -> &NumberBuffer {
        &self.number
    }

    pub fn session(&self) -> &CallSession {
        &self.session
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn snapshot(&self) -> DialerSnapshot {
        DialerSnapshot {
            number: self.number.clone(),
            session: self.session.clone(),
            generation: self.timers.generation(),
        }
    }

    /// Apply a number edit
    ///
    /// Edits are only accepted while the dialer screen is showing. Returns
    /// whether the buffer changed.
    pub fn edit(&mut self, op: EditOp) -> bool {
        if self.session.state != SessionState::Dialer {
            debug!("Ignoring {:?} on {} screen", op, self.session.state);
            return false;
        }
        let changed = self.number.apply(op);
        if changed {
            trace!("Number is now {:?}", self.number.digits());
            self.publish_number();
        }
        changed
    }

    /// Feed an input to the state machine
    pub fn handle(&mut self, event: EventType) -> DialerResult<()> {
        let span = debug_span!("call_session", session_id = %self.session_label());
        let _enter = span.enter();

        let table = Arc::clone(&self.table);
        let previous = self.session.state;
        let Some(transition) = table.get(previous, event) else {
            debug!("{} ignored in {}", event.type_name(), previous);
            return Ok(());
        };

        for guard in &transition.guards {
            if let Err(e) = self.check_guard(*guard) {
                warn!("{} rejected in {}: {}", event.type_name(), previous, e);
                if let Some(notice) = e.notice() {
                    self.events.emit(DialerEvent::Notice(notice));
                }
                return Err(e);
            }
        }

        for action in &transition.actions {
            self.execute_action(*action);
        }

        if let Some(next) = transition.next_state {
            self.session.state = next;
            debug!("{} --{}--> {}", previous, event.type_name(), next);
            self.publish_state_change(previous, next);
        }
        Ok(())
    }

    /// Deliver a timer expiry
    ///
    /// Fires from a superseded generation are dropped.
    pub fn on_timer(&mut self, fired: TimerFired) -> DialerResult<()> {
        if !self.timers.is_current(&fired) {
            trace!(
                "Dropping stale {:?} fire from {} (current {})",
                fired.kind,
                fired.generation,
                self.timers.generation()
            );
            return Ok(());
        }
        self.handle(EventType::from_timer(fired.kind))
    }

    /// Report the outcome of a background native dial
    ///
    /// The outcome never changes the session; failures become notices.
    pub fn on_dial_completed(&mut self, completed: DialCompleted) {
        let DialCompleted {
            session_id,
            number,
            outcome,
        } = completed;

        match &outcome {
            DialOutcome::Supported => debug!("Native dial accepted {}", number),
            DialOutcome::Unsupported => debug!("Native dial unsupported for {}", number),
            DialOutcome::Failed { reason } => warn!("Native dial failed for {}: {}", number, reason),
        }
        if session_id.is_some() && session_id != self.session.id {
            debug!("Dial outcome arrived after its session ended");
        }

        self.events.emit(DialerEvent::DialOutcome {
            number: number.clone(),
            outcome: outcome.clone(),
        });
        if let Err(e) = outcome.into_result(&number) {
            if let Some(notice) = e.notice() {
                self.events.emit(DialerEvent::Notice(notice));
            }
        }
    }

    fn check_guard(&self, guard: Guard) -> DialerResult<()> {
        match guard {
            Guard::NumberNotEmpty if self.number.is_empty() => Err(DialerError::EmptyNumber),
            Guard::NumberNotEmpty => Ok(()),
        }
    }

    fn execute_action(&mut self, action: Action) {
        trace!("Executing action: {:?}", action);

        match action {
            Action::CancelAllTimers => {
                let pending = self.timers.cancel_all();
                if pending > 0 {
                    debug!("Cancelled {} pending timers", pending);
                }
            }
            Action::BeginSession(direction) => {
                self.session.reset();
                let id = SessionId::new();
                info!("Starting {:?} session {}", direction, id);
                self.session.id = Some(id);
                self.session.direction = Some(direction);
            }
            Action::CapturePeerFromNumber => {
                self.session.peer_name.clear();
                self.session.peer_number = if self.config.clear_number_on_call {
                    let number = self.number.take();
                    self.publish_number();
                    number
                } else {
                    self.number.digits().to_string()
                };
            }
            Action::LoadIncomingCaller => {
                let caller = self.collaborators.caller_source.next_caller();
                info!("Incoming call from {} <{}>", caller.name, caller.number);
                self.session.peer_name = caller.name;
                self.session.peer_number = caller.number;
            }
            Action::RequestNativeDial => {
                let dialer = Arc::clone(&self.collaborators.native_dialer);
                let tx = self.dial_tx.clone();
                let session_id = self.session.id.clone();
                let number = self.session.peer_number.clone();
                tokio::spawn(async move {
                    let outcome = dialer.attempt_dial(&number).await;
                    let _ = tx.send(DialCompleted {
                        session_id,
                        number,
                        outcome,
                    });
                });
            }
            Action::ArmTimer(kind) => {
                let delay = match kind {
                    TimerKind::Dial => self.config.dial_delay(),
                    TimerKind::Ring => self.config.ring_delay(),
                    TimerKind::DurationTick => self.config.tick_interval(),
                };
                self.timers.arm(kind, delay);
            }
            Action::StartDurationTicker => {
                if !self.timers.start_ticker(self.config.tick_interval()) {
                    debug!("Duration ticker already running");
                }
            }
            Action::IncrementDuration => {
                self.session.duration_seconds += 1;
                self.events.emit(DialerEvent::DurationTick {
                    session_id: self.session.id.clone(),
                    duration_secs: self.session.duration_seconds,
                });
            }
            Action::MarkConnected => {
                info!("Call connected with {}", self.session.peer_number);
                self.session.duration_seconds = 0;
                self.session.connected_at = Some(Utc::now());
            }
            Action::ToggleMute => {
                self.session.muted = !self.session.muted;
                self.collaborators.audio_route.set_muted(self.session.muted);
                self.events.emit(DialerEvent::MuteChanged {
                    muted: self.session.muted,
                });
            }
            Action::ToggleSpeaker => {
                self.session.speaker_on = !self.session.speaker_on;
                self.collaborators.audio_route.set_speaker(self.session.speaker_on);
                self.events.emit(DialerEvent::SpeakerChanged {
                    speaker_on: self.session.speaker_on,
                });
            }
            Action::PublishCallEnded => {
                info!(
                    "Call with {} ended after {}s",
                    self.session.peer_number, self.session.duration_seconds
                );
                self.events.emit(DialerEvent::CallEnded {
                    session_id: self.session.id.clone(),
                    peer_number: self.session.peer_number.clone(),
                    duration_secs: self.session.duration_seconds,
                    ended_at: Utc::now(),
                });
            }
            Action::ResetAudioRoute => {
                if self.session.muted {
                    self.collaborators.audio_route.set_muted(false);
                    self.events.emit(DialerEvent::MuteChanged { muted: false });
                }
                if self.session.speaker_on {
                    self.collaborators.audio_route.set_speaker(false);
                    self.events.emit(DialerEvent::SpeakerChanged { speaker_on: false });
                }
            }
            Action::ResetSession => {
                self.session.reset();
            }
        }
    }

    fn publish_number(&self) {
        self.events.emit(DialerEvent::NumberChanged {
            digits: self.number.digits().to_string(),
            formatted: self.number.formatted(),
        });
    }

    fn publish_state_change(&self, previous: SessionState, next: SessionState) {
        if previous.screen() != next.screen() {
            self.events.emit(DialerEvent::ScreenChanged {
                from: previous.screen(),
                to: next.screen(),
            });
        }
        if let Some(status) = next.status() {
            if previous.status() != Some(status) {
                self.events.emit(DialerEvent::StatusChanged {
                    session_id: self.session.id.clone(),
                    previous: previous.status(),
                    status,
                });
            }
        }
    }

    fn session_label(&self) -> String {
        self.session
            .id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "none".to_string())
    }
}
