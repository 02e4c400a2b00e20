//! Dialer handle and event loop
//!
//! A [`Dialer`] owns a spawned task that holds the [`CallSessionController`].
//! User commands, timer fires and native dial outcomes are all funnelled
//! into that one task, so transitions are strictly serialized. After each
//! input the task publishes a fresh [`DialerSnapshot`] before replying, so a
//! caller that awaited a command always observes its effect.
//!
//! ```rust,no_run
//! use glassdial_core::{Dialer, DialerConfig, Screen};
//!
//! # async fn example() -> glassdial_core::DialerResult<()> {
//! let dialer = Dialer::new(DialerConfig::default())?;
//! for digit in "5551234567".chars() {
//!     dialer.press_digit(digit).await?;
//! }
//! dialer.place_call().await?;
//! assert_eq!(dialer.snapshot().screen(), Screen::InCall);
//! dialer.end_call().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::adapters::{AudioRoute, IncomingCallerSource, NativeDialer};
use crate::config::DialerConfig;
use crate::controller::{CallSessionController, Collaborators, DialCompleted, DialerSnapshot};
use crate::error::{DialerError, DialerResult};
use crate::events::{EventEmitter, EventIterator, EventStream};
use crate::keypad::{classify_press, delete_edit, PressKind, KEYPAD};
use crate::number::EditOp;
use crate::state_table::EventType;
use crate::timers::TimerFired;
use crate::view::DialerView;

/// Inputs the rendering layer reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiEvent {
    DigitPressed(char),
    ZeroLongPressed,
    DeletePressed,
    DeleteLongPressed,
    CallPressed,
    AnswerPressed,
    DeclinePressed,
    EndCallPressed,
    MuteToggled,
    SpeakerToggled,
    /// Demo trigger for an incoming call
    SimulateIncoming,
}

enum Command {
    Edit {
        op: EditOp,
        reply: oneshot::Sender<bool>,
    },
    Input {
        event: EventType,
        reply: oneshot::Sender<DialerResult<()>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Builder for a [`Dialer`] with custom collaborators
pub struct DialerBuilder {
    config: DialerConfig,
    native_dialer: Option<Arc<dyn NativeDialer>>,
    caller_source: Option<Arc<dyn IncomingCallerSource>>,
    audio_route: Option<Arc<dyn AudioRoute>>,
}

impl DialerBuilder {
    pub fn new(config: DialerConfig) -> Self {
        Self {
            config,
            native_dialer: None,
            caller_source: None,
            audio_route: None,
        }
    }

    pub fn native_dialer(mut self, dialer: Arc<dyn NativeDialer>) -> Self {
        self.native_dialer = Some(dialer);
        self
    }

    pub fn caller_source(mut self, source: Arc<dyn IncomingCallerSource>) -> Self {
        self.caller_source = Some(source);
        self
    }

    pub fn audio_route(mut self, route: Arc<dyn AudioRoute>) -> Self {
        self.audio_route = Some(route);
        self
    }

    /// Validate the configuration and start the dialer
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> DialerResult<Dialer> {
        let mut collaborators = Collaborators::from_config(&self.config);
        if let Some(dialer) = self.native_dialer {
            collaborators = collaborators.with_native_dialer(dialer);
        }
        if let Some(source) = self.caller_source {
            collaborators = collaborators.with_caller_source(source);
        }
        if let Some(route) = self.audio_route {
            collaborators = collaborators.with_audio_route(route);
        }
        Dialer::with_collaborators(self.config, collaborators)
    }
}

/// Handle to a running dialer
///
/// Cheap to clone. The event loop stops when [`Dialer::shutdown`] is called
/// or every handle has been dropped.
#[derive(Clone)]
pub struct Dialer {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<DialerSnapshot>,
    events: EventEmitter,
    config: Arc<DialerConfig>,
}

impl Dialer {
    /// Start a dialer with the default collaborators for `config`
    pub fn new(config: DialerConfig) -> DialerResult<Self> {
        let collaborators = Collaborators::from_config(&config);
        Self::with_collaborators(config, collaborators)
    }

    pub fn builder(config: DialerConfig) -> DialerBuilder {
        DialerBuilder::new(config)
    }

    pub fn with_collaborators(config: DialerConfig, collaborators: Collaborators) -> DialerResult<Self> {
        config.validate()?;

        let events = EventEmitter::new(config.event_capacity);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (dial_tx, dial_rx) = mpsc::unbounded_channel();

        let controller = CallSessionController::new(config.clone(), collaborators, events.clone(), timer_tx, dial_tx);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        tokio::spawn(run_event_loop(controller, command_rx, timer_rx, dial_rx, snapshot_tx));

        Ok(Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            events,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &DialerConfig {
        &self.config
    }

    /// Current state
    pub fn snapshot(&self) -> DialerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Current view description
    pub fn view(&self) -> DialerView {
        self.snapshots.borrow().view()
    }

    /// Receiver that is notified whenever the snapshot changes
    pub fn subscribe_snapshots(&self) -> watch::Receiver<DialerSnapshot> {
        self.snapshots.clone()
    }

    pub fn events(&self) -> EventStream {
        self.events.subscribe()
    }

    pub fn events_simple(&self) -> EventIterator {
        self.events.subscribe_simple()
    }

    /// Apply a number edit; returns whether the number changed
    pub async fn edit(&self, op: EditOp) -> DialerResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Edit { op, reply })?;
        rx.await.map_err(|_| DialerError::ShutDown)
    }

    /// Press a keypad key
    ///
    /// Symbols that are not on the keypad are ignored.
    pub async fn press_key(&self, symbol: char, press: PressKind) -> DialerResult<bool> {
        match KEYPAD.edit_for(symbol, press) {
            Some(op) => self.edit(op).await,
            None => {
                debug!("Ignoring press on unknown key {:?}", symbol);
                Ok(false)
            }
        }
    }

    /// Press a keypad key that was held for `held`
    pub async fn press_key_held(&self, symbol: char, held: Duration) -> DialerResult<bool> {
        self.press_key(symbol, classify_press(held, self.config.long_press())).await
    }

    pub async fn press_digit(&self, symbol: char) -> DialerResult<bool> {
        self.press_key(symbol, PressKind::Tap).await
    }

    /// Long press on `0`, which inserts `+`
    pub async fn long_press_zero(&self) -> DialerResult<bool> {
        self.press_key('0', PressKind::LongPress).await
    }

    pub async fn press_delete(&self, press: PressKind) -> DialerResult<bool> {
        self.edit(delete_edit(press)).await
    }

    pub async fn delete(&self) -> DialerResult<bool> {
        self.press_delete(PressKind::Tap).await
    }

    /// Long press on delete, which clears the number
    pub async fn clear(&self) -> DialerResult<bool> {
        self.press_delete(PressKind::LongPress).await
    }

    /// Call the number in the buffer
    ///
    /// Fails with [`DialerError::EmptyNumber`] when nothing has been dialed.
    pub async fn place_call(&self) -> DialerResult<()> {
        self.input(EventType::PlaceCall).await
    }

    pub async fn simulate_incoming(&self) -> DialerResult<()> {
        self.input(EventType::SimulateIncoming).await
    }

    pub async fn answer(&self) -> DialerResult<()> {
        self.input(EventType::Answer).await
    }

    pub async fn decline(&self) -> DialerResult<()> {
        self.input(EventType::Decline).await
    }

    pub async fn end_call(&self) -> DialerResult<()> {
        self.input(EventType::EndCall).await
    }

    pub async fn toggle_mute(&self) -> DialerResult<()> {
        self.input(EventType::ToggleMute).await
    }

    pub async fn toggle_speaker(&self) -> DialerResult<()> {
        self.input(EventType::ToggleSpeaker).await
    }

    /// Route a rendering layer input to the matching operation
    pub async fn dispatch(&self, event: UiEvent) -> DialerResult<()> {
        match event {
            UiEvent::DigitPressed(symbol) => self.press_digit(symbol).await.map(drop),
            UiEvent::ZeroLongPressed => self.long_press_zero().await.map(drop),
            UiEvent::DeletePressed => self.delete().await.map(drop),
            UiEvent::DeleteLongPressed => self.clear().await.map(drop),
            UiEvent::CallPressed => self.place_call().await,
            UiEvent::AnswerPressed => self.answer().await,
            UiEvent::DeclinePressed => self.decline().await,
            UiEvent::EndCallPressed => self.end_call().await,
            UiEvent::MuteToggled => self.toggle_mute().await,
            UiEvent::SpeakerToggled => self.toggle_speaker().await,
            UiEvent::SimulateIncoming => self.simulate_incoming().await,
        }
    }

    /// Stop the event loop, cancelling every timer
    pub async fn shutdown(&self) -> DialerResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Shutdown { reply })?;
        rx.await.map_err(|_| DialerError::ShutDown)
    }

    async fn input(&self, event: EventType) -> DialerResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Input { event, reply })?;
        rx.await.map_err(|_| DialerError::ShutDown)?
    }

    fn send(&self, command: Command) -> DialerResult<()> {
        self.commands.send(command).map_err(|_| DialerError::ShutDown)
    }
}

async fn run_event_loop(
    mut controller: CallSessionController,
    mut commands: mpsc::UnboundedReceiver<Command>,
    mut timers: mpsc::UnboundedReceiver<TimerFired>,
    mut dials: mpsc::UnboundedReceiver<DialCompleted>,
    snapshots: watch::Sender<DialerSnapshot>,
) {
    info!("Dialer event loop started");

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Edit { op, reply }) => {
                    let changed = controller.edit(op);
                    publish(&snapshots, &controller);
                    let _ = reply.send(changed);
                }
                Some(Command::Input { event, reply }) => {
                    let result = controller.handle(event);
                    publish(&snapshots, &controller);
                    let _ = reply.send(result);
                }
                Some(Command::Shutdown { reply }) => {
                    drop(controller);
                    let _ = reply.send(());
                    break;
                }
                None => {
                    debug!("All dialer handles dropped");
                    break;
                }
            },
            Some(fired) = timers.recv() => {
                if let Err(e) = controller.on_timer(fired) {
                    warn!("Timer {:?} failed: {}", fired.kind, e);
                }
                publish(&snapshots, &controller);
            }
            Some(completed) = dials.recv() => {
                controller.on_dial_completed(completed);
            }
        }
    }

    info!("Dialer event loop stopped");
}

fn publish(snapshots: &watch::Sender<DialerSnapshot>, controller: &CallSessionController) {
    let next = controller.snapshot();
    snapshots.send_if_modified(|current| {
        if *current == next {
            return false;
        }
        *current = next;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{CallStatus, Screen};

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_routes_editor_events() {
        let dialer = Dialer::new(DialerConfig::default()).unwrap();

        for event in [
            UiEvent::DigitPressed('4'),
            UiEvent::DigitPressed('4'),
            UiEvent::ZeroLongPressed,
            UiEvent::DigitPressed('x'),
        ] {
            dialer.dispatch(event).await.unwrap();
        }
        assert_eq!(dialer.snapshot().number.digits(), "44+");

        dialer.dispatch(UiEvent::DeletePressed).await.unwrap();
        assert_eq!(dialer.snapshot().number.digits(), "44");

        dialer.dispatch(UiEvent::DeleteLongPressed).await.unwrap();
        assert!(dialer.snapshot().number.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_held_press_is_classified() {
        let dialer = Dialer::new(DialerConfig::default()).unwrap();
        dialer.press_key_held('0', Duration::from_millis(499)).await.unwrap();
        dialer.press_key_held('0', Duration::from_millis(500)).await.unwrap();
        assert_eq!(dialer.snapshot().number.digits(), "0+");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_routes_call_events() {
        let dialer = Dialer::new(DialerConfig::default()).unwrap();

        let err = dialer.dispatch(UiEvent::CallPressed).await.unwrap_err();
        assert_eq!(err, DialerError::EmptyNumber);

        dialer.dispatch(UiEvent::SimulateIncoming).await.unwrap();
        assert_eq!(dialer.snapshot().screen(), Screen::Incoming);

        dialer.dispatch(UiEvent::AnswerPressed).await.unwrap();
        assert_eq!(dialer.snapshot().session.status(), Some(CallStatus::Connected));

        dialer.dispatch(UiEvent::MuteToggled).await.unwrap();
        dialer.dispatch(UiEvent::SpeakerToggled).await.unwrap();
        let session = dialer.snapshot().session;
        assert!(session.muted && session.speaker_on);

        dialer.dispatch(UiEvent::EndCallPressed).await.unwrap();
        assert_eq!(dialer.snapshot().screen(), Screen::Dialer);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_is_rejected() {
        let config = DialerConfig::default().with_max_number_length(0);
        assert!(matches!(Dialer::new(config), Err(DialerError::Configuration { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_after_shutdown_fail() {
        let dialer = Dialer::new(DialerConfig::default()).unwrap();
        dialer.shutdown().await.unwrap();

        assert_eq!(dialer.press_digit('1').await.unwrap_err(), DialerError::ShutDown);
        assert_eq!(dialer.place_call().await.unwrap_err(), DialerError::ShutDown);
    }
}
