//! Cancellable, generation-tagged timers owned by the call session
//!
//! The controller is the only owner of timer handles. Each armed timer runs
//! as its own task and reports back through a channel with the
//! [`Generation`] it was armed in. [`TimerSet::cancel_all`] aborts every
//! task and moves to a new generation, so a fire that was already queued
//! before the abort is recognised as stale and dropped.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{trace, warn};

/// What a timer drives
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Calling -> Ringing (T1)
    Dial,
    /// Ringing -> Connected (T2)
    Ring,
    /// Periodic call duration tick
    DurationTick,
}

/// Session generation a timer belongs to
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// A timer expiry delivered to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub generation: Generation,
    pub kind: TimerKind,
}

/// The set of live timers of the current session generation
pub struct TimerSet {
    generation: Generation,
    handles: Vec<(TimerKind, JoinHandle<()>)>,
    tx: mpsc::UnboundedSender<TimerFired>,
}

impl TimerSet {
    pub fn new(tx: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            generation: Generation::default(),
            handles: Vec::new(),
            tx,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether a fire belongs to the current generation
    pub fn is_current(&self, fired: &TimerFired) -> bool {
        fired.generation == self.generation
    }

    /// Arm a one-shot timer
    pub fn arm(&mut self, kind: TimerKind, delay: Duration) {
        self.prune();
        let fired = TimerFired {
            generation: self.generation,
            kind,
        };
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(fired);
        });
        trace!("Armed {:?} timer for {:?} in {}", kind, delay, self.generation);
        self.handles.push((kind, handle));
    }

    /// Start the duration ticker unless one is already running
    ///
    /// The first tick arrives one full `period` after the start.
    pub fn start_ticker(&mut self, period: Duration) -> bool {
        self.prune();
        if self.has_ticker() {
            return false;
        }
        let Some(first_tick) = Instant::now().checked_add(period) else {
            warn!("Duration ticker period {:?} is out of range", period);
            return false;
        };
        let fired = TimerFired {
            generation: self.generation,
            kind: TimerKind::DurationTick,
        };
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(fired).is_err() {
                    break;
                }
            }
        });
        trace!("Started duration ticker every {:?} in {}", period, self.generation);
        self.handles.push((TimerKind::DurationTick, handle));
        true
    }

    pub fn has_ticker(&self) -> bool {
        self.handles
            .iter()
            .any(|(kind, handle)| *kind == TimerKind::DurationTick && !handle.is_finished())
    }

    /// Number of timers that have not fired or been cancelled yet
    pub fn active_count(&self) -> usize {
        self.handles.iter().filter(|(_, handle)| !handle.is_finished()).count()
    }

    /// Abort every timer and start a new generation
    ///
    /// Returns how many timers were still pending.
    pub fn cancel_all(&mut self) -> usize {
        let pending = self.active_count();
        for (_, handle) in self.handles.drain(..) {
            handle.abort();
        }
        let previous = self.generation;
        self.generation = previous.next();
        trace!("Cancelled {} pending timers, {} -> {}", pending, previous, self.generation);
        pending
    }

    fn prune(&mut self) {
        self.handles.retain(|(_, handle)| !handle.is_finished());
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        for (_, handle) in &self.handles {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer_set() -> (TimerSet, mpsc::UnboundedReceiver<TimerFired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TimerSet::new(tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_fires_once_after_delay() {
        let (mut timers, mut rx) = timer_set();
        timers.arm(TimerKind::Dial, Duration::from_millis(1500));

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert!(rx.try_recv().is_err());

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.kind, TimerKind::Dial);
        assert!(timers.is_current(&fired));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_prevents_fire_and_bumps_generation() {
        let (mut timers, mut rx) = timer_set();
        let first = timers.generation();
        timers.arm(TimerKind::Dial, Duration::from_millis(100));
        timers.arm(TimerKind::Ring, Duration::from_millis(200));

        assert_eq!(timers.cancel_all(), 2);
        assert_eq!(timers.generation(), first.next());
        assert_eq!(timers.active_count(), 0);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_from_old_generation_is_stale() {
        let (mut timers, mut rx) = timer_set();
        timers.arm(TimerKind::Dial, Duration::from_millis(10));
        let fired = rx.recv().await.unwrap();

        timers.cancel_all();
        assert!(!timers.is_current(&fired));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_ticks_every_period() {
        let (mut timers, mut rx) = timer_set();
        let start = Instant::now();
        assert!(timers.start_ticker(Duration::from_secs(1)));

        for expected in 1..=3u64 {
            let fired = rx.recv().await.unwrap();
            assert_eq!(fired.kind, TimerKind::DurationTick);
            assert_eq!(start.elapsed().as_secs(), expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_ticker_is_refused() {
        let (mut timers, _rx) = timer_set();
        assert!(!timers.start_ticker(Duration::MAX));
        assert!(!timers.has_ticker());
        assert!(timers.start_ticker(Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_one_ticker_per_generation() {
        let (mut timers, mut rx) = timer_set();
        assert!(timers.start_ticker(Duration::from_secs(1)));
        assert!(!timers.start_ticker(Duration::from_secs(1)));
        assert!(timers.has_ticker());

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 2);

        timers.cancel_all();
        assert!(!timers.has_ticker());
        assert!(timers.start_ticker(Duration::from_secs(1)));
    }
}
