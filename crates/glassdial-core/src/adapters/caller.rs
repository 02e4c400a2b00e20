use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::CallerConfig;

/// Name and number of a simulated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub name: String,
    pub number: String,
}

impl Caller {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }
}

impl From<CallerConfig> for Caller {
    fn from(config: CallerConfig) -> Self {
        Self::new(config.name, config.number)
    }
}

/// Supplies the caller when an incoming call is simulated
pub trait IncomingCallerSource: Send + Sync {
    fn next_caller(&self) -> Caller;
}

/// Always presents the same caller
#[derive(Debug, Clone)]
pub struct FixedCallerSource {
    caller: Caller,
}

impl FixedCallerSource {
    pub fn new(caller: Caller) -> Self {
        Self { caller }
    }
}

impl IncomingCallerSource for FixedCallerSource {
    fn next_caller(&self) -> Caller {
        self.caller.clone()
    }
}

/// Cycles through a list of callers, one per simulated call
#[derive(Debug)]
pub struct RotatingCallerSource {
    callers: Vec<Caller>,
    next: AtomicUsize,
}

impl RotatingCallerSource {
    /// Returns `None` for an empty list
    pub fn new(callers: Vec<Caller>) -> Option<Self> {
        if callers.is_empty() {
            return None;
        }
        Some(Self {
            callers,
            next: AtomicUsize::new(0),
        })
    }
}

impl IncomingCallerSource for RotatingCallerSource {
    fn next_caller(&self) -> Caller {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.callers.len();
        self.callers[index].clone()
    }
}
