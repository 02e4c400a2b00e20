//! Dialer configuration
//!
//! All timing constants of the simulated call progression live here, together
//! with the number editor bound and the demo caller used for simulated
//! incoming calls. Every field has a default, so a YAML document only needs
//! to name what it overrides.
//!
//! ```rust
//! use glassdial_core::config::DialerConfig;
//!
//! let config = DialerConfig::from_yaml_str("dial_delay_ms: 500\n").unwrap();
//! assert_eq!(config.dial_delay_ms, 500);
//! assert_eq!(config.ring_delay_ms, 2000);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DialerError, DialerResult};

/// Upper bound on `max_number_length`
pub const MAX_NUMBER_LENGTH: usize = 64;

/// Upper bound on every delay and interval, one hour
pub const MAX_DELAY_MS: u64 = 60 * 60 * 1000;

/// Upper bound on the event channel capacity
pub const MAX_EVENT_CAPACITY: usize = 65_536;

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn check_range(field: &str, value: u64, min: u64, max: u64) -> DialerResult<()> {
    if value < min {
        return Err(DialerError::config(format!("{} must be at least {}, got {}", field, min, value)));
    }
    if value > max {
        return Err(DialerError::config(format!("{} must be at most {}, got {}", field, max, value)));
    }
    Ok(())
}

/// Name and number presented by a simulated incoming call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerConfig {
    pub name: String,
    pub number: String,
}

impl Default for CallerConfig {
    fn default() -> Self {
        Self {
            name: "Jane Smith".to_string(),
            number: "+1 (555) 987-6543".to_string(),
        }
    }
}

/// Dialer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialerConfig {
    /// Maximum number of characters in the number buffer
    pub max_number_length: usize,
    /// Delay between placing a call and the remote ringing (T1)
    pub dial_delay_ms: u64,
    /// Delay between ringing and the call connecting (T2)
    pub ring_delay_ms: u64,
    /// Period of the call duration ticker
    pub tick_interval_ms: u64,
    /// Minimum hold time for a press to count as a long press
    pub long_press_ms: u64,
    /// Whether placing a call empties the number buffer
    pub clear_number_on_call: bool,
    /// Caller presented by `simulate_incoming`
    pub demo_caller: CallerConfig,
    /// Capacity of the event broadcast channel
    pub event_capacity: usize,
}

impl Default for DialerConfig {
    fn default() -> Self {
        Self {
            max_number_length: 15,
            dial_delay_ms: 1500,
            ring_delay_ms: 2000,
            tick_interval_ms: 1000,
            long_press_ms: 500,
            clear_number_on_call: true,
            demo_caller: CallerConfig::default(),
            event_capacity: 256,
        }
    }
}

impl DialerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_number_length(mut self, max: usize) -> Self {
        self.max_number_length = max;
        self
    }

    /// Set both simulated progression delays at once
    pub fn with_progression(mut self, dial_delay: Duration, ring_delay: Duration) -> Self {
        self.dial_delay_ms = millis(dial_delay);
        self.ring_delay_ms = millis(ring_delay);
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = millis(interval);
        self
    }

    pub fn with_demo_caller(mut self, name: impl Into<String>, number: impl Into<String>) -> Self {
        self.demo_caller = CallerConfig {
            name: name.into(),
            number: number.into(),
        };
        self
    }

    pub fn with_clear_number_on_call(mut self, clear: bool) -> Self {
        self.clear_number_on_call = clear;
        self
    }

    pub fn dial_delay(&self) -> Duration {
        Duration::from_millis(self.dial_delay_ms)
    }

    pub fn ring_delay(&self) -> Duration {
        Duration::from_millis(self.ring_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    /// Check the configuration for values the controller cannot run with
    pub fn validate(&self) -> DialerResult<()> {
        check_range("max_number_length", self.max_number_length as u64, 1, MAX_NUMBER_LENGTH as u64)?;
        check_range("dial_delay_ms", self.dial_delay_ms, 0, MAX_DELAY_MS)?;
        check_range("ring_delay_ms", self.ring_delay_ms, 0, MAX_DELAY_MS)?;
        check_range("tick_interval_ms", self.tick_interval_ms, 1, MAX_DELAY_MS)?;
        check_range("long_press_ms", self.long_press_ms, 1, MAX_DELAY_MS)?;
        check_range("event_capacity", self.event_capacity as u64, 1, MAX_EVENT_CAPACITY as u64)?;
        Ok(())
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> DialerResult<Self> {
        let config: DialerConfig = serde_yaml::from_str(yaml)
            .map_err(|e| DialerError::config(format!("Invalid dialer config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> DialerResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DialerError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }
}
