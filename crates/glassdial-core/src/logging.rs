//! Logging setup for applications embedding the dialer
//!
//! The dialer logs under the `glassdial_core` target. Transitions are at
//! `debug`, session start and end at `info`, and per-timer bookkeeping at
//! `trace` under `glassdial_core::timers`. [`setup_logging`] installs a
//! `tracing-subscriber` fmt subscriber whose filter keeps the host
//! application at one level and the dialer at another. `RUST_LOG` overrides
//! both when it is set.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{DialerError, DialerResult};

/// Log target of this crate
pub const CORE_TARGET: &str = "glassdial_core";

/// Logging configuration for a dialer application
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for everything outside the dialer core
    pub level: Level,
    /// Level for the dialer core itself
    pub core_level: Level,
    /// Keep per-timer `trace` lines when `core_level` is `TRACE`
    pub timer_traces: bool,
    /// Emit JSON lines
    pub json: bool,
    pub file_info: bool,
    /// Log when each `call_session` span opens and closes
    pub session_spans: bool,
    /// Name printed in the start-up line
    pub app_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            core_level: Level::INFO,
            timer_traces: false,
            json: false,
            file_info: false,
            session_spans: false,
            app_name: "glassdial".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn new(core_level: Level, app_name: impl Into<String>) -> Self {
        Self {
            core_level,
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    pub fn with_app_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_timer_traces(mut self) -> Self {
        self.timer_traces = true;
        self
    }

    pub fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn with_file_info(mut self) -> Self {
        self.file_info = true;
        self
    }

    pub fn with_session_spans(mut self) -> Self {
        self.session_spans = true;
        self
    }

    /// Filter directives used when `RUST_LOG` is not set
    pub fn filter_directives(&self) -> Vec<String> {
        let mut directives = vec![
            level_name(self.level),
            format!("{}={}", CORE_TARGET, level_name(self.core_level)),
        ];
        if self.core_level == Level::TRACE && !self.timer_traces {
            directives.push(format!("{}::timers=debug", CORE_TARGET));
        }
        directives
    }

    fn env_filter(&self) -> DialerResult<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(self.filter_directives().join(","))
            .map_err(|e| DialerError::config(format!("Invalid log filter: {}", e)))
    }
}

fn level_name(level: Level) -> String {
    level.as_str().to_ascii_lowercase()
}

/// Install the global subscriber
///
/// Only one subscriber can be installed per process; a second call returns
/// a configuration error.
pub fn setup_logging(config: LoggingConfig) -> DialerResult<()> {
    let span_events = if config.session_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let builder = fmt::Subscriber::builder()
        .with_env_filter(config.env_filter()?)
        .with_span_events(span_events)
        .with_file(config.file_info)
        .with_line_number(config.file_info);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| DialerError::config(format!("Logging is already set up: {}", e)))?;

    tracing::info!(target: CORE_TARGET, "Starting {} on glassdial-core v{}", config.app_name, crate::VERSION);
    Ok(())
}

/// Parse a log level such as `debug` or `WARN`
pub fn parse_log_level(level: &str) -> DialerResult<Level> {
    Level::from_str(level).map_err(|_| DialerError::config(format!("Invalid log level: {}", level)))
}
