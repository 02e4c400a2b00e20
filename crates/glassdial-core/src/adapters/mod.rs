//! Collaborators the controller talks to but does not implement
//!
//! - [`NativeDialer`] hands a number to the platform telephony facility.
//! - [`IncomingCallerSource`] supplies the caller of a simulated incoming call.
//! - [`AudioRoute`] is told about mute and speaker changes.
//!
//! Each comes with a default implementation so a dialer can run without any
//! platform integration.

pub mod audio;
pub mod caller;
pub mod dialer;

pub use audio::{AudioRoute, LoggingAudioRoute};
pub use caller::{Caller, FixedCallerSource, IncomingCallerSource, RotatingCallerSource};
pub use dialer::{tel_uri, CommandDialer, DialOutcome, NativeDialer, UnsupportedDialer};
