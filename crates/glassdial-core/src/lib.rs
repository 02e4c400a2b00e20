//! # glassdial-core
//!
//! Call session core of the glassdial phone dialer.
//!
//! The crate holds two cooperating state machines:
//!
//! - the **number editor** ([`number`], [`keypad`]) owns the number being
//!   composed and its bounded edit operations;
//! - the **call session controller** ([`controller`], [`state_table`],
//!   [`timers`]) decides which screen is showing and drives a simulated call
//!   through `Calling`, `Ringing` and `Connected` on cancellable timers.
//!
//! [`Dialer`] runs the controller on its own task and is the entry point for
//! applications. Rendering is left to the application: [`view::render`] turns
//! the current [`DialerSnapshot`] into a [`DialerView`] description, and the
//! platform side plugs in through the traits in [`adapters`].
//!
//! ```rust,no_run
//! use glassdial_core::{Dialer, DialerConfig, DialerView, UiEvent};
//!
//! # async fn example() -> glassdial_core::DialerResult<()> {
//! let dialer = Dialer::new(DialerConfig::default())?;
//! dialer.dispatch(UiEvent::SimulateIncoming).await?;
//! dialer.dispatch(UiEvent::AnswerPressed).await?;
//!
//! if let DialerView::InCall { contact_name, status_text, .. } = dialer.view() {
//!     println!("{} {}", contact_name, status_text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod controller;
pub mod dialer;
pub mod error;
pub mod events;
pub mod keypad;
pub mod logging;
pub mod number;
pub mod session;
pub mod state_table;
pub mod timers;
pub mod view;

pub use adapters::{
    AudioRoute, Caller, CommandDialer, DialOutcome, FixedCallerSource, IncomingCallerSource, NativeDialer,
    UnsupportedDialer,
};
pub use config::{CallerConfig, DialerConfig};
pub use controller::{CallSessionController, Collaborators, DialerSnapshot};
pub use dialer::{Dialer, DialerBuilder, UiEvent};
pub use error::{DialerError, DialerResult, Notice, NoticeLevel};
pub use events::{DialerEvent, EventIterator, EventStream};
pub use keypad::{PressKind, KEYPAD};
pub use number::{format_for_display, EditOp, NumberBuffer};
pub use session::{format_duration, CallSession, CallStatus, Screen, SessionId, SessionState};
pub use view::{render, DialerView};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
