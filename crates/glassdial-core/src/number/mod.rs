//! The number being composed on the dialer screen
//!
//! [`NumberBuffer`] holds the raw dialed text and enforces the length bound.
//! Every edit operation is total: an edit that cannot apply leaves the buffer
//! untouched and reports that through its `bool` return value, so callers can
//! decide whether a change notification is due.
//!
//! ```rust
//! use glassdial_core::number::{NumberBuffer, format_for_display};
//!
//! let mut number = NumberBuffer::new(15);
//! for digit in "5551234567".chars() {
//!     number.append_digit(digit);
//! }
//! assert_eq!(format_for_display(number.digits()), "(555) 123-4567");
//!
//! number.delete_last();
//! assert_eq!(number.digits(), "555123456");
//! ```

mod format;

pub use format::format_for_display;

use serde::{Deserialize, Serialize};

/// Default bound on the number of dialed characters
pub const DEFAULT_MAX_LENGTH: usize = 15;

/// An edit the user can apply to the number buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOp {
    /// Append a key symbol (`0-9`, `*`, `#`)
    Append(char),
    /// Append the international prefix `+`
    AppendPlus,
    /// Remove the last character
    DeleteLast,
    /// Remove everything
    Clear,
}

/// In-progress dialed number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberBuffer {
    digits: String,
    max_length: usize,
}

impl Default for NumberBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl NumberBuffer {
    pub fn new(max_length: usize) -> Self {
        Self {
            digits: String::new(),
            max_length,
        }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Number of dialed characters
    pub fn len(&self) -> usize {
        self.digits.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.max_length
    }

    /// Append a key symbol unless the buffer is full
    ///
    /// The symbol itself is not validated; the keypad only produces `0-9`,
    /// `*` and `#`.
    pub fn append_digit(&mut self, digit: char) -> bool {
        if self.is_full() {
            return false;
        }
        self.digits.push(digit);
        true
    }

    /// Append `+` unless the buffer is full
    pub fn append_plus(&mut self) -> bool {
        self.append_digit('+')
    }

    pub fn delete_last(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    pub fn clear(&mut self) -> bool {
        if self.digits.is_empty() {
            return false;
        }
        self.digits.clear();
        true
    }

    /// Apply an edit, returning whether the buffer changed
    pub fn apply(&mut self, op: EditOp) -> bool {
        match op {
            EditOp::Append(digit) => self.append_digit(digit),
            EditOp::AppendPlus => self.append_plus(),
            EditOp::DeleteLast => self.delete_last(),
            EditOp::Clear => self.clear(),
        }
    }

    /// Take the current contents, leaving the buffer empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.digits)
    }

    pub fn formatted(&self) -> String {
        format_for_display(&self.digits)
    }
}
