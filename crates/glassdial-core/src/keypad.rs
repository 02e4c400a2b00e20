//! Dial pad layout and press handling
//!
//! The rendering layer reports raw presses together with how long they were
//! held. [`classify_press`] turns the hold time into a tap or a long press,
//! and [`Keypad::edit_for`] / [`delete_edit`] decide which number edit a
//! press stands for. Holding `0` inserts `+`; holding delete clears the whole
//! number, so clearing always takes a deliberate sustained press.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::number::EditOp;

/// Tap or long press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressKind {
    Tap,
    LongPress,
}

/// Classify a press by how long it was held
pub fn classify_press(held: Duration, long_press: Duration) -> PressKind {
    if held >= long_press {
        PressKind::LongPress
    } else {
        PressKind::Tap
    }
}

/// A single key on the dial pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Key {
    /// Symbol appended when the key is tapped
    pub symbol: char,
    /// Caption printed under the symbol
    pub letters: &'static str,
}

impl Key {
    const fn new(symbol: char, letters: &'static str) -> Self {
        Self { symbol, letters }
    }
}

/// The 4×3 telephone keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Keypad {
    pub rows: [[Key; 3]; 4],
}

/// Standard keypad layout with E.161 letter groups
pub static KEYPAD: Keypad = Keypad {
    rows: [
        [Key::new('1', ""), Key::new('2', "ABC"), Key::new('3', "DEF")],
        [Key::new('4', "GHI"), Key::new('5', "JKL"), Key::new('6', "MNO")],
        [Key::new('7', "PQRS"), Key::new('8', "TUV"), Key::new('9', "WXYZ")],
        [Key::new('*', ""), Key::new('0', "+"), Key::new('#', "")],
    ],
};

impl Keypad {
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.rows.iter().flatten()
    }

    pub fn key(&self, symbol: char) -> Option<&Key> {
        self.keys().find(|key| key.symbol == symbol)
    }

    /// The edit a press on `symbol` stands for, if `symbol` is on the pad
    ///
    /// Only `0` has a long-press action; holding any other key types it.
    pub fn edit_for(&self, symbol: char, press: PressKind) -> Option<EditOp> {
        let key = self.key(symbol)?;
        match (key.symbol, press) {
            ('0', PressKind::LongPress) => Some(EditOp::AppendPlus),
            (symbol, _) => Some(EditOp::Append(symbol)),
        }
    }
}

/// The edit a press on the delete control stands for
pub fn delete_edit(press: PressKind) -> EditOp {
    match press {
        PressKind::Tap => EditOp::DeleteLast,
        PressKind::LongPress => EditOp::Clear,
    }
}
