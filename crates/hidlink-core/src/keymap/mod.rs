//! Key translation tables for the input-injection clients.
//!
//! The canonical key representation is USB HID Usage IDs (page 0x07,
//! Keyboard/Keypad). Named keys and printable ASCII characters are resolved
//! to usage IDs at the client boundary; reports carry only usage IDs.

pub mod ascii;
pub mod usage;

pub use ascii::{key_press_for_char, KeyPress};
pub use usage::resolve_key_name;

use thiserror::Error;

/// Errors produced by key name and character translation.
#[derive(Debug, Error, PartialEq)]
pub enum KeymapError {
    /// The key name is not in the translation table.
    #[error("unknown key name: {0}")]
    UnknownKey(String),

    /// The character cannot be produced by a single keypress on a US layout.
    #[error("no keymap entry for character {0:?}")]
    UnmappedChar(char),
}
