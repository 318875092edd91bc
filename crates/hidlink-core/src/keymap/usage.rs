//! Named key to USB HID Usage ID resolution (page 0x07, Keyboard/Keypad).
//!
//! Key names follow the Linux input-event convention (`KEY_A`, `KEY_ENTER`,
//! `KEY_LEFTSHIFT`, ...), which is what the client binaries speak.
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07).
//!
//! # What is a HID Usage ID? (for beginners)
//!
//! The **USB Human Interface Device (HID)** standard assigns a unique number
//! to every key on a keyboard.  These numbers are called *Usage IDs* and they
//! are grouped by *Usage Page*.  All keyboard keys are on page 0x07
//! ("Keyboard/Keypad").
//!
//! For example:
//!
//! | Key          | HID Usage ID |
//! |--------------|-------------|
//! | Letter A     | 0x04        |
//! | Enter        | 0x28        |
//! | Left Ctrl    | 0xE0        |
//!
//! Notice that the code for A is 0x04, not 'A'=0x41 like ASCII.  Usage IDs
//! represent **physical key positions**, not characters: the character a key
//! produces depends on the host's keyboard layout and the modifiers held.
//! The paired host interprets the position codes, which is why a report
//! built here works regardless of what layout the host has configured.
//!
//! In the boot keyboard report the modifier keys (0xE0-0xE7) are normally
//! carried in the modifier bitmask byte rather than in a key slot, but the
//! table still resolves them so callers can name them uniformly.

use crate::keymap::KeymapError;

/// Resolves a Linux-style key name to its HID usage ID.
///
/// # Errors
///
/// Returns [`KeymapError::UnknownKey`] carrying the offending name if it is
/// not in the table.
pub fn resolve_key_name(name: &str) -> Result<u8, KeymapError> {
    let code = match name {
        // Letters (HID 0x04–0x1D)
        "KEY_A" => 0x04,
        "KEY_B" => 0x05,
        "KEY_C" => 0x06,
        "KEY_D" => 0x07,
        "KEY_E" => 0x08,
        "KEY_F" => 0x09,
        "KEY_G" => 0x0A,
        "KEY_H" => 0x0B,
        "KEY_I" => 0x0C,
        "KEY_J" => 0x0D,
        "KEY_K" => 0x0E,
        "KEY_L" => 0x0F,
        "KEY_M" => 0x10,
        "KEY_N" => 0x11,
        "KEY_O" => 0x12,
        "KEY_P" => 0x13,
        "KEY_Q" => 0x14,
        "KEY_R" => 0x15,
        "KEY_S" => 0x16,
        "KEY_T" => 0x17,
        "KEY_U" => 0x18,
        "KEY_V" => 0x19,
        "KEY_W" => 0x1A,
        "KEY_X" => 0x1B,
        "KEY_Y" => 0x1C,
        "KEY_Z" => 0x1D,

        // Digits (HID 0x1E–0x27)
        "KEY_1" => 0x1E,
        "KEY_2" => 0x1F,
        "KEY_3" => 0x20,
        "KEY_4" => 0x21,
        "KEY_5" => 0x22,
        "KEY_6" => 0x23,
        "KEY_7" => 0x24,
        "KEY_8" => 0x25,
        "KEY_9" => 0x26,
        "KEY_0" => 0x27,

        // Control and punctuation (HID 0x28–0x38)
        "KEY_ENTER" => 0x28,
        "KEY_ESC" => 0x29,
        "KEY_BACKSPACE" => 0x2A,
        "KEY_TAB" => 0x2B,
        "KEY_SPACE" => 0x2C,
        "KEY_MINUS" => 0x2D,
        "KEY_EQUAL" => 0x2E,
        "KEY_LEFTBRACE" => 0x2F,
        "KEY_RIGHTBRACE" => 0x30,
        "KEY_BACKSLASH" => 0x31,
        "KEY_SEMICOLON" => 0x33,
        "KEY_APOSTROPHE" => 0x34,
        "KEY_GRAVE" => 0x35,
        "KEY_COMMA" => 0x36,
        "KEY_DOT" => 0x37,
        "KEY_SLASH" => 0x38,

        // Lock keys
        "KEY_CAPSLOCK" => 0x39,

        // Function keys (HID 0x3A–0x45)
        "KEY_F1" => 0x3A,
        "KEY_F2" => 0x3B,
        "KEY_F3" => 0x3C,
        "KEY_F4" => 0x3D,
        "KEY_F5" => 0x3E,
        "KEY_F6" => 0x3F,
        "KEY_F7" => 0x40,
        "KEY_F8" => 0x41,
        "KEY_F9" => 0x42,
        "KEY_F10" => 0x43,
        "KEY_F11" => 0x44,
        "KEY_F12" => 0x45,

        // Navigation cluster (HID 0x46–0x52)
        "KEY_SYSRQ" => 0x46,
        "KEY_SCROLLLOCK" => 0x47,
        "KEY_PAUSE" => 0x48,
        "KEY_INSERT" => 0x49,
        "KEY_HOME" => 0x4A,
        "KEY_PAGEUP" => 0x4B,
        "KEY_DELETE" => 0x4C,
        "KEY_END" => 0x4D,
        "KEY_PAGEDOWN" => 0x4E,
        "KEY_RIGHT" => 0x4F,
        "KEY_LEFT" => 0x50,
        "KEY_DOWN" => 0x51,
        "KEY_UP" => 0x52,

        // Numpad (HID 0x53–0x63)
        "KEY_NUMLOCK" => 0x53,
        "KEY_KPSLASH" => 0x54,
        "KEY_KPASTERISK" => 0x55,
        "KEY_KPMINUS" => 0x56,
        "KEY_KPPLUS" => 0x57,
        "KEY_KPENTER" => 0x58,
        "KEY_KP1" => 0x59,
        "KEY_KP2" => 0x5A,
        "KEY_KP3" => 0x5B,
        "KEY_KP4" => 0x5C,
        "KEY_KP5" => 0x5D,
        "KEY_KP6" => 0x5E,
        "KEY_KP7" => 0x5F,
        "KEY_KP8" => 0x60,
        "KEY_KP9" => 0x61,
        "KEY_KP0" => 0x62,
        "KEY_KPDOT" => 0x63,

        // Application key (HID 0x65)
        "KEY_COMPOSE" => 0x65,

        // Modifier keys (HID 0xE0–0xE7)
        "KEY_LEFTCTRL" => 0xE0,
        "KEY_LEFTSHIFT" => 0xE1,
        "KEY_LEFTALT" => 0xE2,
        "KEY_LEFTMETA" => 0xE3,
        "KEY_RIGHTCTRL" => 0xE4,
        "KEY_RIGHTSHIFT" => 0xE5,
        "KEY_RIGHTALT" => 0xE6,
        "KEY_RIGHTMETA" => 0xE7,

        _ => return Err(KeymapError::UnknownKey(name.to_string())),
    };
    Ok(code)
}
