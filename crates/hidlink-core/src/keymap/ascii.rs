//! Printable ASCII to keypress translation for text-style input.
//!
//! Assumes a US keyboard layout on the paired host, matching the boot
//! keyboard descriptor the daemon advertises. Shifted symbols resolve to
//! their base key plus left shift.

use crate::keymap::usage::resolve_key_name;
use crate::keymap::KeymapError;
use crate::report::ModifierFlags;

/// A resolved single keypress: the usage ID plus the modifiers required to
/// produce the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// HID usage ID of the key to press.
    pub code: u8,
    /// Modifiers that must be held while the key is down.
    pub modifiers: ModifierFlags,
}

/// Translates one printable ASCII character into the keypress that produces
/// it on a US layout.
///
/// Uppercase letters and shifted symbols (`!`, `@`, `{`, ...) carry
/// [`ModifierFlags::LEFT_SHIFT`]; everything else has empty modifiers.
///
/// # Errors
///
/// Returns [`KeymapError::UnmappedChar`] for characters a US keyboard cannot
/// produce with a single keypress (control characters, non-ASCII).
pub fn key_press_for_char(c: char) -> Result<KeyPress, KeymapError> {
    let (name, shifted) = char_key_name(c).ok_or(KeymapError::UnmappedChar(c))?;
    let code = resolve_key_name(name)?;
    let modifiers = if shifted {
        ModifierFlags(ModifierFlags::LEFT_SHIFT)
    } else {
        ModifierFlags::default()
    };
    Ok(KeyPress { code, modifiers })
}

/// US-layout table: character to (key name, shift required).
fn char_key_name(c: char) -> Option<(&'static str, bool)> {
    let entry = match c {
        // Letters: shift for uppercase
        'a' | 'A' => ("KEY_A", c.is_ascii_uppercase()),
        'b' | 'B' => ("KEY_B", c.is_ascii_uppercase()),
        'c' | 'C' => ("KEY_C", c.is_ascii_uppercase()),
        'd' | 'D' => ("KEY_D", c.is_ascii_uppercase()),
        'e' | 'E' => ("KEY_E", c.is_ascii_uppercase()),
        'f' | 'F' => ("KEY_F", c.is_ascii_uppercase()),
        'g' | 'G' => ("KEY_G", c.is_ascii_uppercase()),
        'h' | 'H' => ("KEY_H", c.is_ascii_uppercase()),
        'i' | 'I' => ("KEY_I", c.is_ascii_uppercase()),
        'j' | 'J' => ("KEY_J", c.is_ascii_uppercase()),
        'k' | 'K' => ("KEY_K", c.is_ascii_uppercase()),
        'l' | 'L' => ("KEY_L", c.is_ascii_uppercase()),
        'm' | 'M' => ("KEY_M", c.is_ascii_uppercase()),
        'n' | 'N' => ("KEY_N", c.is_ascii_uppercase()),
        'o' | 'O' => ("KEY_O", c.is_ascii_uppercase()),
        'p' | 'P' => ("KEY_P", c.is_ascii_uppercase()),
        'q' | 'Q' => ("KEY_Q", c.is_ascii_uppercase()),
        'r' | 'R' => ("KEY_R", c.is_ascii_uppercase()),
        's' | 'S' => ("KEY_S", c.is_ascii_uppercase()),
        't' | 'T' => ("KEY_T", c.is_ascii_uppercase()),
        'u' | 'U' => ("KEY_U", c.is_ascii_uppercase()),
        'v' | 'V' => ("KEY_V", c.is_ascii_uppercase()),
        'w' | 'W' => ("KEY_W", c.is_ascii_uppercase()),
        'x' | 'X' => ("KEY_X", c.is_ascii_uppercase()),
        'y' | 'Y' => ("KEY_Y", c.is_ascii_uppercase()),
        'z' | 'Z' => ("KEY_Z", c.is_ascii_uppercase()),

        // Digit row, unshifted and shifted
        '1' => ("KEY_1", false),
        '2' => ("KEY_2", false),
        '3' => ("KEY_3", false),
        '4' => ("KEY_4", false),
        '5' => ("KEY_5", false),
        '6' => ("KEY_6", false),
        '7' => ("KEY_7", false),
        '8' => ("KEY_8", false),
        '9' => ("KEY_9", false),
        '0' => ("KEY_0", false),
        '!' => ("KEY_1", true),
        '@' => ("KEY_2", true),
        '#' => ("KEY_3", true),
        '$' => ("KEY_4", true),
        '%' => ("KEY_5", true),
        '^' => ("KEY_6", true),
        '&' => ("KEY_7", true),
        '*' => ("KEY_8", true),
        '(' => ("KEY_9", true),
        ')' => ("KEY_0", true),

        // Punctuation, unshifted and shifted
        ' ' => ("KEY_SPACE", false),
        '-' => ("KEY_MINUS", false),
        '_' => ("KEY_MINUS", true),
        '=' => ("KEY_EQUAL", false),
        '+' => ("KEY_EQUAL", true),
        '[' => ("KEY_LEFTBRACE", false),
        '{' => ("KEY_LEFTBRACE", true),
        ']' => ("KEY_RIGHTBRACE", false),
        '}' => ("KEY_RIGHTBRACE", true),
        '\\' => ("KEY_BACKSLASH", false),
        '|' => ("KEY_BACKSLASH", true),
        ';' => ("KEY_SEMICOLON", false),
        ':' => ("KEY_SEMICOLON", true),
        '\'' => ("KEY_APOSTROPHE", false),
        '"' => ("KEY_APOSTROPHE", true),
        '`' => ("KEY_GRAVE", false),
        '~' => ("KEY_GRAVE", true),
        ',' => ("KEY_COMMA", false),
        '<' => ("KEY_COMMA", true),
        '.' => ("KEY_DOT", false),
        '>' => ("KEY_DOT", true),
        '/' => ("KEY_SLASH", false),
        '?' => ("KEY_SLASH", true),

        _ => return None,
    };
    Some(entry)
}
