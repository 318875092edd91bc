//! Boot-protocol HID input reports.
//!
//! Wire format (BTHID DATA header + report ID + payload):
//! ```text
//! keyboard: [0xA1][0x01][modifiers:1][reserved:1][key:1]×6   = 10 bytes
//! mouse:    [0xA1][0x02][buttons:1][dx:1][dy:1][wheel:1]     =  6 bytes
//! ```
//! Signed mouse fields are two's-complement bytes. The layouts mirror the
//! boot report descriptors advertised in the daemon's SDP record, so an
//! encoded report is written to the interrupt channel verbatim.

use thiserror::Error;

// ── Report constants ──────────────────────────────────────────────────────────

/// BTHID DATA frame header for host-bound input reports.
pub const DATA_INPUT_HEADER: u8 = 0xA1;

/// Report ID of the boot keyboard report.
pub const REPORT_ID_KEYBOARD: u8 = 0x01;

/// Report ID of the boot mouse report.
pub const REPORT_ID_MOUSE: u8 = 0x02;

/// Total size of an encoded keyboard report in bytes.
pub const KEYBOARD_REPORT_LEN: usize = 10;

/// Total size of an encoded mouse report in bytes.
pub const MOUSE_REPORT_LEN: usize = 6;

/// Number of concurrent non-modifier key slots in a keyboard report.
pub const KEY_SLOTS: usize = 6;

/// Errors that can occur when building a report from caller input.
#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    /// More keys were supplied than the boot keyboard report can carry.
    #[error("too many keys for a boot report: limit is 6, got {requested}")]
    TooManyKeys { requested: usize },
}

// ── Modifier and button bitmasks ──────────────────────────────────────────────

/// Modifier byte of the boot keyboard report.
///
/// Bit layout:
/// - Bit 0: Left Ctrl
/// - Bit 1: Left Shift
/// - Bit 2: Left Alt
/// - Bit 3: Left Meta (Windows/Command/Super)
/// - Bit 4: Right Ctrl
/// - Bit 5: Right Shift
/// - Bit 6: Right Alt
/// - Bit 7: Right Meta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierFlags(pub u8);

impl ModifierFlags {
    pub const LEFT_CTRL: u8 = 1 << 0;
    pub const LEFT_SHIFT: u8 = 1 << 1;
    pub const LEFT_ALT: u8 = 1 << 2;
    pub const LEFT_META: u8 = 1 << 3;
    pub const RIGHT_CTRL: u8 = 1 << 4;
    pub const RIGHT_SHIFT: u8 = 1 << 5;
    pub const RIGHT_ALT: u8 = 1 << 6;
    pub const RIGHT_META: u8 = 1 << 7;

    /// Returns `true` if either Ctrl modifier is active.
    pub fn ctrl(&self) -> bool {
        self.0 & (Self::LEFT_CTRL | Self::RIGHT_CTRL) != 0
    }

    /// Returns `true` if either Shift modifier is active.
    pub fn shift(&self) -> bool {
        self.0 & (Self::LEFT_SHIFT | Self::RIGHT_SHIFT) != 0
    }

    /// Returns `true` if either Alt modifier is active.
    pub fn alt(&self) -> bool {
        self.0 & (Self::LEFT_ALT | Self::RIGHT_ALT) != 0
    }

    /// Returns `true` if either Meta (Win/Cmd/Super) modifier is active.
    pub fn meta(&self) -> bool {
        self.0 & (Self::LEFT_META | Self::RIGHT_META) != 0
    }
}

/// Button byte of the boot mouse report.
///
/// Bit layout: bit 0 = left, bit 1 = right, bit 2 = middle. Bits 3-7 are
/// unused by the boot protocol and pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseButtons(pub u8);

impl MouseButtons {
    pub const LEFT: u8 = 1 << 0;
    pub const RIGHT: u8 = 1 << 1;
    pub const MIDDLE: u8 = 1 << 2;

    /// Returns `true` if the given button bit is held.
    pub fn pressed(&self, button: u8) -> bool {
        self.0 & button != 0
    }
}

// ── Keyboard report ───────────────────────────────────────────────────────────

/// One boot-protocol keyboard input report.
///
/// Key slots are filled front to back; unused slots stay zero. The
/// all-default value is the "everything released" report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardReport {
    /// Active modifier keys.
    pub modifiers: ModifierFlags,
    /// HID usage IDs of up to six concurrently pressed keys.
    pub keys: [u8; KEY_SLOTS],
}

impl KeyboardReport {
    /// Builds a report from the set of currently pressed key usage IDs.
    ///
    /// Slot order follows the order of `codes`; remaining slots are zero.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::TooManyKeys`] if more than [`KEY_SLOTS`] codes
    /// are supplied. The boot protocol has no rollover encoding beyond six
    /// keys, so oversized input is rejected rather than silently truncated.
    pub fn from_codes(modifiers: ModifierFlags, codes: &[u8]) -> Result<Self, ReportError> {
        if codes.len() > KEY_SLOTS {
            return Err(ReportError::TooManyKeys {
                requested: codes.len(),
            });
        }
        let mut keys = [0u8; KEY_SLOTS];
        keys[..codes.len()].copy_from_slice(codes);
        Ok(KeyboardReport { modifiers, keys })
    }

    /// Builds a single-key press report.
    pub fn key_down(code: u8, modifiers: ModifierFlags) -> Self {
        let mut keys = [0u8; KEY_SLOTS];
        keys[0] = code;
        KeyboardReport { modifiers, keys }
    }

    /// Builds the all-keys-released report. Modifiers are cleared too.
    pub fn release() -> Self {
        KeyboardReport::default()
    }

    /// Encodes this report into its 10-byte wire form.
    pub fn encode(&self) -> [u8; KEYBOARD_REPORT_LEN] {
        let mut buf = [0u8; KEYBOARD_REPORT_LEN];
        buf[0] = DATA_INPUT_HEADER;
        buf[1] = REPORT_ID_KEYBOARD;
        buf[2] = self.modifiers.0;
        // buf[3] is the reserved byte, always zero
        buf[4..].copy_from_slice(&self.keys);
        buf
    }
}

// ── Mouse report ──────────────────────────────────────────────────────────────

/// One boot-protocol mouse input report.
///
/// Deltas are relative to the previous report and clamp at the i8 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseReport {
    /// Currently held buttons.
    pub buttons: MouseButtons,
    /// Horizontal movement (positive = right).
    pub dx: i8,
    /// Vertical movement (positive = down).
    pub dy: i8,
    /// Wheel movement (positive = away from the user).
    pub wheel: i8,
}

impl MouseReport {
    pub fn new(buttons: MouseButtons, dx: i8, dy: i8, wheel: i8) -> Self {
        MouseReport {
            buttons,
            dx,
            dy,
            wheel,
        }
    }

    /// Encodes this report into its 6-byte wire form.
    pub fn encode(&self) -> [u8; MOUSE_REPORT_LEN] {
        [
            DATA_INPUT_HEADER,
            REPORT_ID_MOUSE,
            self.buttons.0,
            self.dx as u8,
            self.dy as u8,
            self.wheel as u8,
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Keyboard layout ──────────────────────────────────────────────────────

    #[test]
    fn test_keyboard_report_has_fixed_length_and_header() {
        let bytes = KeyboardReport::key_down(0x04, ModifierFlags::default()).encode();
        assert_eq!(bytes.len(), KEYBOARD_REPORT_LEN);
        assert_eq!(bytes[0], DATA_INPUT_HEADER);
        assert_eq!(bytes[1], REPORT_ID_KEYBOARD);
    }

    #[test]
    fn test_keyboard_modifier_byte_at_offset_2() {
        let report = KeyboardReport::key_down(0x04, ModifierFlags(ModifierFlags::LEFT_SHIFT));
        let bytes = report.encode();
        assert_eq!(bytes[2], ModifierFlags::LEFT_SHIFT);
    }

    #[test]
    fn test_keyboard_reserved_byte_stays_zero() {
        let report = KeyboardReport::from_codes(
            ModifierFlags(0xFF),
            &[0x04, 0x05, 0x06, 0x07, 0x08, 0x09],
        )
        .expect("six keys must fit");
        assert_eq!(report.encode()[3], 0x00);
    }

    #[test]
    fn test_keyboard_key_slots_fill_in_order() {
        let report = KeyboardReport::from_codes(ModifierFlags::default(), &[0x04, 0x05, 0x06])
            .expect("three keys must fit");
        let bytes = report.encode();
        assert_eq!(&bytes[4..10], &[0x04, 0x05, 0x06, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_from_codes_accepts_exactly_six_keys() {
        let codes = [0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let report = KeyboardReport::from_codes(ModifierFlags::default(), &codes)
            .expect("six keys is the boot protocol maximum");
        assert_eq!(report.keys, codes);
    }

    #[test]
    fn test_from_codes_rejects_seven_keys() {
        let codes = [0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];
        let result = KeyboardReport::from_codes(ModifierFlags::default(), &codes);
        assert_eq!(result, Err(ReportError::TooManyKeys { requested: 7 }));
    }

    #[test]
    fn test_from_codes_empty_slice_gives_release_payload() {
        let report = KeyboardReport::from_codes(ModifierFlags::default(), &[])
            .expect("empty input is valid");
        assert_eq!(report, KeyboardReport::release());
    }

    #[test]
    fn test_release_encodes_all_zero_payload() {
        let bytes = KeyboardReport::release().encode();
        assert_eq!(bytes[0], DATA_INPUT_HEADER);
        assert_eq!(bytes[1], REPORT_ID_KEYBOARD);
        assert!(bytes[2..].iter().all(|&b| b == 0), "payload must be all zero");
    }

    #[test]
    fn test_release_equals_key_down_of_zero() {
        assert_eq!(
            KeyboardReport::release().encode(),
            KeyboardReport::key_down(0x00, ModifierFlags::default()).encode()
        );
    }

    #[test]
    fn test_key_down_sets_first_slot_only() {
        let bytes = KeyboardReport::key_down(0x28, ModifierFlags::default()).encode();
        assert_eq!(bytes[4], 0x28);
        assert!(bytes[5..].iter().all(|&b| b == 0));
    }

    // ── Modifier helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_modifier_helpers_detect_both_sides() {
        assert!(ModifierFlags(ModifierFlags::LEFT_CTRL).ctrl());
        assert!(ModifierFlags(ModifierFlags::RIGHT_CTRL).ctrl());
        assert!(ModifierFlags(ModifierFlags::LEFT_SHIFT).shift());
        assert!(ModifierFlags(ModifierFlags::RIGHT_SHIFT).shift());
        assert!(ModifierFlags(ModifierFlags::LEFT_ALT).alt());
        assert!(ModifierFlags(ModifierFlags::RIGHT_ALT).alt());
        assert!(ModifierFlags(ModifierFlags::LEFT_META).meta());
        assert!(ModifierFlags(ModifierFlags::RIGHT_META).meta());
        assert!(!ModifierFlags::default().ctrl());
        assert!(!ModifierFlags::default().shift());
    }

    // ── Mouse layout ─────────────────────────────────────────────────────────

    #[test]
    fn test_mouse_report_has_fixed_length_and_header() {
        let bytes = MouseReport::new(MouseButtons(MouseButtons::LEFT), 0, 0, 0).encode();
        assert_eq!(bytes.len(), MOUSE_REPORT_LEN);
        assert_eq!(bytes[0], DATA_INPUT_HEADER);
        assert_eq!(bytes[1], REPORT_ID_MOUSE);
        assert_eq!(bytes[2], MouseButtons::LEFT);
    }

    #[test]
    fn test_mouse_negative_deltas_encode_twos_complement() {
        let bytes = MouseReport::new(MouseButtons::default(), -1, -128, -5).encode();
        assert_eq!(bytes[3], 0xFF);
        assert_eq!(bytes[4], 0x80);
        assert_eq!(bytes[5], 0xFB);
    }

    #[test]
    fn test_mouse_positive_deltas_encode_verbatim() {
        let bytes = MouseReport::new(MouseButtons::default(), 127, 1, 3).encode();
        assert_eq!(bytes[3], 0x7F);
        assert_eq!(bytes[4], 0x01);
        assert_eq!(bytes[5], 0x03);
    }

    #[test]
    fn test_mouse_buttons_pressed_helper() {
        let buttons = MouseButtons(MouseButtons::LEFT | MouseButtons::MIDDLE);
        assert!(buttons.pressed(MouseButtons::LEFT));
        assert!(buttons.pressed(MouseButtons::MIDDLE));
        assert!(!buttons.pressed(MouseButtons::RIGHT));
    }
}
