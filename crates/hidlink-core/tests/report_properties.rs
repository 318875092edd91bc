//! Integration tests for the hidlink-core report pipeline.
//!
//! These tests exercise the public API end to end: characters and key names
//! are resolved through the keymap and packed into reports, then the encoded
//! bytes are checked against the boot-protocol wire layout the paired host
//! expects.

use hidlink_core::report::{
    DATA_INPUT_HEADER, KEYBOARD_REPORT_LEN, MOUSE_REPORT_LEN, REPORT_ID_KEYBOARD, REPORT_ID_MOUSE,
};
use hidlink_core::{
    key_press_for_char, resolve_key_name, KeyboardReport, KeymapError, ModifierFlags,
    MouseButtons, MouseReport, ReportError,
};

/// Resolves a character and packs it into an encoded press report.
fn encode_char_press(c: char) -> [u8; KEYBOARD_REPORT_LEN] {
    let press = key_press_for_char(c).expect("test character must be mapped");
    KeyboardReport::key_down(press.code, press.modifiers).encode()
}

#[test]
fn test_typed_character_reaches_the_wire_layout() {
    // 'A' = usage 0x04 with left shift held
    let bytes = encode_char_press('A');

    assert_eq!(bytes[0], DATA_INPUT_HEADER);
    assert_eq!(bytes[1], REPORT_ID_KEYBOARD);
    assert_eq!(bytes[2], ModifierFlags::LEFT_SHIFT);
    assert_eq!(bytes[3], 0x00);
    assert_eq!(bytes[4], 0x04);
    assert_eq!(&bytes[5..], &[0, 0, 0, 0, 0]);
}

#[test]
fn test_named_key_reaches_the_wire_layout() {
    let code = resolve_key_name("KEY_ENTER").expect("KEY_ENTER must resolve");
    let bytes = KeyboardReport::key_down(code, ModifierFlags::default()).encode();

    assert_eq!(bytes[4], 0x28);
    assert_eq!(bytes[2], 0x00, "no modifiers for a bare named key");
}

#[test]
fn test_press_release_sequence_produces_distinct_reports() {
    let press = encode_char_press('x');
    let release = KeyboardReport::release().encode();

    assert_ne!(press, release);
    assert_eq!(release[..2], [DATA_INPUT_HEADER, REPORT_ID_KEYBOARD]);
    assert!(release[2..].iter().all(|&b| b == 0));
}

#[test]
fn test_release_report_is_the_zero_usage_press() {
    // Clients historically release by "pressing" usage 0 with no modifiers;
    // the dedicated constructor must stay byte-identical to that.
    assert_eq!(
        KeyboardReport::release().encode(),
        KeyboardReport::key_down(0, ModifierFlags::default()).encode()
    );
}

#[test]
fn test_chord_of_six_keys_is_accepted_and_ordered() {
    let codes: Vec<u8> = "qwerty"
        .chars()
        .map(|c| key_press_for_char(c).expect("letters must be mapped").code)
        .collect();

    let report = KeyboardReport::from_codes(ModifierFlags::default(), &codes)
        .expect("six keys is the maximum");
    let bytes = report.encode();

    assert_eq!(&bytes[4..], codes.as_slice());
}

#[test]
fn test_chord_of_seven_keys_is_rejected_not_truncated() {
    let codes = [0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];
    let result = KeyboardReport::from_codes(ModifierFlags::default(), &codes);

    assert_eq!(result, Err(ReportError::TooManyKeys { requested: 7 }));
}

#[test]
fn test_mouse_report_encodes_signed_deltas() {
    let bytes = MouseReport::new(MouseButtons(MouseButtons::LEFT), -10, 25, -1).encode();

    assert_eq!(bytes.len(), MOUSE_REPORT_LEN);
    assert_eq!(bytes[0], DATA_INPUT_HEADER);
    assert_eq!(bytes[1], REPORT_ID_MOUSE);
    assert_eq!(bytes[2], MouseButtons::LEFT);
    assert_eq!(bytes[3] as i8, -10);
    assert_eq!(bytes[4] as i8, 25);
    assert_eq!(bytes[5] as i8, -1);
}

#[test]
fn test_unmapped_character_error_carries_the_character() {
    let err = key_press_for_char('\x07').expect_err("BEL is not typeable");
    assert_eq!(err, KeymapError::UnmappedChar('\x07'));
}

#[test]
fn test_unknown_key_name_error_carries_the_name() {
    let err = resolve_key_name("KEY_TURBO").expect_err("KEY_TURBO is not in the table");
    assert_eq!(err, KeymapError::UnknownKey("KEY_TURBO".to_string()));
}
