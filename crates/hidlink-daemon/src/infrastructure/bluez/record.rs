//! SDP service record for the emulated HID device.
//!
//! The record tells hosts what kind of HID device this is: a combo boot
//! keyboard plus mouse, with the report map carrying report ID 1 for the
//! keyboard and report ID 2 for the mouse. The PSMs in the record (0x0011
//! and 0x0013) must match the channels the daemon actually serves.

use std::io;

use crate::infrastructure::storage::config::ProfileConfig;

/// The record shipped with the daemon, compiled in.
pub const DEFAULT_RECORD: &str = include_str!("hid_record.xml");

/// Returns the service record XML to register with BlueZ.
///
/// A `service_record_path` in the configuration overrides the built-in
/// record, for installs that need a different device identity or report
/// map.
///
/// # Errors
///
/// Returns the I/O error if an override path is configured but unreadable.
/// The daemon cannot advertise itself without a record, so the caller
/// should treat this as a startup failure.
pub fn load_service_record(config: &ProfileConfig) -> io::Result<String> {
    match &config.service_record_path {
        Some(path) => std::fs::read_to_string(path),
        None => Ok(DEFAULT_RECORD.to_string()),
    }
}
