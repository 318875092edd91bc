//! # hidlink-core
//!
//! Shared library for HIDLink containing the Bluetooth HID boot report
//! model and the key code translation tables.
//!
//! This crate is used by both the daemon and the client binaries.
//! It has zero dependencies on D-Bus, BlueZ, or sockets.
//!
//! # Architecture overview (for beginners)
//!
//! HIDLink makes a Linux machine *pretend to be* a Bluetooth keyboard and
//! mouse.  A phone, tablet, or another computer pairs with it exactly as it
//! would with a real peripheral, and everything typed into HIDLink shows up
//! on that device.  The system has two halves:
//!
//! - **The daemon** (`hidlink-daemon`) registers the HID profile with BlueZ,
//!   owns the two L2CAP channels a HID session consists of, and exposes a
//!   small D-Bus service on the system bus.
//!
//! - **The clients** (`hidlink-keyboard`, `hidlink-mouse`) capture local
//!   input and hand it to the daemon over D-Bus.  They never touch
//!   Bluetooth themselves.
//!
//! This crate (`hidlink-core`) is the shared foundation.  It defines:
//!
//! - **`report`** – The bytes that travel to the paired host.  Keyboard and
//!   mouse state is packed into fixed-size boot-protocol input reports that
//!   are written verbatim to the interrupt channel.
//!
//! - **`keymap`** – Translation tables that convert named keys
//!   (`KEY_A`, `KEY_ENTER`, ...) and printable ASCII characters into the
//!   USB HID usage IDs carried inside keyboard reports.

pub mod keymap;
pub mod report;

// ── D-Bus contract ────────────────────────────────────────────────────────────
//
// Shared between the daemon (which serves the interface) and the clients
// (which call it). Kept here so the two sides cannot drift apart.

/// Well-known bus name the daemon claims on the system bus.
pub const DBUS_SERVICE_NAME: &str = "org.hidlink.Emulator1";

/// Object path the emulator interface is served at.
pub const DBUS_OBJECT_PATH: &str = "/org/hidlink/Emulator1";

/// Name of the input-injection interface.
pub const DBUS_INTERFACE: &str = "org.hidlink.Emulator1";

// Re-export the most-used types at the crate root so callers can write
// `hidlink_core::KeyboardReport` instead of `hidlink_core::report::KeyboardReport`.
pub use keymap::{key_press_for_char, resolve_key_name, KeyPress, KeymapError};
pub use report::{
    KeyboardReport, ModifierFlags, MouseButtons, MouseReport, ReportError,
};
