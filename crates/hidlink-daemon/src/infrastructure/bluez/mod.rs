//! BlueZ control plane.
//!
//! Everything that talks to bluetoothd lives here: adapter property setup,
//! the Just Works pairing agent, HID profile registration, and the SDP
//! service record describing the emulated device.
//!
//! All of it is best-effort except profile registration, whose outcome
//! decides the transport strategy for the rest of the process lifetime.

pub mod adapter;
pub mod agent;
pub mod profile;
pub mod record;

/// Well-known bus name of bluetoothd.
pub const BLUEZ_BUS: &str = "org.bluez";

/// Object path of the BlueZ profile and agent managers.
pub const BLUEZ_MANAGER_PATH: &str = "/org/bluez";
