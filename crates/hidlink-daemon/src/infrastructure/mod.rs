//! Infrastructure layer for the daemon.
//!
//! Contains OS-facing adapters: L2CAP transport sockets, the BlueZ control
//! plane, file-system configuration, and the D-Bus request facade.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `hidlink_core`, but MUST NOT be imported by the `application` layer.

pub mod bluez;
pub mod dbus_service;
pub mod storage;
pub mod transport;
