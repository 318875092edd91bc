//! # hidlink-client
//!
//! Shared plumbing for the HIDLink client binaries: the D-Bus proxy used
//! to talk to the daemon and the raw-mode terminal reader used by the
//! interactive keyboard forwarder.
//!
//! The binaries themselves live in `src/bin/`:
//!
//! - `hidlink-keyboard` – forwards keystrokes typed into the terminal.
//! - `hidlink-mouse` – sends a single mouse event and exits.

pub mod proxy;
pub mod terminal;

pub use proxy::EmulatorClient;
pub use terminal::{spawn_stdin_reader, KeyDecoder, RawModeGuard, TerminalKey};
