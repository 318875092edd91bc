//! Application layer use cases for the daemon.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure report encoding in `hidlink_core`) and the infrastructure
//! (Bluetooth sockets, BlueZ, D-Bus).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a caller goal (e.g., "turn
//!   this key set into a boot report and hand it to the active session").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the transport can be swapped without changing this code.
//! - **Contain no OS calls, no socket I/O, no D-Bus traffic**.
//!
//! # Sub-modules
//!
//! - **`send_input`** – Validates and encodes keyboard/mouse input requests
//!   and submits the resulting reports to a [`send_input::ReportSink`].
//!   This is the hot path; it runs on every injected keystroke and every
//!   pointer movement.

pub mod send_input;
