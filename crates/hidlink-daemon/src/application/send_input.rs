//! SendInputUseCase: turns injection requests into HID boot reports.
//!
//! This use case is the hot path of the daemon. It receives key and pointer
//! requests from the D-Bus facade, encodes them with the report builders in
//! [`hidlink_core`], and hands the raw bytes to a [`ReportSink`].
//!
//! # Architecture
//!
//! The use case depends only on the `ReportSink` trait and on domain types
//! from `hidlink_core`. The concrete sink (the Bluetooth session manager) is
//! injected at construction time, making the use case fully unit-testable.
//!
//! # Delivery semantics
//!
//! Input is live: a report that cannot be delivered right now is dropped,
//! never queued for a later session. Sink failures are logged and swallowed;
//! only malformed requests (more than six keys) are rejected back to the
//! caller.

use std::sync::Arc;

use async_trait::async_trait;
use hidlink_core::{KeyboardReport, ModifierFlags, MouseButtons, MouseReport, ReportError};
use tracing::{debug, warn};

/// Trait for delivering an encoded HID report to the connected host.
///
/// The infrastructure implementation writes to the L2CAP interrupt channel;
/// test implementations record calls.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Delivers one encoded report to the host.
    async fn submit(&self, report: &[u8]) -> Result<(), String>;
}

/// The Send Input use case.
///
/// Validates and encodes injection requests, then submits the resulting
/// reports to the sink.
pub struct SendInputUseCase {
    sink: Arc<dyn ReportSink>,
}

impl SendInputUseCase {
    /// Creates a new use case instance.
    pub fn new(sink: Arc<dyn ReportSink>) -> Self {
        Self { sink }
    }

    /// Encodes and submits a keyboard boot report.
    ///
    /// `keys` holds the usage codes of all currently held keys; an empty
    /// slice releases everything. Modifier-only chords are expressed with
    /// `modifiers` set and `keys` empty.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::TooManyKeys`] if more than six keys are held.
    /// Delivery failures are not errors: the report is dropped and logged.
    pub async fn send_keys(&self, modifiers: u8, keys: &[u8]) -> Result<(), ReportError> {
        let report = KeyboardReport::from_codes(ModifierFlags(modifiers), keys)?;
        let bytes = report.encode();
        debug!(modifiers, held = keys.len(), "submitting keyboard report");
        if let Err(e) = self.sink.submit(&bytes).await {
            warn!(error = %e, "keyboard report dropped");
        }
        Ok(())
    }

    /// Encodes and submits a mouse boot report.
    ///
    /// Deltas are relative and clamped to the boot protocol's i8 range by
    /// the caller's types. Cannot fail validation; delivery failures are
    /// dropped and logged like in [`Self::send_keys`].
    pub async fn send_mouse(&self, buttons: u8, dx: i8, dy: i8, wheel: i8) {
        let report = MouseReport::new(MouseButtons(buttons), dx, dy, wheel);
        let bytes = report.encode();
        debug!(buttons, dx, dy, wheel, "submitting mouse report");
        if let Err(e) = self.sink.submit(&bytes).await {
            warn!(error = %e, "mouse report dropped");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
