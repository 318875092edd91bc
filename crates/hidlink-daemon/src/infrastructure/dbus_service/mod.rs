//! The `org.hidlink.Emulator1` system-bus service.
//!
//! This is the only surface the client binaries talk to. Both methods
//! carry already-resolved HID usage codes; character-to-code translation
//! happens on the client side where the error can be shown to the user.
//!
//! Delivery failures (no host connected, transport error) are handled
//! inside the use case and never surface here: input injection is
//! fire-and-forget for the caller.

use std::sync::Arc;

use zbus::interface;

use crate::application::send_input::SendInputUseCase;

/// D-Bus facade over [`SendInputUseCase`].
///
/// The interface name literal below matches `hidlink_core::DBUS_INTERFACE`.
pub struct EmulatorService {
    input: Arc<SendInputUseCase>,
}

impl EmulatorService {
    pub fn new(input: Arc<SendInputUseCase>) -> Self {
        Self { input }
    }
}

#[interface(name = "org.hidlink.Emulator1")]
impl EmulatorService {
    /// Injects one keyboard report.
    ///
    /// `modifiers` is the boot-protocol modifier byte, `keys` the usage
    /// codes of the keys currently down (at most six, empty for a
    /// release). More than six keys is a caller error.
    async fn send_keys(&self, modifiers: u8, keys: Vec<u8>) -> zbus::fdo::Result<()> {
        self.input
            .send_keys(modifiers, &keys)
            .await
            .map_err(|e| zbus::fdo::Error::InvalidArgs(e.to_string()))
    }

    /// Injects one mouse report with relative deltas.
    async fn send_mouse(&self, buttons: u8, dx: i8, dy: i8, wheel: i8) -> zbus::fdo::Result<()> {
        self.input.send_mouse(buttons, dx, dy, wheel).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::application::send_input::ReportSink;

    struct RecordingSink {
        reports: Mutex<Vec<Vec<u8>>>,
        should_fail: AtomicBool,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                reports: Mutex::new(Vec::new()),
                should_fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl ReportSink for RecordingSink {
        async fn submit(&self, report: &[u8]) -> Result<(), String> {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err("no host connected".to_string());
            }
            self.reports
                .lock()
                .expect("lock poisoned")
                .push(report.to_vec());
            Ok(())
        }
    }

    fn service_with_sink(sink: Arc<RecordingSink>) -> EmulatorService {
        EmulatorService::new(Arc::new(SendInputUseCase::new(sink)))
    }

    #[tokio::test]
    async fn test_send_keys_forwards_keyboard_report() {
        // Arrange
        let sink = Arc::new(RecordingSink::new());
        let service = service_with_sink(Arc::clone(&sink));

        // Act: left-shift + 'a'
        let result = service.send_keys(0x02, vec![0x04]).await;

        // Assert
        assert!(result.is_ok());
        let reports = sink.reports.lock().expect("lock poisoned");
        assert_eq!(
            reports.as_slice(),
            &[vec![0xA1, 0x01, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]]
        );
    }

    #[tokio::test]
    async fn test_send_keys_rejects_seven_keys_with_invalid_args() {
        // Arrange
        let sink = Arc::new(RecordingSink::new());
        let service = service_with_sink(Arc::clone(&sink));

        // Act
        let result = service
            .send_keys(0, vec![4, 5, 6, 7, 8, 9, 10])
            .await;

        // Assert: typed D-Bus error, nothing submitted
        match result {
            Err(zbus::fdo::Error::InvalidArgs(_)) => {}
            other => panic!("expected InvalidArgs, got {other:?}"),
        }
        assert!(sink.reports.lock().expect("lock poisoned").is_empty());
    }

    #[tokio::test]
    async fn test_send_keys_swallows_delivery_failure() {
        // Arrange: the sink rejects everything, as it does with no host
        let sink = Arc::new(RecordingSink::new());
        sink.should_fail.store(true, Ordering::SeqCst);
        let service = service_with_sink(Arc::clone(&sink));

        // Act / Assert: the caller still sees success
        assert!(service.send_keys(0, vec![0x04]).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_mouse_forwards_mouse_report() {
        // Arrange
        let sink = Arc::new(RecordingSink::new());
        let service = service_with_sink(Arc::clone(&sink));

        // Act: left button held, moving up-left, wheel down one notch
        let result = service.send_mouse(0x01, -5, -10, -1).await;

        // Assert
        assert!(result.is_ok());
        let reports = sink.reports.lock().expect("lock poisoned");
        assert_eq!(
            reports.as_slice(),
            &[vec![0xA1, 0x02, 0x01, 0xFB, 0xF6, 0xFF]]
        );
    }

    #[tokio::test]
    async fn test_send_mouse_swallows_delivery_failure() {
        let sink = Arc::new(RecordingSink::new());
        sink.should_fail.store(true, Ordering::SeqCst);
        let service = service_with_sink(Arc::clone(&sink));

        assert!(service.send_mouse(0, 3, 3, 0).await.is_ok());
    }
}
