//! D-Bus proxy for the daemon's input-injection interface.

use hidlink_core::{DBUS_INTERFACE, DBUS_OBJECT_PATH, DBUS_SERVICE_NAME};

/// Client handle for `org.hidlink.Emulator1` on the system bus.
///
/// Clones are cheap; the underlying connection is shared.
#[derive(Clone)]
pub struct EmulatorClient {
    proxy: zbus::Proxy<'static>,
}

impl EmulatorClient {
    /// Connects to the system bus and binds the daemon's interface.
    ///
    /// # Errors
    ///
    /// Fails if the system bus is unreachable. A daemon that is not
    /// running surfaces later, as a `ServiceUnknown` reply to the first
    /// method call.
    pub async fn connect() -> zbus::Result<Self> {
        let connection = zbus::Connection::system().await?;
        let proxy = zbus::Proxy::new_owned(
            connection,
            DBUS_SERVICE_NAME,
            DBUS_OBJECT_PATH,
            DBUS_INTERFACE,
        )
        .await?;
        Ok(Self { proxy })
    }

    /// Sends one keyboard report: the held modifiers plus up to six key
    /// usage codes. An empty `keys` slice with zero modifiers is the
    /// all-released report.
    pub async fn send_keys(&self, modifiers: u8, keys: &[u8]) -> zbus::Result<()> {
        self.proxy
            .call_method("SendKeys", &(modifiers, keys))
            .await?;
        Ok(())
    }

    /// Sends the all-keys-released report.
    pub async fn release_keys(&self) -> zbus::Result<()> {
        self.send_keys(0, &[]).await
    }

    /// Sends one mouse report with relative deltas.
    pub async fn send_mouse(&self, buttons: u8, dx: i8, dy: i8, wheel: i8) -> zbus::Result<()> {
        self.proxy
            .call_method("SendMouse", &(buttons, dx, dy, wheel))
            .await?;
        Ok(())
    }
}
