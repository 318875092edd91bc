//! HID profile registration and connection hand-off.
//!
//! In profile mode bluetoothd owns the L2CAP listeners. The daemon exports
//! an `org.bluez.Profile1` object, registers it for the HID UUID with the
//! SDP record attached, and receives connected sockets as file descriptors
//! through `NewConnection`.
//!
//! Registration is commonly refused on stock installations where the
//! bluetoothd `input` plugin already claims the HID PSMs. That refusal is
//! surfaced as [`ProfileError::AlreadyClaimed`] so startup can fall back
//! to the raw-socket strategy.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::{uuid, Uuid};
use zbus::zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};
use zbus::{interface, Connection};

use crate::infrastructure::transport::listener::socket_from_fd;
use crate::infrastructure::transport::SessionManager;

use super::{BLUEZ_BUS, BLUEZ_MANAGER_PATH};

/// Bluetooth base UUID of the Human Interface Device service (0x1124).
pub const HID_PROFILE_UUID: Uuid = uuid!("00001124-0000-1000-8000-00805f9b34fb");

/// Object path the profile is served at.
pub const PROFILE_PATH: &str = "/org/hidlink/profile";

/// Error type for profile registration.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// bluetoothd refused the registration; another service owns the HID
    /// UUID or its PSMs.
    #[error("HID profile not registrable: {reason}")]
    AlreadyClaimed { reason: String },

    /// The bus itself failed.
    #[error("D-Bus failure: {source}")]
    Bus {
        #[from]
        source: zbus::Error,
    },
}

/// Tagged hand-off from bluetoothd: the connected socket plus the
/// property set describing it.
///
/// The session layer only ever sees this descriptor (or what is derived
/// from it), never the D-Bus message shape.
pub struct ConnectionDescriptor {
    pub fd: std::os::fd::OwnedFd,
    pub properties: HashMap<String, OwnedValue>,
}

impl ConnectionDescriptor {
    /// PSM the host connected to, when bluetoothd includes it.
    pub fn psm(&self) -> Option<u16> {
        psm_from_properties(&self.properties)
    }
}

/// The `org.bluez.Profile1` implementation.
pub struct HidProfile {
    session: Arc<SessionManager>,
}

impl HidProfile {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Adopts a descriptor into the session.
    ///
    /// Classification failures are not reported back to bluetoothd:
    /// replying with an error would make it drop the whole device, while
    /// closing the surplus socket keeps the existing session intact.
    async fn adopt(&self, descriptor: ConnectionDescriptor) -> zbus::fdo::Result<()> {
        let psm = descriptor.psm();
        let socket = socket_from_fd(descriptor.fd).map_err(|e| {
            error!(error = %e, "could not adopt connection fd");
            zbus::fdo::Error::Failed(format!("could not adopt connection fd: {e}"))
        })?;

        if let Err(e) = self.session.attach_channel(Box::new(socket), psm).await {
            error!(error = %e, "dropping inbound channel");
        }
        Ok(())
    }
}

#[interface(name = "org.bluez.Profile1")]
impl HidProfile {
    async fn release(&self) {
        info!("HID profile released by bluetoothd");
    }

    async fn new_connection(
        &self,
        device: OwnedObjectPath,
        fd: zbus::zvariant::OwnedFd,
        fd_properties: HashMap<String, OwnedValue>,
    ) -> zbus::fdo::Result<()> {
        let descriptor = ConnectionDescriptor {
            fd: fd.into(),
            properties: fd_properties,
        };
        info!(device = %device, psm = ?descriptor.psm(), "profile connection from host");
        self.adopt(descriptor).await
    }

    async fn request_disconnection(&self, device: OwnedObjectPath) -> zbus::fdo::Result<()> {
        info!(device = %device, "host requested disconnection");
        self.session.handle_disconnect().await;
        Ok(())
    }
}

/// Extracts the PSM from the `NewConnection` fd-properties, if present.
///
/// BlueZ sends it as uint16; be tolerant of stacks that widen it.
fn psm_from_properties(properties: &HashMap<String, OwnedValue>) -> Option<u16> {
    let value = properties.get("PSM")?;
    if let Ok(psm) = value.downcast_ref::<u16>() {
        return Some(psm);
    }
    if let Ok(psm) = value.downcast_ref::<u32>() {
        return u16::try_from(psm).ok();
    }
    None
}

/// Registers the HID profile with bluetoothd.
///
/// A stale registration from a previous run is removed first, best-effort.
/// `AutoConnect` lets bluetoothd reconnect paired hosts on its own; the
/// service record carries the device identity and report map.
///
/// # Errors
///
/// [`ProfileError::AlreadyClaimed`] when bluetoothd rejects the
/// registration, [`ProfileError::Bus`] when the bus itself fails.
pub async fn register_profile(conn: &Connection, record: &str) -> Result<(), ProfileError> {
    let manager = zbus::Proxy::new(
        conn,
        BLUEZ_BUS,
        BLUEZ_MANAGER_PATH,
        "org.bluez.ProfileManager1",
    )
    .await?;

    let path = ObjectPath::from_static_str_unchecked(PROFILE_PATH);
    if let Err(e) = manager.call_method("UnregisterProfile", &(&path,)).await {
        debug!(error = %e, "no stale profile registration to remove");
    }

    let mut options: HashMap<&str, Value<'_>> = HashMap::new();
    options.insert("AutoConnect", Value::from(true));
    options.insert("ServiceRecord", Value::from(record));

    match manager
        .call_method(
            "RegisterProfile",
            &(&path, HID_PROFILE_UUID.to_string(), options),
        )
        .await
    {
        Ok(_) => {
            info!(uuid = %HID_PROFILE_UUID, "HID profile registered with bluetoothd");
            Ok(())
        }
        Err(zbus::Error::MethodError(name, detail, _)) => Err(ProfileError::AlreadyClaimed {
            reason: format!("{name}: {}", detail.unwrap_or_default()),
        }),
        Err(e) => Err(ProfileError::Bus { source: e }),
    }
}

/// Removes the profile registration at shutdown. Best-effort.
pub async fn unregister_profile(conn: &Connection) {
    let manager = match zbus::Proxy::new(
        conn,
        BLUEZ_BUS,
        BLUEZ_MANAGER_PATH,
        "org.bluez.ProfileManager1",
    )
    .await
    {
        Ok(manager) => manager,
        Err(e) => {
            warn!(error = %e, "could not reach profile manager for cleanup");
            return;
        }
    };
    let path = ObjectPath::from_static_str_unchecked(PROFILE_PATH);
    if let Err(e) = manager.call_method("UnregisterProfile", &(&path,)).await {
        warn!(error = %e, "profile unregistration failed");
    }
}
