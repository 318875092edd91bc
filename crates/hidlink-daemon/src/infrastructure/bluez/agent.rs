//! Just Works pairing agent.
//!
//! A keyboard emulator has no display and no way to prompt for input, so
//! pairing must complete without user interaction on this side. The agent
//! auto-accepts confirmations and authorizations, and rejects PIN/passkey
//! requests outright: answering them with a fixed value makes hosts
//! (notably iOS) abandon the pairing, while a rejection pushes the
//! exchange down to Just Works.

use tracing::{info, warn};
use zbus::zvariant::{ObjectPath, OwnedObjectPath};
use zbus::{interface, Connection};

use super::BLUEZ_MANAGER_PATH;

/// Object path the agent is served at.
pub const AGENT_PATH: &str = "/org/hidlink/agent";

/// Errors replied to bluetoothd from agent callbacks.
#[derive(Debug, zbus::DBusError)]
#[zbus(prefix = "org.bluez.Error")]
pub enum AgentError {
    #[zbus(error)]
    ZBus(zbus::Error),
    /// The pairing method is refused; BlueZ falls back to Just Works.
    Rejected(String),
}

/// The `org.bluez.Agent1` implementation.
pub struct PairingAgent;

#[interface(name = "org.bluez.Agent1")]
impl PairingAgent {
    async fn release(&self) {
        info!("pairing agent released by bluetoothd");
    }

    async fn request_pin_code(&self, device: OwnedObjectPath) -> Result<String, AgentError> {
        warn!(device = %device, "PIN requested, rejecting to keep Just Works pairing");
        Err(AgentError::Rejected("NoInputNoOutput".to_string()))
    }

    async fn request_passkey(&self, device: OwnedObjectPath) -> Result<u32, AgentError> {
        warn!(device = %device, "passkey requested, rejecting to keep Just Works pairing");
        Err(AgentError::Rejected("NoInputNoOutput".to_string()))
    }

    async fn display_passkey(&self, device: OwnedObjectPath, passkey: u32, entered: u16) {
        info!(device = %device, passkey, entered, "host displays passkey");
    }

    async fn display_pin_code(&self, device: OwnedObjectPath, pincode: String) {
        info!(device = %device, %pincode, "host displays PIN code");
    }

    async fn request_confirmation(&self, device: OwnedObjectPath, passkey: u32) {
        info!(device = %device, passkey, "auto-accepting pairing confirmation");
    }

    async fn request_authorization(&self, device: OwnedObjectPath) {
        info!(device = %device, "auto-accepting pairing authorization");
    }

    async fn authorize_service(&self, device: OwnedObjectPath, uuid: String) {
        info!(device = %device, %uuid, "auto-accepting service authorization");
    }

    async fn cancel(&self) {
        info!("pairing request cancelled by host");
    }
}

/// Registers the agent with bluetoothd and asks to become the default.
///
/// Both calls are best-effort like the adapter setup: an existing default
/// agent on the system is not a reason to refuse to start.
///
/// # Errors
///
/// Fails only if the agent manager proxy cannot be created.
pub async fn register_agent(conn: &Connection, capability: &str) -> zbus::Result<()> {
    let manager = zbus::Proxy::new(
        conn,
        super::BLUEZ_BUS,
        BLUEZ_MANAGER_PATH,
        "org.bluez.AgentManager1",
    )
    .await?;

    let path = ObjectPath::from_static_str_unchecked(AGENT_PATH);
    if let Err(e) = manager.call_method("RegisterAgent", &(&path, capability)).await {
        warn!(error = %e, "agent registration failed, continuing without one");
        return Ok(());
    }
    if let Err(e) = manager.call_method("RequestDefaultAgent", &(&path,)).await {
        warn!(error = %e, "could not become the default agent");
    }
    info!(capability, "pairing agent registered");
    Ok(())
}
