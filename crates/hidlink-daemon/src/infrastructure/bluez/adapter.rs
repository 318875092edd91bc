//! Adapter property setup via `org.bluez.Adapter1`.
//!
//! Makes the adapter visible and pairable so hosts can find the emulated
//! keyboard. Every property write is best-effort: distro policies may
//! restrict some of them, and a partially configured adapter is still
//! usable for already-paired hosts.
//!
//! The adapter's Class of Device (0x002540, keyboard peripheral) cannot be
//! set over D-Bus; it comes from the `Class` entry in bluetoothd's
//! `main.conf`.

use tracing::{info, warn};
use zbus::zvariant::Value;
use zbus::Connection;

use crate::infrastructure::storage::config::AdapterConfig;

use super::BLUEZ_BUS;

/// Powers the adapter and applies alias, discoverability, and pairability
/// from the configuration.
///
/// # Errors
///
/// Fails only if the adapter proxy itself cannot be created (bad object
/// path or bus failure); individual property writes are logged and
/// skipped.
pub async fn configure_adapter(conn: &Connection, config: &AdapterConfig) -> zbus::Result<()> {
    let adapter = zbus::Proxy::new(
        conn,
        BLUEZ_BUS,
        config.object_path.as_str(),
        "org.bluez.Adapter1",
    )
    .await?;

    set_or_warn(&adapter, "Powered", Value::from(true)).await;
    set_or_warn(&adapter, "Alias", Value::from(config.alias.as_str())).await;
    if config.pairable {
        set_or_warn(&adapter, "Pairable", Value::from(true)).await;
        // 0 disables the timeout: stay pairable until told otherwise.
        set_or_warn(&adapter, "PairableTimeout", Value::from(0u32)).await;
    }
    if config.discoverable {
        set_or_warn(&adapter, "Discoverable", Value::from(true)).await;
        set_or_warn(&adapter, "DiscoverableTimeout", Value::from(0u32)).await;
    }

    match adapter.get_property::<String>("Alias").await {
        Ok(alias) => info!(%alias, path = %config.object_path, "adapter ready"),
        Err(_) => info!(path = %config.object_path, "adapter ready"),
    }
    Ok(())
}

async fn set_or_warn(adapter: &zbus::Proxy<'_>, name: &str, value: Value<'_>) {
    if let Err(e) = adapter.set_property(name, value).await {
        warn!(property = name, error = %e, "could not set adapter property");
    }
}
