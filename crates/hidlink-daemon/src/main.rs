//! HIDLink daemon entry point.
//!
//! Wires together the session manager, the BlueZ control plane, and the
//! D-Bus input service, then parks until a shutdown signal arrives.
//!
//! # Startup sequence
//!
//! ```text
//! main()
//!  └─ load config + SDP record
//!  └─ SessionManager            -- owns the HID session
//!  └─ system bus connection     -- serves Emulator1, Agent1, Profile1
//!  └─ adapter setup             -- powered/discoverable/pairable (best effort)
//!  └─ profile registration
//!       ├─ accepted  → profile mode, bluetoothd delivers sockets
//!       └─ refused   → raw-socket mode, bind PSM 17/19 ourselves
//! ```

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hidlink_core::{DBUS_OBJECT_PATH, DBUS_SERVICE_NAME};
use hidlink_daemon::application::send_input::SendInputUseCase;
use hidlink_daemon::infrastructure::bluez::adapter::configure_adapter;
use hidlink_daemon::infrastructure::bluez::agent::{register_agent, PairingAgent, AGENT_PATH};
use hidlink_daemon::infrastructure::bluez::profile::{
    register_profile, unregister_profile, HidProfile, ProfileError, PROFILE_PATH,
};
use hidlink_daemon::infrastructure::bluez::record::load_service_record;
use hidlink_daemon::infrastructure::dbus_service::EmulatorService;
use hidlink_daemon::infrastructure::storage::config::{load_config, DaemonConfig};
use hidlink_daemon::infrastructure::transport::listener::RawSocketListener;
use hidlink_daemon::infrastructure::transport::{SessionManager, SessionSink};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("HIDLink daemon starting");

    let config = load_config().context("loading configuration")?;
    let record = load_service_record(&config.profile).context("loading SDP service record")?;

    let session = Arc::new(SessionManager::new(config.transport.retry_delay()));
    let input = Arc::new(SendInputUseCase::new(Arc::new(SessionSink::new(
        Arc::clone(&session),
    ))));

    // ── D-Bus services ────────────────────────────────────────────────────────
    let connection = zbus::connection::Builder::system()
        .context("connecting to the system bus")?
        .name(DBUS_SERVICE_NAME)
        .context("claiming the daemon bus name")?
        .serve_at(DBUS_OBJECT_PATH, EmulatorService::new(Arc::clone(&input)))?
        .serve_at(AGENT_PATH, PairingAgent)?
        .serve_at(PROFILE_PATH, HidProfile::new(Arc::clone(&session)))?
        .build()
        .await
        .context("starting the system bus connection")?;
    info!(name = DBUS_SERVICE_NAME, "emulator service on the system bus");

    // ── BlueZ control plane ───────────────────────────────────────────────────
    if let Err(e) = configure_adapter(&connection, &config.adapter).await {
        warn!(error = %e, "adapter setup failed, continuing with current settings");
    }
    if let Err(e) = register_agent(&connection, &config.adapter.agent_capability).await {
        warn!(error = %e, "pairing agent unavailable, pair via bluetoothctl instead");
    }

    match register_profile(&connection, &record).await {
        Ok(()) => {
            info!("profile mode: bluetoothd owns the HID channels");
        }
        Err(ProfileError::AlreadyClaimed { reason }) => {
            warn!(%reason, "profile registration refused, using raw sockets");
            let listener = Arc::new(RawSocketListener::new(
                nudge_peer(&config)?,
                config.transport.nudge_timeout(),
            ));
            listener
                .check_bind()
                .await
                .context("binding the HID L2CAP channels")?;
            session.set_listener(listener);
            session.ensure_listening().await;
        }
        Err(e) => {
            return Err(e).context("registering the HID profile");
        }
    }

    // ── Ctrl-C / SIGTERM handler ──────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "could not install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("interrupt received"),
            _ = terminate => info!("termination signal received"),
        }
        running_clone.store(false, Ordering::Relaxed);
    });

    info!("HIDLink daemon ready");

    loop {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if !running.load(Ordering::Relaxed) {
            break;
        }
    }

    // ── Shutdown ──────────────────────────────────────────────────────────────
    unregister_profile(&connection).await;
    session.shutdown().await;

    info!("HIDLink daemon stopped");
    Ok(())
}

/// Resolves the peer address for the raw-socket reconnect nudge.
///
/// A malformed address is a config error worth failing loudly over; an
/// absent one, or `nudge_peer = false`, just disables the nudge.
fn nudge_peer(config: &DaemonConfig) -> anyhow::Result<Option<bluer::Address>> {
    if !config.transport.nudge_peer {
        return Ok(None);
    }
    let Some(address) = config.transport.peer_address.as_deref() else {
        return Ok(None);
    };
    let parsed = address
        .parse::<bluer::Address>()
        .with_context(|| format!("invalid transport.peer_address {address:?}"))?;
    Ok(Some(parsed))
}
