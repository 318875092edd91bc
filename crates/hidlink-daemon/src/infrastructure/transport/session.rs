//! Session lifecycle state machine.
//!
//! `SessionManager` owns the current [`ChannelPair`] (or none) and decides
//! when to listen for a new host. It is the single writer of session state:
//!
//! - In raw-socket mode it runs a background acceptor task against the
//!   installed [`ChannelListener`] and retries failed accepts indefinitely
//!   with a fixed delay.
//! - In profile mode no listener is installed; sockets arrive through
//!   [`SessionManager::attach_channel`] and a lost session waits for
//!   bluetoothd to deliver the next connection.
//!
//! Reports are never queued. A send while no host is connected fails fast
//! with [`SessionError::NotConnected`] after making sure a listen cycle is
//! underway; the most recent input always wins over stale input.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::application::send_input::ReportSink;

use super::channel::{Channel, ChannelPair};
use super::{ChannelListener, ReportSocket, SessionError};

/// Connection lifecycle of the HID session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No channels open, no accept cycle running.
    Disconnected,
    /// An acceptor task is waiting for a host.
    Listening,
    /// Both channels are open; reports can be delivered.
    Connected,
}

/// State shared between callers and the acceptor task.
///
/// One lock guards the state, the channel pair, and the acceptor handle so
/// that concurrent `send_report` calls can never observe a half-made
/// transition or spawn a second acceptor.
struct SessionShared {
    state: SessionState,
    channels: ChannelPair,
    acceptor: Option<JoinHandle<()>>,
}

/// Owns the HID session and its reconnect policy.
pub struct SessionManager {
    shared: Mutex<SessionShared>,
    listener: OnceLock<Arc<dyn ChannelListener>>,
    retry_delay: Duration,
    running: AtomicBool,
}

impl SessionManager {
    /// Creates a manager with no open session and no listener installed.
    pub fn new(retry_delay: Duration) -> Self {
        Self {
            shared: Mutex::new(SessionShared {
                state: SessionState::Disconnected,
                channels: ChannelPair::new(),
                acceptor: None,
            }),
            listener: OnceLock::new(),
            retry_delay,
            running: AtomicBool::new(true),
        }
    }

    /// Installs the raw-socket listener. Call at most once, at startup;
    /// profile mode never calls this.
    pub fn set_listener(&self, listener: Arc<dyn ChannelListener>) {
        if self.listener.set(listener).is_err() {
            warn!("channel listener was already installed, ignoring");
        }
    }

    /// Returns the current lifecycle state.
    pub async fn state(&self) -> SessionState {
        self.shared.lock().await.state
    }

    /// Delivers one encoded report to the connected host.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotConnected`] when no complete session exists; a
    ///   listen cycle is started (idempotently) and the report is dropped.
    /// - [`SessionError::Transport`] when the socket write fails; the
    ///   session is torn down and a new listen cycle is scheduled after the
    ///   retry delay.
    pub async fn send_report(self: &Arc<Self>, payload: &[u8]) -> Result<(), SessionError> {
        let mut shared = self.shared.lock().await;
        if shared.state != SessionState::Connected {
            debug!(state = ?shared.state, "report dropped, no host connected");
            self.start_acceptor_locked(&mut shared, Duration::ZERO);
            return Err(SessionError::NotConnected);
        }
        match shared.channels.send(payload).await {
            Ok(()) => Ok(()),
            Err(SessionError::Transport { source }) => {
                error!(error = %source, "send failed, tearing down session");
                shared.channels.close_all();
                shared.state = SessionState::Disconnected;
                self.start_acceptor_locked(&mut shared, self.retry_delay);
                Err(SessionError::Transport { source })
            }
            Err(other) => Err(other),
        }
    }

    /// Starts a listen cycle if none is active. Idempotent; a no-op in
    /// profile mode and after shutdown.
    pub async fn ensure_listening(self: &Arc<Self>) {
        let mut shared = self.shared.lock().await;
        self.start_acceptor_locked(&mut shared, Duration::ZERO);
    }

    /// Accepts a socket handed over by the BlueZ profile and classifies it
    /// into a channel slot. The session becomes `Connected` once both
    /// slots are filled.
    ///
    /// An inbound connection that fits no free slot is closed and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DuplicateChannel`] if classification picks a
    /// slot that is already occupied.
    pub async fn attach_channel(
        &self,
        socket: Box<dyn ReportSocket>,
        psm: Option<u16>,
    ) -> Result<(), SessionError> {
        let mut shared = self.shared.lock().await;
        let channel = match shared.channels.classify_inbound(psm) {
            Some(channel) => channel,
            None => {
                warn!(?psm, "no free channel slot for inbound connection, closing it");
                return Ok(());
            }
        };
        shared.channels.assign(channel, socket)?;
        info!(%channel, ?psm, "host channel attached");
        if shared.channels.is_complete() {
            shared.state = SessionState::Connected;
            info!("host connected, session established");
        }
        Ok(())
    }

    /// Handles a disconnect notification from the BlueZ profile.
    ///
    /// Closes both channels and returns to `Disconnected` without starting
    /// a listen cycle; the platform delivers the next connection itself.
    pub async fn handle_disconnect(&self) {
        let mut shared = self.shared.lock().await;
        shared.channels.close_all();
        shared.state = SessionState::Disconnected;
        info!("host disconnected, channels closed");
    }

    /// Stops the manager for good: no further listen cycles, all channels
    /// closed. Terminal.
    pub async fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
        let mut shared = self.shared.lock().await;
        if let Some(handle) = shared.acceptor.take() {
            handle.abort();
        }
        shared.channels.close_all();
        shared.state = SessionState::Disconnected;
        info!("session manager stopped");
    }

    /// Transitions `Disconnected` to `Listening` and spawns the acceptor.
    ///
    /// Must be called with the shared lock held; the lock is what makes
    /// "exactly one acceptor" hold under concurrent callers.
    fn start_acceptor_locked(
        self: &Arc<Self>,
        shared: &mut SessionShared,
        initial_delay: Duration,
    ) {
        if shared.state != SessionState::Disconnected {
            return;
        }
        if !self.running.load(Ordering::SeqCst) {
            return;
        }
        let listener = match self.listener.get() {
            Some(listener) => Arc::clone(listener),
            None => return,
        };
        shared.state = SessionState::Listening;
        let manager = Arc::clone(self);
        shared.acceptor = Some(tokio::spawn(async move {
            manager.acceptor_loop(listener, initial_delay).await;
        }));
    }

    /// Accepts one channel pair, retrying failed accepts until stopped.
    async fn acceptor_loop(
        self: Arc<Self>,
        listener: Arc<dyn ChannelListener>,
        initial_delay: Duration,
    ) {
        if !initial_delay.is_zero() {
            debug!(delay = ?initial_delay, "delaying next listen cycle");
            time::sleep(initial_delay).await;
        }
        while self.running.load(Ordering::SeqCst) {
            info!("waiting for a host on the control and interrupt channels");
            match listener.accept_pair().await {
                Ok(pair) => {
                    let mut shared = self.shared.lock().await;
                    shared.channels.close_all();
                    if shared.channels.assign(Channel::Control, pair.control).is_err()
                        || shared.channels.assign(Channel::Interrupt, pair.interrupt).is_err()
                    {
                        // Unreachable on a freshly cleared pair.
                        error!("accepted pair could not be assigned, discarding");
                        shared.channels.close_all();
                        continue;
                    }
                    shared.state = SessionState::Connected;
                    info!("host connected, session established");
                    return;
                }
                Err(e) => {
                    warn!(error = %e, retry_in = ?self.retry_delay, "accept failed");
                    time::sleep(self.retry_delay).await;
                }
            }
        }
        // Stopped while still waiting.
        let mut shared = self.shared.lock().await;
        if shared.state == SessionState::Listening {
            shared.state = SessionState::Disconnected;
        }
    }
}

/// Adapter exposing the session manager to the application layer as a
/// [`ReportSink`].
pub struct SessionSink(Arc<SessionManager>);

impl SessionSink {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self(session)
    }
}

#[async_trait]
impl ReportSink for SessionSink {
    async fn submit(&self, report: &[u8]) -> Result<(), String> {
        self.0.send_report(report).await.map_err(|e| e.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
