//! Bluetooth HID transport over L2CAP.
//!
//! A HID session consists of two SOCK_SEQPACKET L2CAP connections from the
//! same host: the control channel on PSM 17 and the interrupt channel on
//! PSM 19. Input reports travel host-bound on the interrupt channel; the
//! control channel is held open for the lifetime of the session but the boot
//! protocol never requires writing to it.
//!
//! Two ways a session can come into existence:
//!
//! - **Profile mode**: bluetoothd accepted the connections and handed us the
//!   file descriptors through `org.bluez.Profile1.NewConnection`. Sockets
//!   arrive one at a time via [`session::SessionManager::attach_channel`].
//! - **Raw-socket mode**: we bind and accept the PSMs ourselves with a
//!   [`listener::RawSocketListener`] when profile registration is refused.
//!
//! # Testability
//!
//! The `ReportSocket` and `ChannelListener` traits decouple the session
//! state machine from `bluer` sockets; tests drive it with the doubles in
//! [`mock`].

use std::io;

use async_trait::async_trait;

pub mod channel;
pub mod listener;
pub mod mock;
pub mod session;

pub use channel::{Channel, ChannelPair, PSM_CONTROL, PSM_INTERRUPT};
pub use session::{SessionManager, SessionSink, SessionState};

/// Error type for transport and session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No complete channel pair is open; the report was dropped.
    #[error("no host connected")]
    NotConnected,
    /// A socket operation failed; the session is torn down.
    #[error("transport failure: {source}")]
    Transport {
        #[from]
        source: io::Error,
    },
    /// A second connection was classified into an occupied channel slot.
    /// Indicates a classification bug or a misbehaving peer.
    #[error("{0} channel already assigned")]
    DuplicateChannel(Channel),
}

/// Trait abstracting one connected L2CAP channel socket.
///
/// The production implementation wraps a `bluer` seqpacket socket; tests use
/// [`mock::RecordingSocket`]. Dropping the implementor closes the socket.
#[async_trait]
pub trait ReportSocket: Send + Sync {
    /// Writes one datagram to the channel.
    async fn send(&self, payload: &[u8]) -> io::Result<()>;
}

/// Both sockets produced by one successful raw-socket accept cycle.
///
/// Field order mirrors the accept order required by the HID specification:
/// the host always opens control before interrupt.
pub struct AcceptedChannels {
    pub control: Box<dyn ReportSocket>,
    pub interrupt: Box<dyn ReportSocket>,
}

/// Trait abstracting the raw-socket accept cycle.
///
/// The production implementation binds L2CAP listeners; tests use
/// [`mock::MockListener`].
#[async_trait]
pub trait ChannelListener: Send + Sync {
    /// Accepts one control + interrupt channel pair from the next host.
    ///
    /// Resolves only when both channels are open; cancellation-safe in the
    /// sense that an aborted call leaves no session state behind.
    async fn accept_pair(&self) -> io::Result<AcceptedChannels>;
}
