//! Raw L2CAP socket listener and socket adapters.
//!
//! Used when BlueZ profile registration is refused (another input profile
//! plugin already owns the HID PSMs is the common cause on stock installs
//! where the `input` plugin is enabled). In that mode the daemon binds PSM
//! 17 and 19 itself and accepts the host's connections directly.
//!
//! Binding PSMs below 0x1001 is a privileged operation; the daemon needs
//! CAP_NET_BIND_SERVICE or root for this mode.

use std::io;
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd};
use std::time::Duration;

use async_trait::async_trait;
use bluer::l2cap::{SeqPacket, SeqPacketListener, SocketAddr};
use bluer::{Address, AddressType};
use tokio::time;
use tracing::{debug, info};

use super::channel::{PSM_CONTROL, PSM_INTERRUPT};
use super::{AcceptedChannels, ChannelListener, ReportSocket};

/// A [`ReportSocket`] backed by a connected L2CAP seqpacket socket.
pub struct L2capSocket {
    inner: SeqPacket,
}

impl L2capSocket {
    pub fn new(inner: SeqPacket) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ReportSocket for L2capSocket {
    async fn send(&self, payload: &[u8]) -> io::Result<()> {
        let written = self.inner.send(payload).await?;
        if written != payload.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "short write on seqpacket channel",
            ));
        }
        Ok(())
    }
}

/// Wraps a connected L2CAP file descriptor received from bluetoothd.
///
/// bluetoothd hands descriptors over in blocking mode; the descriptor is
/// switched to non-blocking before registration with the runtime.
pub fn socket_from_fd(fd: OwnedFd) -> io::Result<L2capSocket> {
    let raw = fd.as_raw_fd();
    let flags = unsafe { libc::fcntl(raw, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    if unsafe { libc::fcntl(raw, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    // Safety: the descriptor is valid (released from an OwnedFd just now),
    // connected, and non-blocking; ownership moves into the socket.
    let inner = unsafe { SeqPacket::from_raw_fd(fd.into_raw_fd())? };
    Ok(L2capSocket { inner })
}

/// Accepts HID channel pairs by binding the well-known PSMs directly.
pub struct RawSocketListener {
    /// Host to nudge with an outbound connect before listening, if any.
    nudge_peer: Option<Address>,
    nudge_timeout: Duration,
}

impl RawSocketListener {
    pub fn new(nudge_peer: Option<Address>, nudge_timeout: Duration) -> Self {
        Self {
            nudge_peer,
            nudge_timeout,
        }
    }

    /// Verifies at startup that the HID PSMs can be bound at all.
    ///
    /// Steady-state accept failures are retried forever, but a bind refused
    /// here will be refused on every retry too, so it is surfaced as a
    /// startup error instead.
    pub async fn check_bind(&self) -> io::Result<()> {
        for psm in [PSM_CONTROL, PSM_INTERRUPT] {
            let listener = Self::bind_psm(psm).await?;
            drop(listener);
        }
        Ok(())
    }

    async fn bind_psm(psm: u16) -> io::Result<SeqPacketListener> {
        let local = SocketAddr::new(Address::any(), AddressType::BrEdr, psm);
        SeqPacketListener::bind(local)
            .await
            .map_err(|e| annotate_bind_error(psm, e))
    }

    /// Pokes the configured host with an outbound connect.
    ///
    /// Hosts that remember a paired HID device treat any connection attempt
    /// from it as a wake-up and reconnect on their own. The attempt itself
    /// is expected to fail and the outcome is only logged.
    async fn nudge(&self) {
        let peer = match self.nudge_peer {
            Some(peer) => peer,
            None => return,
        };
        let target = SocketAddr::new(peer, AddressType::BrEdr, PSM_CONTROL);
        match time::timeout(self.nudge_timeout, SeqPacket::connect(target)).await {
            Ok(Ok(_)) => debug!(%peer, "nudge connect unexpectedly succeeded, closing it"),
            Ok(Err(e)) => debug!(%peer, error = %e, "nudge connect refused (expected)"),
            Err(_) => debug!(%peer, "nudge connect timed out (expected)"),
        }
    }
}

#[async_trait]
impl ChannelListener for RawSocketListener {
    async fn accept_pair(&self) -> io::Result<AcceptedChannels> {
        // Bind before nudging so a host that reacts immediately finds the
        // PSMs already open.
        let control_listener = Self::bind_psm(PSM_CONTROL).await?;
        let interrupt_listener = Self::bind_psm(PSM_INTERRUPT).await?;

        self.nudge().await;

        let (control, peer) = control_listener.accept().await?;
        info!(peer = %peer.addr, "host opened control channel");
        let (interrupt, peer) = interrupt_listener.accept().await?;
        info!(peer = %peer.addr, "host opened interrupt channel");

        Ok(AcceptedChannels {
            control: Box::new(L2capSocket::new(control)),
            interrupt: Box::new(L2capSocket::new(interrupt)),
        })
    }
}

fn annotate_bind_error(psm: u16, err: io::Error) -> io::Error {
    if err.kind() == io::ErrorKind::PermissionDenied {
        io::Error::new(
            err.kind(),
            format!("binding L2CAP PSM {psm} requires CAP_NET_BIND_SERVICE or root: {err}"),
        )
    } else {
        err
    }
}
