//! HID channel identity and the control/interrupt socket pair.
//!
//! BlueZ reports the PSM of an incoming profile connection in the
//! `NewConnection` fd-properties dictionary, but older stacks omit it.
//! [`ChannelPair::classify_inbound`] therefore falls back to arrival order:
//! hosts open the control channel first, so the first unclassified
//! connection takes the control slot and the second the interrupt slot.

use std::fmt;

use tracing::debug;

use super::{ReportSocket, SessionError};

/// L2CAP PSM of the HID control channel.
pub const PSM_CONTROL: u16 = 17;
/// L2CAP PSM of the HID interrupt channel.
pub const PSM_INTERRUPT: u16 = 19;

/// Identifies one of the two channels of a HID session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Control,
    Interrupt,
}

impl Channel {
    /// The well-known PSM this channel is served on.
    pub fn psm(self) -> u16 {
        match self {
            Channel::Control => PSM_CONTROL,
            Channel::Interrupt => PSM_INTERRUPT,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Control => write!(f, "control"),
            Channel::Interrupt => write!(f, "interrupt"),
        }
    }
}

/// The two sockets of one HID session.
///
/// A pair is *complete* when both slots are filled; reports can only be
/// sent through a complete pair. Dropping a slot closes its socket.
#[derive(Default)]
pub struct ChannelPair {
    control: Option<Box<dyn ReportSocket>>,
    interrupt: Option<Box<dyn ReportSocket>>,
}

impl ChannelPair {
    /// Creates an empty pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides which slot an inbound connection belongs to.
    ///
    /// PSM 17 and 19 classify directly. A missing PSM claims the first free
    /// slot in control-then-interrupt order. An unknown PSM is given the
    /// interrupt slot if it is still free; otherwise the connection is
    /// rejected (`None`) and the caller should drop the socket.
    pub fn classify_inbound(&self, psm: Option<u16>) -> Option<Channel> {
        match psm {
            Some(PSM_CONTROL) => Some(Channel::Control),
            Some(PSM_INTERRUPT) => Some(Channel::Interrupt),
            None if self.control.is_none() => Some(Channel::Control),
            None if self.interrupt.is_none() => Some(Channel::Interrupt),
            _ if self.interrupt.is_none() => Some(Channel::Interrupt),
            _ => None,
        }
    }

    /// Places a socket into the given slot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DuplicateChannel`] if the slot is already
    /// occupied; the existing socket is left untouched.
    pub fn assign(
        &mut self,
        channel: Channel,
        socket: Box<dyn ReportSocket>,
    ) -> Result<(), SessionError> {
        let slot = match channel {
            Channel::Control => &mut self.control,
            Channel::Interrupt => &mut self.interrupt,
        };
        if slot.is_some() {
            return Err(SessionError::DuplicateChannel(channel));
        }
        *slot = Some(socket);
        debug!(%channel, "channel slot filled");
        Ok(())
    }

    /// Returns `true` when both channels are open.
    pub fn is_complete(&self) -> bool {
        self.control.is_some() && self.interrupt.is_some()
    }

    /// Writes one report datagram to the interrupt channel.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] if the pair is incomplete, or
    /// [`SessionError::Transport`] if the socket write fails.
    pub async fn send(&self, payload: &[u8]) -> Result<(), SessionError> {
        let interrupt = match (&self.control, &self.interrupt) {
            (Some(_), Some(sock)) => sock,
            _ => return Err(SessionError::NotConnected),
        };
        interrupt.send(payload).await?;
        Ok(())
    }

    /// Closes both sockets if present. Idempotent, never fails.
    pub fn close_all(&mut self) {
        self.control = None;
        self.interrupt = None;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::transport::mock::RecordingSocket;

    fn stub_socket() -> Box<dyn ReportSocket> {
        Box::new(RecordingSocket::new())
    }

    // ── Classification ────────────────────────────────────────────────────────

    #[test]
    fn test_classify_by_known_psm() {
        let pair = ChannelPair::new();
        assert_eq!(pair.classify_inbound(Some(17)), Some(Channel::Control));
        assert_eq!(pair.classify_inbound(Some(19)), Some(Channel::Interrupt));
    }

    #[test]
    fn test_classify_without_psm_follows_arrival_order() {
        // Arrange
        let mut pair = ChannelPair::new();

        // Act + Assert – first anonymous connection is control
        assert_eq!(pair.classify_inbound(None), Some(Channel::Control));
        pair.assign(Channel::Control, stub_socket()).unwrap();

        // second anonymous connection is interrupt
        assert_eq!(pair.classify_inbound(None), Some(Channel::Interrupt));
    }

    #[test]
    fn test_classify_unknown_psm_takes_free_interrupt_slot() {
        let pair = ChannelPair::new();
        assert_eq!(pair.classify_inbound(Some(4097)), Some(Channel::Interrupt));
    }

    #[test]
    fn test_classify_rejects_third_connection() {
        // Arrange – both slots taken
        let mut pair = ChannelPair::new();
        pair.assign(Channel::Control, stub_socket()).unwrap();
        pair.assign(Channel::Interrupt, stub_socket()).unwrap();

        // Act + Assert – anonymous and unknown-PSM connections are rejected
        assert_eq!(pair.classify_inbound(None), None);
        assert_eq!(pair.classify_inbound(Some(4097)), None);
    }

    // ── Assignment ────────────────────────────────────────────────────────────

    #[test]
    fn test_assign_twice_is_duplicate_channel() {
        // Arrange
        let mut pair = ChannelPair::new();
        pair.assign(Channel::Interrupt, stub_socket()).unwrap();

        // Act
        let result = pair.assign(Channel::Interrupt, stub_socket());

        // Assert
        assert!(matches!(
            result,
            Err(SessionError::DuplicateChannel(Channel::Interrupt))
        ));
    }

    #[test]
    fn test_pair_complete_only_with_both_slots() {
        let mut pair = ChannelPair::new();
        assert!(!pair.is_complete());
        pair.assign(Channel::Control, stub_socket()).unwrap();
        assert!(!pair.is_complete());
        pair.assign(Channel::Interrupt, stub_socket()).unwrap();
        assert!(pair.is_complete());
    }

    // ── Sending ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_send_before_complete_is_not_connected() {
        // Arrange – control only
        let mut pair = ChannelPair::new();
        pair.assign(Channel::Control, stub_socket()).unwrap();

        // Act + Assert
        let result = pair.send(&[0xA1, 0x01]).await;
        assert!(matches!(result, Err(SessionError::NotConnected)));
    }

    #[tokio::test]
    async fn test_send_writes_interrupt_channel_only() {
        // Arrange
        let control = RecordingSocket::new();
        let interrupt = RecordingSocket::new();
        let control_log = control.sent_handle();
        let interrupt_log = interrupt.sent_handle();

        let mut pair = ChannelPair::new();
        pair.assign(Channel::Control, Box::new(control)).unwrap();
        pair.assign(Channel::Interrupt, Box::new(interrupt)).unwrap();

        // Act
        pair.send(&[0xA1, 0x02, 0, 1, 1, 0]).await.unwrap();

        // Assert
        assert!(control_log.lock().unwrap().is_empty());
        assert_eq!(
            interrupt_log.lock().unwrap().as_slice(),
            &[vec![0xA1, 0x02, 0, 1, 1, 0]]
        );
    }

    #[tokio::test]
    async fn test_close_all_then_send_is_not_connected() {
        // Arrange
        let mut pair = ChannelPair::new();
        pair.assign(Channel::Control, stub_socket()).unwrap();
        pair.assign(Channel::Interrupt, stub_socket()).unwrap();

        // Act – close twice to confirm idempotence
        pair.close_all();
        pair.close_all();

        // Assert
        assert!(!pair.is_complete());
        assert!(matches!(
            pair.send(&[0xA1]).await,
            Err(SessionError::NotConnected)
        ));
    }
}
