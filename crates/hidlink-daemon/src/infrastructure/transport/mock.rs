//! Mock transport doubles for unit and integration testing.
//!
//! Allows tests to drive the session state machine without a Bluetooth
//! adapter or a peer host.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{AcceptedChannels, ChannelListener, ReportSocket};

/// A mock [`ReportSocket`] that records every payload written to it.
///
/// The send log and failure switch are shared handles, so tests keep
/// access after the socket is boxed into a channel pair.
pub struct RecordingSocket {
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    fail_sends: Arc<AtomicBool>,
}

impl RecordingSocket {
    /// Creates a socket that accepts every send.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_sends: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a handle to the log of sent payloads.
    pub fn sent_handle(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.sent)
    }

    /// Returns a switch that makes subsequent sends fail with `BrokenPipe`.
    pub fn failure_switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fail_sends)
    }
}

impl Default for RecordingSocket {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportSocket for RecordingSocket {
    async fn send(&self, payload: &[u8]) -> io::Result<()> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "injected failure"));
        }
        self.sent.lock().expect("lock poisoned").push(payload.to_vec());
        Ok(())
    }
}

/// One scripted outcome of a [`MockListener::accept_pair`] call.
pub enum AcceptOutcome {
    /// Resolve with a ready channel pair.
    Accept(AcceptedChannels),
    /// Fail with the given I/O error kind.
    Fail(io::ErrorKind),
    /// Never resolve (a listener waiting for a host that never comes).
    Pending,
}

/// A mock [`ChannelListener`] driven by a script of outcomes.
///
/// Each `accept_pair` call consumes the next outcome; an exhausted script
/// behaves like [`AcceptOutcome::Pending`]. The call counter lets tests
/// assert how many accept cycles were started.
pub struct MockListener {
    calls: AtomicUsize,
    script: Mutex<VecDeque<AcceptOutcome>>,
}

impl MockListener {
    /// Creates a listener with the given outcome script.
    pub fn new(script: Vec<AcceptOutcome>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script: Mutex::new(script.into()),
        }
    }

    /// Creates a listener that never produces a connection.
    pub fn pending() -> Self {
        Self::new(Vec::new())
    }

    /// Returns the number of accept cycles started so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelListener for MockListener {
    async fn accept_pair(&self) -> io::Result<AcceptedChannels> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.script.lock().expect("lock poisoned").pop_front();
        match outcome {
            Some(AcceptOutcome::Accept(channels)) => Ok(channels),
            Some(AcceptOutcome::Fail(kind)) => Err(io::Error::new(kind, "scripted failure")),
            Some(AcceptOutcome::Pending) | None => std::future::pending().await,
        }
    }
}

/// Builds an [`AcceptedChannels`] pair of recording sockets, returning the
/// interrupt-side send log for assertions.
pub fn recording_pair() -> (AcceptedChannels, Arc<Mutex<Vec<Vec<u8>>>>, Arc<AtomicBool>) {
    let control = RecordingSocket::new();
    let interrupt = RecordingSocket::new();
    let log = interrupt.sent_handle();
    let failure = interrupt.failure_switch();
    let channels = AcceptedChannels {
        control: Box::new(control),
        interrupt: Box::new(interrupt),
    };
    (channels, log, failure)
}
