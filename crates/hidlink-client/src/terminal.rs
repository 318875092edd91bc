//! Raw-mode terminal input for the interactive keyboard forwarder.
//!
//! The forwarder needs every keystroke as it happens, without line
//! buffering or local echo, so it switches the tty into raw mode for the
//! duration of the session ([`RawModeGuard`]). Bytes are then read on a
//! dedicated blocking thread and decoded incrementally ([`KeyDecoder`])
//! into [`TerminalKey`] events, which reach the async side through a
//! channel ([`spawn_stdin_reader`]).
//!
//! The decoder understands exactly what the forwarder forwards: printable
//! ASCII, Enter, Backspace, Ctrl-C, and the arrow-key CSI sequences.
//! Everything else is swallowed.

use std::io::{self, Read};
use std::os::fd::RawFd;

use tokio::sync::mpsc;

/// Keys the interactive forwarder distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKey {
    /// A printable ASCII character.
    Char(char),
    Enter,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowRight,
    ArrowLeft,
    /// Ctrl-C; ends the session.
    Interrupt,
}

// ── Raw mode ──────────────────────────────────────────────────────────────────

/// Puts the terminal into raw mode and restores the saved settings on
/// drop, so a panic or early return cannot leave the shell unusable.
pub struct RawModeGuard {
    fd: RawFd,
    saved: libc::termios,
}

impl RawModeGuard {
    /// Switches stdin's terminal to raw mode.
    ///
    /// # Errors
    ///
    /// Fails if stdin is not a terminal or the termios calls are refused.
    pub fn enable() -> io::Result<Self> {
        let fd = libc::STDIN_FILENO;
        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut saved) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut raw = saved;
        unsafe { libc::cfmakeraw(&mut raw) };
        // Blocking single-byte reads: deliver each keystroke immediately.
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { fd, saved })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Best effort; the tty may already be gone.
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSANOW, &self.saved);
        }
    }
}

// ── Byte stream decoding ──────────────────────────────────────────────────────

/// Incremental decoder for the byte stream a raw-mode tty produces.
///
/// Escape sequences arrive one byte at a time, so the decoder keeps the
/// bytes of an unfinished sequence and emits a key only once it is
/// complete. Unrecognised sequences are consumed silently.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one input byte; returns a key when one is complete.
    pub fn feed(&mut self, byte: u8) -> Option<TerminalKey> {
        if self.pending.is_empty() {
            return match byte {
                0x03 => Some(TerminalKey::Interrupt),
                b'\r' | b'\n' => Some(TerminalKey::Enter),
                0x7F | 0x08 => Some(TerminalKey::Backspace),
                0x1B => {
                    self.pending.push(byte);
                    None
                }
                0x20..=0x7E => Some(TerminalKey::Char(byte as char)),
                _ => None,
            };
        }

        if self.pending.len() == 1 {
            // Only CSI sequences (ESC `[`) are understood; a lone ESC
            // followed by anything else is dropped and the byte is
            // decoded on its own.
            if byte == b'[' {
                self.pending.push(byte);
                return None;
            }
            self.pending.clear();
            return self.feed(byte);
        }

        // Inside a CSI sequence: parameter bytes accumulate, a final
        // byte (0x40..=0x7E) terminates it.
        if (0x40..=0x7E).contains(&byte) {
            self.pending.clear();
            return match byte {
                b'A' => Some(TerminalKey::ArrowUp),
                b'B' => Some(TerminalKey::ArrowDown),
                b'C' => Some(TerminalKey::ArrowRight),
                b'D' => Some(TerminalKey::ArrowLeft),
                _ => None,
            };
        }
        self.pending.push(byte);
        None
    }
}

// ── Reader thread ─────────────────────────────────────────────────────────────

/// Spawns a blocking thread that decodes stdin into key events.
///
/// Terminal reads cannot be done asynchronously without pulling the fd
/// out from under the tty, so a plain thread reads byte by byte and
/// forwards decoded keys over a channel. The thread ends when stdin
/// closes or the receiver is dropped.
///
/// # Errors
///
/// Fails only if the thread cannot be spawned.
pub fn spawn_stdin_reader() -> io::Result<mpsc::UnboundedReceiver<TerminalKey>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let mut decoder = KeyDecoder::new();
            let mut stdin = io::stdin().lock();
            let mut buf = [0u8; 1];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        if let Some(key) = decoder.feed(buf[0]) {
                            if tx.send(key).is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(_) => break,
                }
            }
        })?;
    Ok(rx)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Runs a byte sequence through a fresh decoder, collecting the keys.
    fn decode_all(bytes: &[u8]) -> Vec<TerminalKey> {
        let mut decoder = KeyDecoder::new();
        bytes.iter().filter_map(|&b| decoder.feed(b)).collect()
    }

    #[test]
    fn test_printable_ascii_decodes_to_char() {
        assert_eq!(
            decode_all(b"hi!"),
            vec![
                TerminalKey::Char('h'),
                TerminalKey::Char('i'),
                TerminalKey::Char('!'),
            ]
        );
    }

    #[test]
    fn test_carriage_return_and_newline_are_enter() {
        // Raw mode delivers CR for the Enter key; LF appears in pastes.
        assert_eq!(
            decode_all(b"\r\n"),
            vec![TerminalKey::Enter, TerminalKey::Enter]
        );
    }

    #[test]
    fn test_delete_and_backspace_bytes_are_backspace() {
        assert_eq!(
            decode_all(&[0x7F, 0x08]),
            vec![TerminalKey::Backspace, TerminalKey::Backspace]
        );
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        assert_eq!(decode_all(&[0x03]), vec![TerminalKey::Interrupt]);
    }

    #[test]
    fn test_arrow_escape_sequences() {
        assert_eq!(decode_all(b"\x1b[A"), vec![TerminalKey::ArrowUp]);
        assert_eq!(decode_all(b"\x1b[B"), vec![TerminalKey::ArrowDown]);
        assert_eq!(decode_all(b"\x1b[C"), vec![TerminalKey::ArrowRight]);
        assert_eq!(decode_all(b"\x1b[D"), vec![TerminalKey::ArrowLeft]);
    }

    #[test]
    fn test_unknown_csi_sequence_is_swallowed() {
        // Delete key: ESC [ 3 ~ is consumed without producing anything,
        // and decoding continues cleanly afterwards.
        assert_eq!(
            decode_all(b"\x1b[3~x"),
            vec![TerminalKey::Char('x')]
        );
    }

    #[test]
    fn test_lone_escape_before_printable_drops_the_escape() {
        assert_eq!(decode_all(b"\x1bq"), vec![TerminalKey::Char('q')]);
    }

    #[test]
    fn test_other_control_bytes_are_ignored() {
        // Ctrl-A and a NUL byte produce nothing.
        assert_eq!(decode_all(&[0x01, 0x00]), Vec::<TerminalKey>::new());
    }

    #[test]
    fn test_interleaved_sequences_and_text() {
        assert_eq!(
            decode_all(b"a\x1b[Cb"),
            vec![
                TerminalKey::Char('a'),
                TerminalKey::ArrowRight,
                TerminalKey::Char('b'),
            ]
        );
    }
}
