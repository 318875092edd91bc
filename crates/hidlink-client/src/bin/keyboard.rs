//! hidlink-keyboard — interactive terminal keyboard forwarder.
//!
//! Turns the terminal it runs in into a keyboard for the Bluetooth host
//! paired with the HIDLink daemon: every keystroke typed here is replayed
//! on the host as a press-and-release of the corresponding HID key.
//!
//! The terminal is switched to raw mode for the session and restored on
//! exit. Typed characters are echoed locally so the session feels like a
//! normal terminal; Ctrl-C ends it.
//!
//! # Usage
//!
//! ```text
//! hidlink-keyboard [OPTIONS]
//!
//! Options:
//!   --key-hold-ms  <MS>   How long each key is held down [default: 10]
//!   --key-delay-ms <MS>   Pause between keystrokes [default: 10]
//! ```
//!
//! Some hosts drop reports that arrive back to back; raising the two
//! delays a little is the first thing to try when characters go missing.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hidlink_client::{spawn_stdin_reader, EmulatorClient, RawModeGuard, TerminalKey};
use hidlink_core::{key_press_for_char, resolve_key_name};

/// Interactive keyboard forwarder for HIDLink.
#[derive(Debug, Parser)]
#[command(
    name = "hidlink-keyboard",
    about = "Forward keystrokes from this terminal to the paired Bluetooth host",
    version
)]
struct Cli {
    /// How long each key is held down, in milliseconds.
    #[arg(long, default_value_t = 10, env = "HIDLINK_KEY_HOLD_MS")]
    key_hold_ms: u64,

    /// Pause after each keystroke, in milliseconds.
    #[arg(long, default_value_t = 10, env = "HIDLINK_KEY_DELAY_MS")]
    key_delay_ms: u64,
}

/// Usage codes of the named keys the forwarder sends, resolved once at
/// startup so the event loop cannot hit a lookup error.
struct NamedKeys {
    enter: u8,
    backspace: u8,
    up: u8,
    down: u8,
    left: u8,
    right: u8,
}

impl NamedKeys {
    fn resolve() -> anyhow::Result<Self> {
        Ok(Self {
            enter: resolve_key_name("KEY_ENTER")?,
            backspace: resolve_key_name("KEY_BACKSPACE")?,
            up: resolve_key_name("KEY_UP")?,
            down: resolve_key_name("KEY_DOWN")?,
            left: resolve_key_name("KEY_LEFT")?,
            right: resolve_key_name("KEY_RIGHT")?,
        })
    }
}

/// Sends a full press-and-release cycle for one key.
async fn tap(client: &EmulatorClient, modifiers: u8, code: u8, cli: &Cli) -> anyhow::Result<()> {
    client
        .send_keys(modifiers, &[code])
        .await
        .context("sending key press")?;
    tokio::time::sleep(Duration::from_millis(cli.key_hold_ms)).await;
    client.release_keys().await.context("sending key release")?;
    tokio::time::sleep(Duration::from_millis(cli.key_delay_ms)).await;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr and would tear up the raw-mode display, so only
    // warnings and errors surface by default.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let keys = NamedKeys::resolve()?;
    let client = EmulatorClient::connect()
        .await
        .context("connecting to the HIDLink daemon")?;

    println!("Forwarding keystrokes to the paired host. Ctrl-C to quit.");

    let guard = RawModeGuard::enable().context("switching the terminal to raw mode")?;
    let mut events = spawn_stdin_reader().context("starting the stdin reader")?;

    while let Some(event) = events.recv().await {
        match event {
            TerminalKey::Interrupt => break,
            TerminalKey::Char(c) => match key_press_for_char(c) {
                Ok(press) => {
                    print!("{c}");
                    std::io::stdout().flush().ok();
                    tap(&client, press.modifiers.0, press.code, &cli).await?;
                }
                Err(e) => {
                    // Raw mode needs explicit carriage returns.
                    eprint!("\r\n{e}, skipped\r\n");
                }
            },
            TerminalKey::Enter => {
                print!("\r\n");
                std::io::stdout().flush().ok();
                tap(&client, 0, keys.enter, &cli).await?;
            }
            TerminalKey::Backspace => {
                // Erase the echoed character locally too.
                print!("\x08 \x08");
                std::io::stdout().flush().ok();
                tap(&client, 0, keys.backspace, &cli).await?;
            }
            TerminalKey::ArrowUp => tap(&client, 0, keys.up, &cli).await?,
            TerminalKey::ArrowDown => tap(&client, 0, keys.down, &cli).await?,
            TerminalKey::ArrowLeft => tap(&client, 0, keys.left, &cli).await?,
            TerminalKey::ArrowRight => tap(&client, 0, keys.right, &cli).await?,
        }
    }

    // Make sure the host is not left with a stuck key, then give the
    // terminal back before the goodbye message.
    client.release_keys().await.ok();
    drop(guard);
    println!("Session ended.");
    Ok(())
}
