//! hidlink-mouse — one-shot mouse event sender.
//!
//! Sends a single mouse report to the paired Bluetooth host through the
//! HIDLink daemon and exits. Useful for scripting pointer gestures:
//!
//! ```text
//! hidlink-mouse 0 25 0 0     # move 25 to the right
//! hidlink-mouse 1 0 0 0      # press the left button
//! hidlink-mouse 0 0 0 0      # release all buttons
//! hidlink-mouse 0 0 0 -3     # scroll down three notches
//! ```
//!
//! Deltas are relative and limited to the -128..=127 range one boot
//! report can carry; larger movements take several invocations.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hidlink_client::EmulatorClient;

/// One-shot mouse event sender for HIDLink.
#[derive(Debug, Parser)]
#[command(
    name = "hidlink-mouse",
    about = "Send one mouse report to the paired Bluetooth host",
    version,
    allow_negative_numbers = true
)]
struct Cli {
    /// Button bitmask: bit 0 = left, bit 1 = right, bit 2 = middle.
    buttons: u8,

    /// Horizontal movement (positive = right).
    dx: i8,

    /// Vertical movement (positive = down).
    dy: i8,

    /// Wheel movement (positive = away from the user).
    wheel: i8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let client = EmulatorClient::connect()
        .await
        .context("connecting to the HIDLink daemon")?;
    client
        .send_mouse(cli.buttons, cli.dx, cli.dy, cli.wheel)
        .await
        .context("sending the mouse report")?;
    Ok(())
}
