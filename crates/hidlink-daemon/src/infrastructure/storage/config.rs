//! TOML-based configuration for the daemon.
//!
//! The daemon looks for its config at `/etc/hidlink/config.toml` first
//! (the packaged install), then falls back to the per-user location
//! `~/.config/hidlink/config.toml`. A missing file is not an error;
//! every field has a working default. Example:
//!
//! ```toml
//! [adapter]
//! alias = "HIDLink Keyboard"
//! discoverable = true
//!
//! [transport]
//! peer_address = "DC:2C:26:E8:FF:02"
//! retry_delay_ms = 2000
//! ```
//!
//! The daemon only ever reads its config, so the schema types derive
//! `Deserialize` but not `Serialize`.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// System-wide config path used by the packaged install.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/hidlink/config.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level daemon configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct DaemonConfig {
    #[serde(default)]
    pub adapter: AdapterConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Bluetooth adapter settings applied at startup.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AdapterConfig {
    /// D-Bus object path of the adapter to configure.
    #[serde(default = "default_adapter_path")]
    pub object_path: String,
    /// Name hosts see when scanning.
    #[serde(default = "default_alias")]
    pub alias: String,
    /// Whether the adapter is made permanently discoverable.
    #[serde(default = "default_true")]
    pub discoverable: bool,
    /// Whether the adapter is made permanently pairable.
    #[serde(default = "default_true")]
    pub pairable: bool,
    /// Capability string advertised by the pairing agent.
    /// `"NoInputNoOutput"` selects Just Works pairing.
    #[serde(default = "default_agent_capability")]
    pub agent_capability: String,
}

/// HID profile settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProfileConfig {
    /// Path to an SDP record XML file replacing the built-in one.
    pub service_record_path: Option<String>,
}

/// Session and raw-socket transport settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TransportConfig {
    /// Bluetooth address of a known host, used only by raw-socket mode
    /// to nudge the host into reconnecting (`"AA:BB:CC:DD:EE:FF"`).
    pub peer_address: Option<String>,
    /// Whether raw-socket mode performs the reconnect nudge at all.
    #[serde(default = "default_true")]
    pub nudge_peer: bool,
    /// How long a nudge attempt may take before it is abandoned.
    #[serde(default = "default_nudge_timeout_ms")]
    pub nudge_timeout_ms: u64,
    /// Pause between listener cycles after a transport failure.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl TransportConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn nudge_timeout(&self) -> Duration {
        Duration::from_millis(self.nudge_timeout_ms)
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_adapter_path() -> String {
    "/org/bluez/hci0".to_string()
}
fn default_alias() -> String {
    "HIDLink Keyboard".to_string()
}
fn default_true() -> bool {
    true
}
fn default_agent_capability() -> String {
    "NoInputNoOutput".to_string()
}
fn default_nudge_timeout_ms() -> u64 {
    1_000
}
fn default_retry_delay_ms() -> u64 {
    2_000
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            object_path: default_adapter_path(),
            alias: default_alias(),
            discoverable: default_true(),
            pairable: default_true(),
            agent_capability: default_agent_capability(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            service_record_path: None,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            peer_address: None,
            nudge_peer: default_true(),
            nudge_timeout_ms: default_nudge_timeout_ms(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Resolves the config file path, preferring the system location.
///
/// Returns `None` when neither the system file exists nor a user config
/// base directory can be determined; the caller falls back to defaults.
pub fn config_file_path() -> Option<PathBuf> {
    let system = PathBuf::from(SYSTEM_CONFIG_PATH);
    if system.exists() {
        return Some(system);
    }
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("hidlink").join("config.toml"))
}

/// Loads [`DaemonConfig`], returning defaults if no config file exists.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than
/// "not found", and [`ConfigError::Parse`] if the TOML is malformed.
/// A malformed file is a hard error rather than a silent fallback so
/// that a typo cannot quietly revert the daemon to defaults.
pub fn load_config() -> Result<DaemonConfig, ConfigError> {
    let Some(path) = config_file_path() else {
        return Ok(DaemonConfig::default());
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: DaemonConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DaemonConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
