use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::device::DeviceKind;

const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Room for the message envelope and clip metadata around the content.
const MESSAGE_ENVELOPE_BYTES: u64 = 64 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration
///
/// Every section and field is optional in the TOML file; missing values take
/// the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub sync: SyncConfig,
    pub network: NetworkConfig,
    pub analysis: AnalysisConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Name stamped on clips created here. Defaults to the platform profile.
    pub device_name: Option<String>,
}

/// Synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Lifetime of ephemeral clips.
    pub ephemeral_ttl_secs: u64,
    /// Interval between sweeps for expired clips.
    pub expiry_sweep_secs: u64,
    /// Broadcast `DELETE_CLIP` when a clip is deleted locally.
    pub propagate_deletes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub enabled: bool,
    pub listen_addr: String,
    /// Dial peers found through mDNS without waiting for an explicit link.
    pub auto_connect_discovered: bool,
    pub request_timeout_secs: u64,
    pub idle_connection_timeout_secs: u64,
    /// Largest clip message sent or accepted, in bytes.
    pub max_message_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    /// Inline API key. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// Leading characters of text content sent for analysis.
    pub max_text_chars: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Maximum number of clips kept in history
    pub max_history_items: usize,
    /// Size limit of the local store file, in bytes.
    pub quota_bytes: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            ephemeral_ttl_secs: 60,
            expiry_sweep_secs: 5,
            propagate_deletes: false,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            listen_addr: "/ip4/0.0.0.0/tcp/0".to_string(),
            auto_connect_discovered: false,
            request_timeout_secs: 30,
            idle_connection_timeout_secs: 3600,
            max_message_bytes: DEFAULT_QUOTA_BYTES + MESSAGE_ENVELOPE_BYTES,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            api_key_env: "API_KEY".to_string(),
            timeout_secs: 30,
            max_text_chars: 5000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_history_items: 1000,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn device_name(&self) -> String {
        self.general
            .device_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| DeviceKind::current().display_name().to_string())
    }

    /// Network settings with the message limit raised to fit any clip the
    /// local store can hold.
    pub fn network_config(&self) -> NetworkConfig {
        let storable = self
            .storage
            .quota_bytes
            .saturating_add(MESSAGE_ENVELOPE_BYTES);
        NetworkConfig {
            max_message_bytes: self.network.max_message_bytes.max(storable),
            ..self.network.clone()
        }
    }
}

impl StorageConfig {
    /// History capacity, never below one clip.
    pub fn history_capacity(&self) -> usize {
        self.max_history_items.max(1)
    }
}

impl SyncConfig {
    pub fn ephemeral_ttl(&self) -> Duration {
        Duration::from_secs(self.ephemeral_ttl_secs)
    }

    /// Sweep interval, never shorter than one second.
    pub fn expiry_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.expiry_sweep_secs.max(1))
    }
}

impl AnalysisConfig {
    /// Resolves the API key from the inline value or the configured env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}
