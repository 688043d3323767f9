use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory holding the built frontend, served with SPA fallback.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default)]
    pub search: Option<SearchConfig>,
    #[serde(default)]
    pub cloud: Option<CloudConfig>,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("dist")
}

/// Search backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Search backend type
    pub backend: SearchBackend,
    /// Jackett-specific configuration (required when backend = "jackett")
    #[serde(default)]
    pub jackett: Option<JackettConfig>,
}

/// Available search backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchBackend {
    Jackett,
    // Future: Prowlarr
}

/// Jackett search backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JackettConfig {
    /// Jackett server URL (e.g., "http://localhost:9117")
    pub url: String,
    /// Jackett API key
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Cloud storage backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudConfig {
    /// Cloud backend type
    pub backend: CloudBackend,
    /// PikPak-specific configuration (required when backend = "pikpak")
    #[serde(default)]
    pub pikpak: Option<PikPakConfig>,
}

/// Available cloud backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CloudBackend {
    Pikpak,
}

/// PikPak cloud backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PikPakConfig {
    /// API base URL
    #[serde(default = "default_pikpak_url")]
    pub base_url: String,
    /// Account email
    pub username: String,
    /// Account password
    pub password: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_pikpak_url() -> String {
    "https://api-drive.mypikpak.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Abuse limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Minimum seconds between download submissions from one client IP.
    /// 0 disables the cooldown.
    #[serde(default = "default_cooldown")]
    pub download_cooldown_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            download_cooldown_secs: default_cooldown(),
        }
    }
}

fn default_cooldown() -> u64 {
    30
}

/// Transfer monitor configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Interval between task list polls while a transfers view is open.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
        }
    }
}

fn default_poll_interval() -> u64 {
    5000
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub static_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SanitizedSearchConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud: Option<SanitizedCloudConfig>,
    pub limits: LimitsConfig,
    pub monitor: MonitorConfig,
}

/// Sanitized search config (API key redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSearchConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jackett: Option<SanitizedJackettConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedJackettConfig {
    pub url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

/// Sanitized cloud config (credentials redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCloudConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pikpak: Option<SanitizedPikPakConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPikPakConfig {
    pub base_url: String,
    pub username: String,
    pub password_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            static_dir: config.static_dir.clone(),
            search: config.search.as_ref().map(|s| SanitizedSearchConfig {
                backend: match s.backend {
                    SearchBackend::Jackett => "jackett".to_string(),
                },
                jackett: s.jackett.as_ref().map(|j| SanitizedJackettConfig {
                    url: j.url.clone(),
                    api_key_configured: !j.api_key.is_empty(),
                    timeout_secs: j.timeout_secs,
                }),
            }),
            cloud: config.cloud.as_ref().map(|c| SanitizedCloudConfig {
                backend: match c.backend {
                    CloudBackend::Pikpak => "pikpak".to_string(),
                },
                pikpak: c.pikpak.as_ref().map(|p| SanitizedPikPakConfig {
                    base_url: p.base_url.clone(),
                    username: p.username.clone(),
                    password_configured: !p.password.is_empty(),
                    timeout_secs: p.timeout_secs,
                }),
            }),
            limits: config.limits.clone(),
            monitor: config.monitor.clone(),
        }
    }
}
