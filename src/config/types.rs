use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub acquire: AcquireConfig,

    #[serde(default)]
    pub relays: RelayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Flat directory holding acquired videos
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,

    /// Seconds a video survives after its most recent access (default: 300)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,

    /// Remove every file in `dir` once at startup (default: true)
    #[serde(default = "default_true")]
    pub sweep_on_start: bool,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("videos")
}
fn default_ttl() -> u64 {
    300
}
fn default_true() -> bool {
    true
}

impl StorageConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            ttl_secs: default_ttl(),
            sweep_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcquireConfig {
    /// Relay-backed attempts before the final direct attempt (default: 5)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Timeout for a single fetch invocation in seconds (default: 3600)
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    /// Explicit path to yt-dlp (PATH lookup when unset)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Extra arguments passed to yt-dlp before the source URL
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_max_attempts() -> u32 {
    5
}
fn default_fetch_timeout() -> u64 {
    3600
}

impl AcquireConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            timeout_secs: default_fetch_timeout(),
            ytdlp_path: None,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Use relays at all; when false every acquisition is direct
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Remote relay-list URLs, tried in order until one yields relays
    #[serde(default = "default_relay_sources")]
    pub sources: Vec<String>,

    /// Static `host:port` relays, placed ahead of fetched ones
    #[serde(default)]
    pub addresses: Vec<String>,

    /// Timeout for fetching a relay source in seconds (default: 10)
    #[serde(default = "default_relay_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_relay_sources() -> Vec<String> {
    vec![
        "https://raw.githubusercontent.com/TheSpeedX/PROXY-List/master/http.txt".to_string(),
        "https://raw.githubusercontent.com/ShiftyTR/Proxy-List/master/http.txt".to_string(),
        "https://raw.githubusercontent.com/monosans/proxy-list/main/proxies/http.txt".to_string(),
    ]
}
fn default_relay_fetch_timeout() -> u64 {
    10
}

impl RelayConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sources: default_relay_sources(),
            addresses: Vec::new(),
            fetch_timeout_secs: default_relay_fetch_timeout(),
        }
    }
}
