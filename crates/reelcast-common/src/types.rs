//! Core value types shared between the fetch layer and the server.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddrV4;
use std::str::FromStr;

use crate::Error;

/// Requested resolution class for an acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityTier {
    #[serde(rename = "2160p")]
    P2160,
    #[serde(rename = "1440p")]
    P1440,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
    #[default]
    #[serde(rename = "best")]
    Best,
    #[serde(rename = "worst")]
    Worst,
}

impl QualityTier {
    /// Every supported tier, highest first.
    pub const ALL: [QualityTier; 8] = [
        QualityTier::P2160,
        QualityTier::P1440,
        QualityTier::P1080,
        QualityTier::P720,
        QualityTier::P480,
        QualityTier::P360,
        QualityTier::Best,
        QualityTier::Worst,
    ];

    /// Maximum video height for numeric tiers, `None` for `best`/`worst`.
    pub fn max_height(self) -> Option<u32> {
        match self {
            QualityTier::P2160 => Some(2160),
            QualityTier::P1440 => Some(1440),
            QualityTier::P1080 => Some(1080),
            QualityTier::P720 => Some(720),
            QualityTier::P480 => Some(480),
            QualityTier::P360 => Some(360),
            QualityTier::Best | QualityTier::Worst => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::P2160 => "2160p",
            QualityTier::P1440 => "1440p",
            QualityTier::P1080 => "1080p",
            QualityTier::P720 => "720p",
            QualityTier::P480 => "480p",
            QualityTier::P360 => "360p",
            QualityTier::Best => "best",
            QualityTier::Worst => "worst",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        QualityTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| Error::invalid_input(format!("unknown quality tier: {s}")))
    }
}

/// An intermediary HTTP proxy used to route an outbound fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relay(SocketAddrV4);

impl Relay {
    pub fn new(addr: SocketAddrV4) -> Self {
        Self(addr)
    }

    pub fn addr(&self) -> SocketAddrV4 {
        self.0
    }

    /// Proxy URL handed to the fetch tool.
    pub fn proxy_url(&self) -> String {
        format!("http://{}", self.0)
    }
}

impl FromStr for Relay {
    type Err = Error;

    /// Parse a `host:port` pair where host is a dotted IPv4 address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<SocketAddrV4>()
            .map(Relay)
            .map_err(|_| Error::invalid_input(format!("invalid relay address: {s:?}")))
    }
}

impl fmt::Display for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
