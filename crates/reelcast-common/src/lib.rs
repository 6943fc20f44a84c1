//! Reelcast-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across reelcast:
//!
//! - **Typed IDs**: [`OutputId`], the identifier of a stored video file
//! - **Core Types**: [`QualityTier`] and [`Relay`]
//! - **Path Utilities**: Mapping identifiers to files in the storage directory
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use reelcast_common::{OutputId, QualityTier, Relay};
//! use reelcast_common::paths::video_path;
//! use std::path::Path;
//!
//! let id = OutputId::generate();
//! let path = video_path(Path::new("videos"), &id);
//! assert!(path.to_string_lossy().ends_with(".mp4"));
//!
//! let tier: QualityTier = "720p".parse().unwrap();
//! assert_eq!(tier.max_height(), Some(720));
//!
//! let relay: Relay = "10.0.0.1:8080".parse().unwrap();
//! assert_eq!(relay.proxy_url(), "http://10.0.0.1:8080");
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
