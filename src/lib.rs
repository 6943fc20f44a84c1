//! Reelcast - on-demand video relay
//!
//! Fetches a remote video through a rotating pool of relays, serves it with
//! HTTP range support and deletes it shortly after the viewer stops watching.
//!
//! This library crate exposes the core functionality for integration testing.

pub mod acquire;
pub mod config;
pub mod relay;
pub mod server;
pub mod store;
pub mod streaming;
