//! Outbound relays used to retry acquisitions.
//!
//! - [`RelayPool`] hands relays out in strict rotation.
//! - [`feed`] loads the initial relay list from config and remote text feeds.

pub mod feed;
mod pool;

pub use feed::{fetch_relays, load_relays, parse_relay_list};
pub use pool::RelayPool;
