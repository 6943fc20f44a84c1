//! Identifier of a stored video file.
//!
//! An [`OutputId`] names exactly one file in the storage directory. Because
//! identifiers arrive from URL paths they are validated before they are ever
//! joined onto a filesystem path.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::paths::VIDEO_EXTENSION;
use crate::Error;

/// Longest identifier accepted from a client.
pub const MAX_ID_LEN: usize = 128;

/// Unique identifier for an acquired video file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputId(String);

impl OutputId {
    /// Generate a new unique output ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("video_{}", Uuid::new_v4().simple()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the video backing this identifier.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, VIDEO_EXTENSION)
    }
}

fn is_valid_id(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_ID_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl FromStr for OutputId {
    type Err = Error;

    /// Parse an identifier, accepting an optional trailing `.mp4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = format!(".{}", VIDEO_EXTENSION);
        let bare = s.strip_suffix(suffix.as_str()).unwrap_or(s);
        if is_valid_id(bare) {
            Ok(Self(bare.to_string()))
        } else {
            Err(Error::invalid_input(format!("invalid video id: {s:?}")))
        }
    }
}

impl TryFrom<String> for OutputId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputId> for String {
    fn from(id: OutputId) -> Self {
        id.0
    }
}

impl std::fmt::Display for OutputId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
