//! Asset error types.

use crate::graph::{GraphIntegrityError, NodeId};
use std::fmt;
use thiserror::Error;

/// Which registry table a key was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Behavior,
    Condition,
    Handler,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyKind::Behavior => "behaviour",
            KeyKind::Condition => "condition",
            KeyKind::Handler => "handler",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while encoding, decoding, or resolving assets
#[derive(Debug, Error)]
pub enum AssetError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Asset version is not supported by this version
    #[error("Unsupported asset version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A node refers to a key the registry does not know
    #[error("Unknown {kind} key '{key}' referenced by {node}")]
    UnknownKey {
        kind: KeyKind,
        key: String,
        node: NodeId,
    },

    /// The resolved graph failed validation
    #[error(transparent)]
    Integrity(#[from] GraphIntegrityError),
}
