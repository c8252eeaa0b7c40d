//! Build errors for graph and transition builders.

use crate::graph::GraphIntegrityError;
use thiserror::Error;

/// Errors that can occur when building graphs and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Transition target not specified. Call .to(node) or .terminal()")]
    MissingTarget,

    #[error(transparent)]
    Integrity(#[from] GraphIntegrityError),
}
