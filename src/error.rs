//! Unified error type for mutating operations on the registry and graph.
//!
//! These are precondition failures surfaced to the direct caller (the editor).
//! A failed operation leaves the graph untouched; validation findings, by
//! contrast, are returned as data and never raised through this type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("block kind '{0}' is already registered")]
    DuplicateKind(String),

    #[error("unknown block kind '{0}'")]
    UnknownKind(String),

    #[error("block '{0}' already exists in the strategy")]
    DuplicateBlockId(String),

    #[error("unknown block '{0}'")]
    UnknownBlockId(String),

    #[error("unknown connection '{0}'")]
    UnknownConnectionId(String),

    #[error("block '{0}' cannot connect to itself")]
    SelfConnection(String),

    #[error("connection from '{source_id}' to '{target_id}' already exists")]
    DuplicateConnection {
        source_id: String,
        target_id: String,
    },
}
