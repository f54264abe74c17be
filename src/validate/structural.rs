//! Whole-graph structural and semantic rules.
//!
//! Every check runs — nothing short-circuits — so a caller sees all problems
//! at once. Several checks re-verify what `StrategyGraph`'s mutators already
//! guard, because graphs may be constructed by other means (deserialization).

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::model::{GraphIndex, StrategyGraph};
use crate::registry::BlockRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "rule", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GraphError {
    #[error("connection '{connection_id}' references unknown block '{block_id}'")]
    DanglingReference {
        connection_id: String,
        block_id: String,
    },

    #[error("connection '{connection_id}' connects block '{block_id}' to itself")]
    SelfConnection {
        connection_id: String,
        block_id: String,
    },

    #[error("duplicate connection from '{source_id}' to '{target_id}'")]
    DuplicateConnection {
        source_id: String,
        target_id: String,
    },

    #[error("cycle detected through blocks {block_ids:?}")]
    CycleDetected { block_ids: Vec<String> },

    #[error("'{source_kind}' blocks cannot connect to '{target_kind}' blocks")]
    IncompatibleConnection {
        connection_id: String,
        source_kind: String,
        target_kind: String,
    },

    #[error("block '{block_id}' references unknown kind '{kind}'")]
    UnknownKind { block_id: String, kind: String },

    #[error("block '{block_id}' has config field '{field}' with no validation rule")]
    UnknownField { block_id: String, field: String },

    #[error("block '{block_id}' is not connected to the rest of the strategy")]
    OrphanBlock { block_id: String },
}

impl GraphError {
    /// Orphan blocks are surfaced without gating validity; everything else
    /// blocks the execution engine.
    pub fn severity(&self) -> Severity {
        match self {
            GraphError::OrphanBlock { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn block_id(&self) -> Option<&str> {
        match self {
            GraphError::DanglingReference { block_id, .. }
            | GraphError::SelfConnection { block_id, .. }
            | GraphError::UnknownKind { block_id, .. }
            | GraphError::UnknownField { block_id, .. }
            | GraphError::OrphanBlock { block_id } => Some(block_id),
            _ => None,
        }
    }

    pub fn connection_id(&self) -> Option<&str> {
        match self {
            GraphError::DanglingReference { connection_id, .. }
            | GraphError::SelfConnection { connection_id, .. }
            | GraphError::IncompatibleConnection { connection_id, .. } => Some(connection_id),
            _ => None,
        }
    }
}

/// Run all structural rules. Returns all findings, warnings included.
pub fn validate_structure(registry: &BlockRegistry, strategy: &StrategyGraph) -> Vec<GraphError> {
    let index = GraphIndex::build(strategy);
    let mut errors = Vec::new();

    check_known_kinds(registry, strategy, &mut errors);
    check_dangling_references(strategy, &mut errors);
    check_self_connections(strategy, &mut errors);
    check_duplicate_connections(strategy, &mut errors);
    check_cycles(&index, &mut errors);
    check_kind_compatibility(registry, strategy, &mut errors);
    check_config_fields(registry, strategy, &mut errors);
    check_orphan_blocks(strategy, &mut errors);

    errors
}

fn check_known_kinds(
    registry: &BlockRegistry,
    strategy: &StrategyGraph,
    errors: &mut Vec<GraphError>,
) {
    for block in &strategy.blocks {
        if registry.template(&block.kind).is_none() {
            errors.push(GraphError::UnknownKind {
                block_id: block.id.clone(),
                kind: block.kind.clone(),
            });
        }
    }
}

fn check_dangling_references(strategy: &StrategyGraph, errors: &mut Vec<GraphError>) {
    for conn in &strategy.connections {
        for endpoint in [&conn.source_id, &conn.target_id] {
            if !strategy.contains_block(endpoint) {
                errors.push(GraphError::DanglingReference {
                    connection_id: conn.id.clone(),
                    block_id: endpoint.clone(),
                });
            }
        }
    }
}

fn check_self_connections(strategy: &StrategyGraph, errors: &mut Vec<GraphError>) {
    for conn in &strategy.connections {
        if conn.source_id == conn.target_id {
            errors.push(GraphError::SelfConnection {
                connection_id: conn.id.clone(),
                block_id: conn.source_id.clone(),
            });
        }
    }
}

fn check_duplicate_connections(strategy: &StrategyGraph, errors: &mut Vec<GraphError>) {
    let mut seen = HashSet::new();
    for conn in &strategy.connections {
        let pair = (conn.source_id.as_str(), conn.target_id.as_str());
        if !seen.insert(pair) {
            errors.push(GraphError::DuplicateConnection {
                source_id: conn.source_id.clone(),
                target_id: conn.target_id.clone(),
            });
        }
    }
}

fn check_cycles(index: &GraphIndex, errors: &mut Vec<GraphError>) {
    for block_ids in index.cycles() {
        errors.push(GraphError::CycleDetected { block_ids });
    }
}

/// Compatibility is checked in both directions because it is not symmetric:
/// the target's kind must be among the source's allowed targets AND the
/// source's kind among the target's allowed sources. Connections whose
/// endpoint is missing or of unknown kind were already reported above.
fn check_kind_compatibility(
    registry: &BlockRegistry,
    strategy: &StrategyGraph,
    errors: &mut Vec<GraphError>,
) {
    for conn in &strategy.connections {
        let (Some(source), Some(target)) = (
            strategy.block(&conn.source_id),
            strategy.block(&conn.target_id),
        ) else {
            continue;
        };
        let (Some(source_template), Some(target_template)) = (
            registry.template(&source.kind),
            registry.template(&target.kind),
        ) else {
            continue;
        };

        let forward = source_template.compatible_target_kinds.contains(&target.kind);
        let backward = target_template.compatible_source_kinds.contains(&source.kind);
        if !forward || !backward {
            errors.push(GraphError::IncompatibleConnection {
                connection_id: conn.id.clone(),
                source_kind: source.kind.clone(),
                target_kind: target.kind.clone(),
            });
        }
    }
}

/// Every config key must be covered by the template's rules, so no field can
/// slip past the config validator unchecked.
fn check_config_fields(
    registry: &BlockRegistry,
    strategy: &StrategyGraph,
    errors: &mut Vec<GraphError>,
) {
    for block in &strategy.blocks {
        let Some(template) = registry.template(&block.kind) else {
            continue;
        };
        for field in block.config.keys() {
            if !template.validation_rules.contains_key(field) {
                errors.push(GraphError::UnknownField {
                    block_id: block.id.clone(),
                    field: field.clone(),
                });
            }
        }
    }
}

/// Counts connections from the raw list, not the index: a block whose only
/// connection has a dangling far endpoint is already reported as a dangling
/// reference and must not be flagged as an orphan on top of that.
fn check_orphan_blocks(strategy: &StrategyGraph, errors: &mut Vec<GraphError>) {
    if strategy.blocks.len() < 2 {
        return;
    }
    for block in &strategy.blocks {
        let connected = strategy
            .connections
            .iter()
            .any(|c| c.source_id == block.id || c.target_id == block.id);
        if !connected {
            errors.push(GraphError::OrphanBlock {
                block_id: block.id.clone(),
            });
        }
    }
}
