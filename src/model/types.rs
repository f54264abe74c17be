//! Rust types mirroring the editor's strategy JSON.
//!
//! `StrategyGraph` is the aggregate root: it exclusively owns its blocks and
//! connections, and every mutation either fully applies or leaves the graph
//! untouched. Mutations do NOT run semantic validation (acyclicity, kind
//! compatibility) — the editor may pass through temporarily-invalid states
//! while dragging; `validate::validate_strategy` is the explicit query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StrategyError;

/// A single configuration value. Untagged so the frontend JSON stays plain
/// (`{"threshold": 100, "condition": "above"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Flag(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

/// A configured block placed on the canvas. Created from a `BlockTemplate`
/// via `BlockRegistry::create`; the config map is the instance's own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInstance {
    pub id: String,
    pub kind: String,
    pub label: String,
    pub config: BTreeMap<String, FieldValue>,
}

/// A directed edge between two blocks: data flows source → target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
}

/// Canvas coordinates for one block. Purely presentational: owned by the
/// editor layer, keyed by block id, and invisible to validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPosition {
    pub block_id: String,
    pub x: f64,
    pub y: f64,
}

/// The full structural model of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyGraph {
    pub id: String,
    pub name: String,
    pub blocks: Vec<BlockInstance>,
    pub connections: Vec<Connection>,
}

impl StrategyGraph {
    pub fn new(name: impl Into<String>) -> Self {
        StrategyGraph {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            blocks: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn contains_block(&self, id: &str) -> bool {
        self.blocks.iter().any(|b| b.id == id)
    }

    pub fn block(&self, id: &str) -> Option<&BlockInstance> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Append a block. Fails if a block with the same id is already present.
    pub fn add_block(&mut self, instance: BlockInstance) -> Result<(), StrategyError> {
        if self.contains_block(&instance.id) {
            return Err(StrategyError::DuplicateBlockId(instance.id));
        }
        self.blocks.push(instance);
        Ok(())
    }

    /// Remove a block and every connection touching it, in one step.
    /// Returns the removed block.
    pub fn remove_block(&mut self, id: &str) -> Result<BlockInstance, StrategyError> {
        let pos = self
            .blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StrategyError::UnknownBlockId(id.to_string()))?;
        let removed = self.blocks.remove(pos);
        self.connections
            .retain(|c| c.source_id != id && c.target_id != id);
        Ok(removed)
    }

    /// Connect source → target with a fresh connection id, returned on
    /// success. Both endpoints must exist, the pair must be new, and
    /// self-loops are rejected. Acyclicity and kind compatibility are NOT
    /// checked here.
    pub fn add_connection(
        &mut self,
        source_id: &str,
        target_id: &str,
    ) -> Result<String, StrategyError> {
        if !self.contains_block(source_id) {
            return Err(StrategyError::UnknownBlockId(source_id.to_string()));
        }
        if !self.contains_block(target_id) {
            return Err(StrategyError::UnknownBlockId(target_id.to_string()));
        }
        if source_id == target_id {
            return Err(StrategyError::SelfConnection(source_id.to_string()));
        }
        if self
            .connections
            .iter()
            .any(|c| c.source_id == source_id && c.target_id == target_id)
        {
            return Err(StrategyError::DuplicateConnection {
                source_id: source_id.to_string(),
                target_id: target_id.to_string(),
            });
        }

        let id = Uuid::new_v4().to_string();
        self.connections.push(Connection {
            id: id.clone(),
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        });
        Ok(id)
    }

    pub fn remove_connection(&mut self, id: &str) -> Result<Connection, StrategyError> {
        let pos = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StrategyError::UnknownConnectionId(id.to_string()))?;
        Ok(self.connections.remove(pos))
    }

    /// Replace a single config field on a block. No validation happens here;
    /// the editor re-runs `validate_strategy` when it wants fresh errors.
    pub fn update_block_config(
        &mut self,
        block_id: &str,
        field: &str,
        value: FieldValue,
    ) -> Result<(), StrategyError> {
        let block = self
            .blocks
            .iter_mut()
            .find(|b| b.id == block_id)
            .ok_or_else(|| StrategyError::UnknownBlockId(block_id.to_string()))?;
        block.config.insert(field.to_string(), value);
        Ok(())
    }
}
