//! Strategy validation: structural rules + per-block config rules, aggregated
//! into one report.
//!
//! `validate_strategy` is a pure query with no side effects; callers decide
//! when to re-run it (after every mutation for live feedback, or once as the
//! execution-engine gate).

pub mod config;
pub mod structural;

pub use config::FieldError;
pub use structural::{GraphError, Severity};

use serde::Serialize;

use crate::model::StrategyGraph;
use crate::registry::BlockRegistry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationError {
    Graph(GraphError),
    Field {
        block_id: String,
        #[serde(flatten)]
        error: FieldError,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Graph(e) => write!(f, "{}", e),
            ValidationError::Field { block_id, error } => {
                write!(f, "{} (block '{}')", error, block_id)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    /// Informational findings (orphan blocks); never affect `is_valid`.
    pub warnings: Vec<ValidationError>,
}

/// Validate a whole strategy: graph errors first, then field errors grouped
/// by block in block-list order. `is_valid` means the execution engine may
/// accept the graph; warnings alone never flip it.
pub fn validate_strategy(registry: &BlockRegistry, strategy: &StrategyGraph) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for finding in structural::validate_structure(registry, strategy) {
        match finding.severity() {
            Severity::Error => errors.push(ValidationError::Graph(finding)),
            Severity::Warning => warnings.push(ValidationError::Graph(finding)),
        }
    }

    for block in &strategy.blocks {
        // Unknown kinds were already reported as a structural finding.
        let Some(template) = registry.template(&block.kind) else {
            continue;
        };
        for error in config::validate_all(template, block) {
            errors.push(ValidationError::Field {
                block_id: block.id.clone(),
                error,
            });
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}
