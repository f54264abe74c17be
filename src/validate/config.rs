//! Per-field configuration validation.
//!
//! Rules short-circuit in user-facing priority order: presence before range
//! before format before custom semantics. `validate_all` does not
//! short-circuit across fields, so the editor can show every problem at once.

use serde::Serialize;

use crate::model::{BlockInstance, FieldValue};
use crate::registry::BlockTemplate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Validate one field value against the template's rule for it. A field with
/// no declared rule is unconditionally valid — unknown config keys are a
/// graph-level finding, not a field error. `None` models a value the editor
/// has not supplied at all.
pub fn validate_field(
    template: &BlockTemplate,
    field: &str,
    value: Option<&FieldValue>,
) -> Option<FieldError> {
    let rule = template.validation_rules.get(field)?;

    let missing = match value {
        None => true,
        Some(v) => v.is_empty_text(),
    };
    if rule.required && missing {
        return Some(FieldError::new(field, format!("{} is required", field)));
    }
    let value = value?;

    if let (Some(min), Some(n)) = (rule.min, value.as_number()) {
        if n < min {
            return Some(FieldError::new(
                field,
                format!("{} must be greater than {}", field, min),
            ));
        }
    }
    if let (Some(max), Some(n)) = (rule.max, value.as_number()) {
        if n > max {
            return Some(FieldError::new(
                field,
                format!("{} must be less than {}", field, max),
            ));
        }
    }
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(&value.to_string()) {
            return Some(FieldError::new(
                field,
                format!("{} has invalid format", field),
            ));
        }
    }
    if let Some(custom) = rule.custom {
        if !custom(value) {
            return Some(FieldError::new(field, format!("{} is invalid", field)));
        }
    }

    None
}

/// Validate every config field on an instance, in config-map order.
pub fn validate_all(template: &BlockTemplate, instance: &BlockInstance) -> Vec<FieldError> {
    instance
        .config
        .iter()
        .filter_map(|(field, value)| validate_field(template, field, Some(value)))
        .collect()
}
