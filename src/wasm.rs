//! WASM entry points for the browser editor.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::model::StrategyGraph;
use crate::registry::{BlockRegistry, BlockTemplate, FieldShape};
use crate::validate::{self, ValidationError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueDto {
    severity: String,
    block_id: Option<String>,
    connection_id: Option<String>,
    field: Option<String>,
    message: String,
}

impl IssueDto {
    fn from_error(error: &ValidationError, severity: &str) -> Self {
        match error {
            ValidationError::Graph(e) => IssueDto {
                severity: severity.into(),
                block_id: e.block_id().map(str::to_string),
                connection_id: e.connection_id().map(str::to_string),
                field: None,
                message: e.to_string(),
            },
            ValidationError::Field { block_id, error } => IssueDto {
                severity: severity.into(),
                block_id: Some(block_id.clone()),
                connection_id: None,
                field: Some(error.field.clone()),
                message: error.message.clone(),
            },
        }
    }
}

/// Validate a strategy JSON against the built-in block catalog.
/// Returns a JSON array of issue objects for the editor's error panel.
#[wasm_bindgen]
pub fn validate_strategy_json(json: &str) -> JsValue {
    let issues = validate_inner(json);
    serde_wasm_bindgen::to_value(&issues).unwrap_or(JsValue::NULL)
}

fn validate_inner(json: &str) -> Vec<IssueDto> {
    let strategy = match serde_json::from_str::<StrategyGraph>(json) {
        Ok(s) => s,
        Err(e) => {
            return vec![IssueDto {
                severity: "error".into(),
                block_id: None,
                connection_id: None,
                field: None,
                message: format!("Failed to parse strategy JSON: {}", e),
            }];
        }
    };

    let registry = BlockRegistry::builtin();
    let result = validate::validate_strategy(&registry, &strategy);

    let mut issues: Vec<IssueDto> = result
        .errors
        .iter()
        .map(|e| IssueDto::from_error(e, "error"))
        .collect();
    issues.extend(
        result
            .warnings
            .iter()
            .map(|w| IssueDto::from_error(w, "warning")),
    );
    issues
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldRuleDto {
    name: String,
    shape: String,
    choices: Option<Vec<String>>,
    required: bool,
    min: Option<f64>,
    max: Option<f64>,
    pattern: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateDto {
    kind: String,
    label: String,
    category: String,
    default_config: std::collections::BTreeMap<String, crate::model::FieldValue>,
    fields: Vec<FieldRuleDto>,
}

impl From<&BlockTemplate> for TemplateDto {
    fn from(t: &BlockTemplate) -> Self {
        let fields = t
            .validation_rules
            .iter()
            .map(|(name, rule)| {
                let (shape, choices) = match &rule.shape {
                    FieldShape::Number => ("number", None),
                    FieldShape::Text => ("text", None),
                    FieldShape::Choice(options) => ("choice", Some(options.clone())),
                };
                FieldRuleDto {
                    name: name.clone(),
                    shape: shape.into(),
                    choices,
                    required: rule.required,
                    min: rule.min,
                    max: rule.max,
                    pattern: rule.pattern.as_ref().map(|p| p.as_str().to_string()),
                }
            })
            .collect();
        TemplateDto {
            kind: t.kind.clone(),
            label: t.label.clone(),
            category: format!("{:?}", t.category).to_lowercase(),
            default_config: t.default_config.clone(),
            fields,
        }
    }
}

/// The built-in block catalog for the library panel: kind, label, category,
/// default config, and a renderer-facing digest of each field rule.
#[wasm_bindgen]
pub fn list_block_templates() -> JsValue {
    let registry = BlockRegistry::builtin();
    let templates: Vec<TemplateDto> = registry.list_all().iter().map(TemplateDto::from).collect();
    serde_wasm_bindgen::to_value(&templates).unwrap_or(JsValue::NULL)
}
