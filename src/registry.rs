//! Block-kind templates and the registry that instantiates them.
//!
//! Block kinds are data, not a type hierarchy: each `BlockTemplate` carries
//! its default config, per-field rules, and a compatibility matrix, and all
//! behavior (which fields render, which connections are legal) is dispatched
//! by lookup against these entries. Adding a kind means adding a registry
//! entry, nothing more.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::error::StrategyError;
use crate::model::{BlockInstance, FieldValue};

/// The value shape a config field takes. Exactly one shape applies per
/// field; the editor picks the input affordance from it (numeric input with
/// min/max, select for choices, free text otherwise).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldShape {
    Number,
    Text,
    Choice(Vec<String>),
}

/// Validation constraints for one config field. Rules are evaluated in
/// priority order: required → min → max → pattern → custom.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub shape: FieldShape,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<Regex>,
    pub custom: Option<fn(&FieldValue) -> bool>,
}

impl FieldRule {
    fn new(shape: FieldShape) -> Self {
        FieldRule {
            shape,
            required: false,
            min: None,
            max: None,
            pattern: None,
            custom: None,
        }
    }

    pub fn number() -> Self {
        FieldRule::new(FieldShape::Number)
    }

    pub fn text() -> Self {
        FieldRule::new(FieldShape::Text)
    }

    /// An enumerated string field. The membership constraint is expressed as
    /// a pattern rule derived from the options, so the choice set is enforced
    /// by the same evaluation path as any other string field.
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let alternation = options
            .iter()
            .map(|o| regex::escape(o))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!("^(?:{})$", alternation))
            .expect("escaped alternation is a valid pattern");
        FieldRule {
            pattern: Some(pattern),
            ..FieldRule::new(FieldShape::Choice(options))
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Template patterns are static tables; an invalid one is a programmer
    /// error, so this panics rather than returning a Result.
    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(Regex::new(pattern).expect("valid field rule pattern"));
        self
    }

    pub fn custom(mut self, predicate: fn(&FieldValue) -> bool) -> Self {
        self.custom = Some(predicate);
        self
    }
}

/// Block-library grouping, mirrored by the editor's sidebar sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockCategory {
    Indicator,
    Condition,
    Action,
}

/// Immutable definition a block instance is created from.
#[derive(Debug, Clone)]
pub struct BlockTemplate {
    pub kind: String,
    pub label: String,
    pub category: BlockCategory,
    pub default_config: BTreeMap<String, FieldValue>,
    pub validation_rules: BTreeMap<String, FieldRule>,
    /// Kinds this block type may connect to.
    pub compatible_target_kinds: BTreeSet<String>,
    /// Kinds that may connect into this block type.
    pub compatible_source_kinds: BTreeSet<String>,
}

/// Catalog of known block kinds, in registration order. Explicitly
/// constructed and passed around; there is no ambient global registry, so
/// tests can build isolated catalogs.
#[derive(Debug, Default)]
pub struct BlockRegistry {
    templates: Vec<BlockTemplate>,
    by_kind: BTreeMap<String, usize>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        BlockRegistry::default()
    }

    pub fn register(&mut self, template: BlockTemplate) -> Result<(), StrategyError> {
        if self.by_kind.contains_key(&template.kind) {
            return Err(StrategyError::DuplicateKind(template.kind));
        }
        self.by_kind
            .insert(template.kind.clone(), self.templates.len());
        self.templates.push(template);
        Ok(())
    }

    pub fn template(&self, kind: &str) -> Option<&BlockTemplate> {
        self.by_kind.get(kind).map(|&i| &self.templates[i])
    }

    /// Instantiate a kind: fresh id, label from the template, config
    /// deep-copied from the defaults. Mutating the instance's config never
    /// touches the template or sibling instances.
    pub fn create(&self, kind: &str) -> Result<BlockInstance, StrategyError> {
        let template = self
            .template(kind)
            .ok_or_else(|| StrategyError::UnknownKind(kind.to_string()))?;
        Ok(BlockInstance {
            id: Uuid::new_v4().to_string(),
            kind: template.kind.clone(),
            label: template.label.clone(),
            config: template.default_config.clone(),
        })
    }

    /// All templates in registration order, for the block-library panel.
    pub fn list_all(&self) -> &[BlockTemplate] {
        &self.templates
    }

    /// The built-in catalog the editor ships with: indicators feed
    /// conditions, conditions feed actions, actions are sinks.
    pub fn builtin() -> Self {
        let conditions = ["threshold-condition", "crossover-condition"];
        let actions = ["buy-action", "sell-action", "stop-loss"];

        let mut registry = BlockRegistry::new();
        let mut register = |t: BlockTemplate| {
            registry.register(t).expect("builtin kinds are distinct");
        };

        register(BlockTemplate {
            kind: "price-feed".into(),
            label: "Price Feed".into(),
            category: BlockCategory::Indicator,
            default_config: config([
                ("symbol", FieldValue::from("BTC/USDT")),
                ("interval", FieldValue::from(60.0)),
            ]),
            validation_rules: rules([
                (
                    "symbol",
                    FieldRule::text()
                        .required()
                        .pattern(r"^[A-Z0-9]+/[A-Z0-9]+$"),
                ),
                ("interval", FieldRule::number().required().min(1.0).max(86400.0)),
            ]),
            compatible_target_kinds: kinds(conditions),
            compatible_source_kinds: kinds([]),
        });

        register(BlockTemplate {
            kind: "moving-average".into(),
            label: "Moving Average".into(),
            category: BlockCategory::Indicator,
            default_config: config([
                ("period", FieldValue::from(14.0)),
                ("source", FieldValue::from("close")),
            ]),
            validation_rules: rules([
                ("period", FieldRule::number().required().min(1.0).max(500.0)),
                (
                    "source",
                    FieldRule::choice(["open", "high", "low", "close"]).required(),
                ),
            ]),
            compatible_target_kinds: kinds(conditions),
            compatible_source_kinds: kinds(["price-feed"]),
        });

        register(BlockTemplate {
            kind: "threshold-condition".into(),
            label: "Threshold Condition".into(),
            category: BlockCategory::Condition,
            default_config: config([
                ("threshold", FieldValue::from(100.0)),
                ("condition", FieldValue::from("above")),
            ]),
            validation_rules: rules([
                ("threshold", FieldRule::number().required().min(0.0)),
                (
                    "condition",
                    FieldRule::choice(["above", "below", "equals"]).required(),
                ),
            ]),
            compatible_target_kinds: kinds(actions),
            compatible_source_kinds: kinds(["price-feed", "moving-average"]),
        });

        register(BlockTemplate {
            kind: "crossover-condition".into(),
            label: "Crossover Condition".into(),
            category: BlockCategory::Condition,
            default_config: config([("direction", FieldValue::from("golden"))]),
            validation_rules: rules([(
                "direction",
                FieldRule::choice(["golden", "death"]).required(),
            )]),
            compatible_target_kinds: kinds(actions),
            compatible_source_kinds: kinds(["price-feed", "moving-average"]),
        });

        register(BlockTemplate {
            kind: "buy-action".into(),
            label: "Buy".into(),
            category: BlockCategory::Action,
            default_config: config([("amount", FieldValue::from(0.01))]),
            validation_rules: rules([(
                "amount",
                FieldRule::number()
                    .required()
                    .min(0.000001)
                    .custom(|v| v.as_number().is_some_and(f64::is_finite)),
            )]),
            compatible_target_kinds: kinds([]),
            compatible_source_kinds: kinds(conditions),
        });

        register(BlockTemplate {
            kind: "sell-action".into(),
            label: "Sell".into(),
            category: BlockCategory::Action,
            default_config: config([("amount", FieldValue::from(0.01))]),
            validation_rules: rules([(
                "amount",
                FieldRule::number()
                    .required()
                    .min(0.000001)
                    .custom(|v| v.as_number().is_some_and(f64::is_finite)),
            )]),
            compatible_target_kinds: kinds([]),
            compatible_source_kinds: kinds(conditions),
        });

        register(BlockTemplate {
            kind: "stop-loss".into(),
            label: "Stop Loss".into(),
            category: BlockCategory::Action,
            default_config: config([("percent", FieldValue::from(5.0))]),
            validation_rules: rules([(
                "percent",
                FieldRule::number().required().min(0.1).max(100.0),
            )]),
            compatible_target_kinds: kinds([]),
            compatible_source_kinds: kinds(conditions),
        });

        registry
    }
}

fn config<const N: usize>(entries: [(&str, FieldValue); N]) -> BTreeMap<String, FieldValue> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn rules<const N: usize>(entries: [(&str, FieldRule); N]) -> BTreeMap<String, FieldRule> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn kinds<'a>(names: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    names.into_iter().map(str::to_string).collect()
}
