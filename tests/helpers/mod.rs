#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use botgraph::model::{BlockInstance, Connection, FieldValue, StrategyGraph};
use botgraph::registry::{BlockCategory, BlockRegistry, BlockTemplate, FieldRule};

fn kinds<'a>(names: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    names.into_iter().map(str::to_string).collect()
}

/// Minimal isolated registry for structural tests:
/// price-feed → threshold-condition → buy-action, plus a `relay` kind that
/// may connect to itself for pure-topology tests.
pub fn test_registry() -> BlockRegistry {
    let mut registry = BlockRegistry::new();

    registry
        .register(BlockTemplate {
            kind: "price-feed".into(),
            label: "Price Feed".into(),
            category: BlockCategory::Indicator,
            default_config: BTreeMap::new(),
            validation_rules: BTreeMap::new(),
            compatible_target_kinds: kinds(["threshold-condition"]),
            compatible_source_kinds: kinds([]),
        })
        .unwrap();

    registry
        .register(BlockTemplate {
            kind: "threshold-condition".into(),
            label: "Threshold Condition".into(),
            category: BlockCategory::Condition,
            default_config: [
                ("threshold".to_string(), FieldValue::from(100.0)),
                ("condition".to_string(), FieldValue::from("above")),
            ]
            .into_iter()
            .collect(),
            validation_rules: [
                (
                    "threshold".to_string(),
                    FieldRule::number().required().min(0.0),
                ),
                (
                    "condition".to_string(),
                    FieldRule::choice(["above", "below", "equals"]).required(),
                ),
            ]
            .into_iter()
            .collect(),
            compatible_target_kinds: kinds(["buy-action"]),
            compatible_source_kinds: kinds(["price-feed"]),
        })
        .unwrap();

    registry
        .register(BlockTemplate {
            kind: "buy-action".into(),
            label: "Buy".into(),
            category: BlockCategory::Action,
            default_config: [("amount".to_string(), FieldValue::from(0.01))]
                .into_iter()
                .collect(),
            validation_rules: [(
                "amount".to_string(),
                FieldRule::number().required().min(0.000001),
            )]
            .into_iter()
            .collect(),
            compatible_target_kinds: kinds([]),
            compatible_source_kinds: kinds(["threshold-condition"]),
        })
        .unwrap();

    registry
        .register(BlockTemplate {
            kind: "relay".into(),
            label: "Relay".into(),
            category: BlockCategory::Indicator,
            default_config: BTreeMap::new(),
            validation_rules: BTreeMap::new(),
            compatible_target_kinds: kinds(["relay"]),
            compatible_source_kinds: kinds(["relay"]),
        })
        .unwrap();

    registry
}

/// A block with a fixed id, its config copied from the registry defaults.
pub fn block(registry: &BlockRegistry, id: &str, kind: &str) -> BlockInstance {
    let mut instance = registry.create(kind).unwrap();
    instance.id = id.to_string();
    instance
}

/// A strategy of `relay` blocks with the given ids and raw connections,
/// bypassing the mutators the way a deserialized graph would.
pub fn relay_strategy(ids: &[&str], edges: &[(&str, &str)]) -> StrategyGraph {
    let registry = test_registry();
    let mut strategy = StrategyGraph::new("test");
    for id in ids {
        strategy.add_block(block(&registry, id, "relay")).unwrap();
    }
    for (i, (source, target)) in edges.iter().enumerate() {
        strategy.connections.push(Connection {
            id: format!("c{}", i + 1),
            source_id: source.to_string(),
            target_id: target.to_string(),
        });
    }
    strategy
}
