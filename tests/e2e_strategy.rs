//! End-to-end: registry → graph mutations → aggregated validation report.

use botgraph::model::{Connection, FieldValue, StrategyGraph};
use botgraph::registry::BlockRegistry;
use botgraph::validate::{validate_strategy, ValidationError};

fn threshold_fixture() -> StrategyGraph {
    serde_json::from_str(include_str!("fixtures/threshold_strategy.json")).unwrap()
}

#[test]
fn build_validate_break_revalidate() {
    let registry = BlockRegistry::builtin();
    let mut strategy = StrategyGraph::new("BTC breakout");

    let feed = registry.create("price-feed").unwrap();
    let condition = registry.create("threshold-condition").unwrap();
    let feed_id = feed.id.clone();
    let condition_id = condition.id.clone();

    strategy.add_block(feed).unwrap();
    strategy.add_block(condition).unwrap();
    strategy.add_connection(&feed_id, &condition_id).unwrap();

    let result = validate_strategy(&registry, &strategy);
    assert!(result.is_valid, "fresh strategy should validate: {:?}", result.errors);

    strategy
        .update_block_config(&condition_id, "threshold", FieldValue::from(-5.0))
        .unwrap();

    let result = validate_strategy(&registry, &strategy);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    match &result.errors[0] {
        ValidationError::Field { block_id, error } => {
            assert_eq!(block_id, &condition_id);
            assert_eq!(error.field, "threshold");
            assert_eq!(error.message, "threshold must be greater than 0");
        }
        other => panic!("expected a field error, got {:?}", other),
    }
}

#[test]
fn validation_is_idempotent_on_an_unmutated_graph() {
    let registry = BlockRegistry::builtin();
    let strategy = threshold_fixture();

    let first = validate_strategy(&registry, &strategy);
    let second = validate_strategy(&registry, &strategy);
    assert_eq!(first, second);
    assert!(first.is_valid);
}

#[test]
fn graph_errors_precede_field_errors() {
    let registry = BlockRegistry::builtin();
    let mut strategy = threshold_fixture();
    strategy
        .update_block_config("b2", "threshold", FieldValue::from(-5.0))
        .unwrap();
    strategy.connections.push(Connection {
        id: "c9".into(),
        source_id: "b3".into(),
        target_id: "ghost".into(),
    });

    let result = validate_strategy(&registry, &strategy);
    assert!(!result.is_valid);
    assert!(matches!(result.errors.first(), Some(ValidationError::Graph(_))));
    assert!(matches!(result.errors.last(), Some(ValidationError::Field { .. })));
}

#[test]
fn field_error_report_wording() {
    let registry = BlockRegistry::builtin();
    let mut strategy = threshold_fixture();
    strategy
        .update_block_config("b2", "threshold", FieldValue::from(-5.0))
        .unwrap();

    let result = validate_strategy(&registry, &strategy);
    insta::assert_snapshot!(
        result.errors[0].to_string(),
        @"threshold must be greater than 0 (block 'b2')"
    );
}

#[test]
fn dangling_report_wording() {
    let registry = BlockRegistry::builtin();
    let strategy: StrategyGraph =
        serde_json::from_str(include_str!("fixtures/dangling.json")).unwrap();

    let result = validate_strategy(&registry, &strategy);
    let report = result
        .errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(report, @"connection 'c1' references unknown block 'ghost'");
}
