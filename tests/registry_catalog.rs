//! Block template registry: registration, instantiation, catalog order.

mod helpers;

use botgraph::error::StrategyError;
use botgraph::model::FieldValue;
use botgraph::registry::BlockRegistry;
use helpers::test_registry;

#[test]
fn register_rejects_duplicate_kind() {
    let mut registry = test_registry();
    let template = registry.template("relay").unwrap().clone();
    assert_eq!(
        registry.register(template).unwrap_err(),
        StrategyError::DuplicateKind("relay".into())
    );
}

#[test]
fn create_unknown_kind() {
    let registry = test_registry();
    assert_eq!(
        registry.create("teleport").unwrap_err(),
        StrategyError::UnknownKind("teleport".into())
    );
}

#[test]
fn create_mints_fresh_ids() {
    let registry = test_registry();
    let a = registry.create("threshold-condition").unwrap();
    let b = registry.create("threshold-condition").unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(a.kind, "threshold-condition");
    assert_eq!(a.label, "Threshold Condition");
}

#[test]
fn instance_config_is_independent_of_template_and_siblings() {
    let registry = test_registry();
    let mut a = registry.create("threshold-condition").unwrap();
    let b = registry.create("threshold-condition").unwrap();

    a.config
        .insert("threshold".into(), FieldValue::from(-42.0));

    assert_eq!(b.config.get("threshold"), Some(&FieldValue::from(100.0)));
    assert_eq!(
        registry
            .template("threshold-condition")
            .unwrap()
            .default_config
            .get("threshold"),
        Some(&FieldValue::from(100.0))
    );

    // A third instance still starts from the pristine defaults.
    let c = registry.create("threshold-condition").unwrap();
    assert_eq!(c.config.get("threshold"), Some(&FieldValue::from(100.0)));
}

#[test]
fn list_all_preserves_registration_order() {
    let registry = test_registry();
    let kinds: Vec<&str> = registry.list_all().iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(
        kinds,
        ["price-feed", "threshold-condition", "buy-action", "relay"]
    );
}

#[test]
fn builtin_catalog_is_self_consistent() {
    let registry = BlockRegistry::builtin();
    assert!(registry.template("price-feed").is_some());
    assert!(registry.template("threshold-condition").is_some());
    assert!(registry.template("buy-action").is_some());

    // Every kind named in a compatibility set must itself be registered.
    for template in registry.list_all() {
        for kind in template
            .compatible_target_kinds
            .iter()
            .chain(&template.compatible_source_kinds)
        {
            assert!(
                registry.template(kind).is_some(),
                "template '{}' references unregistered kind '{}'",
                template.kind,
                kind
            );
        }
    }
}
