use wireflow::catalog::{Catalog, NodeCategory, NodeDefinition, PinSpec, VisualHint};
use wireflow::pins::PinType;

fn pin(id: &str, pin_type: PinType, required: bool) -> PinSpec {
    PinSpec {
        id: id.to_string(),
        label: id.to_string(),
        pin_type,
        required,
        description: String::new(),
    }
}

fn definition(node_type: &str, provider: Option<&str>, inputs: Vec<PinSpec>, outputs: Vec<PinSpec>) -> NodeDefinition {
    NodeDefinition {
        node_type: node_type.to_string(),
        display_name: node_type.to_string(),
        description: String::new(),
        category: NodeCategory::Query,
        provider: provider.map(|p| p.to_string()),
        inputs,
        outputs,
        config_fields: vec![],
        visual: VisualHint::default(),
    }
}

#[test]
fn test_publish_get_round_trip() {
    let catalog = Catalog::new();
    let def = definition(
        "acme_get_user",
        Some("acme"),
        vec![pin("user_id", PinType::String, true)],
        vec![pin("user", PinType::Object, false)],
    );

    catalog.publish(vec![def.clone()]).expect("publish failed");

    let retrieved = catalog.get("acme_get_user").expect("definition not found");
    assert_eq!(*retrieved, def);
    assert!(catalog.get("acme_missing").is_none());
}

#[test]
fn test_republish_replaces_pin_lists() {
    let catalog = Catalog::new();
    catalog
        .publish(vec![definition(
            "acme_op",
            Some("acme"),
            vec![pin("a", PinType::String, true), pin("b", PinType::Number, false)],
            vec![],
        )])
        .expect("publish failed");

    // Second publish with the same id: pin lists replaced, never merged
    catalog
        .publish(vec![definition(
            "acme_op",
            Some("acme"),
            vec![pin("c", PinType::Boolean, false)],
            vec![pin("out", PinType::Any, false)],
        )])
        .expect("publish failed");

    let def = catalog.get("acme_op").expect("definition not found");
    assert_eq!(def.inputs.len(), 1);
    assert_eq!(def.inputs[0].id, "c");
    assert_eq!(def.outputs.len(), 1);
    assert_eq!(catalog.len(), 1);
}

#[test]
fn test_publish_provider_replaces_whole_set() {
    let catalog = Catalog::new();
    catalog
        .publish_provider("acme", vec![
            definition("acme_a", Some("acme"), vec![], vec![]),
            definition("acme_b", Some("acme"), vec![], vec![]),
            definition("acme_c", Some("acme"), vec![], vec![]),
        ])
        .expect("publish failed");
    // Another provider must be untouched by acme regenerations
    catalog
        .publish_provider("globex", vec![definition("globex_a", Some("globex"), vec![], vec![])])
        .expect("publish failed");

    catalog
        .publish_provider("acme", vec![
            definition("acme_a", Some("acme"), vec![], vec![]),
            definition("acme_d", Some("acme"), vec![], vec![]),
        ])
        .expect("publish failed");

    // 2 for acme (not 5), plus 1 for globex
    assert_eq!(catalog.len(), 3);
    assert!(catalog.get("acme_a").is_some());
    assert!(catalog.get("acme_d").is_some());
    assert!(catalog.get("acme_b").is_none());
    assert!(catalog.get("acme_c").is_none());
    assert!(catalog.get("globex_a").is_some());
}

#[test]
fn test_invalid_definition_publishes_nothing() {
    let catalog = Catalog::new();
    let valid = definition("ok_node", None, vec![], vec![]);
    let duplicate_pins = definition(
        "bad_node",
        None,
        vec![pin("x", PinType::String, false), pin("x", PinType::Number, false)],
        vec![],
    );

    let result = catalog.publish(vec![valid, duplicate_pins]);
    assert!(result.is_err());
    // Validation happens before the write: the whole batch is rejected
    assert!(catalog.is_empty());
}

#[test]
fn test_required_output_pin_is_rejected() {
    let catalog = Catalog::new();
    let bad = definition("bad_out", None, vec![], vec![pin("out", PinType::String, true)]);
    assert!(catalog.publish(vec![bad]).is_err());
}

#[test]
fn test_list_by_provider_groups_builtins_first() {
    let catalog = Catalog::new();
    catalog
        .publish(vec![
            definition("zeta_op", Some("zeta"), vec![], vec![]),
            definition("builtin_op", None, vec![], vec![]),
            definition("acme_op", Some("acme"), vec![], vec![]),
        ])
        .expect("publish failed");

    let groups: Vec<_> = catalog.list_by_provider().into_keys().collect();
    assert_eq!(groups, vec![
        None,
        Some("acme".to_string()),
        Some("zeta".to_string()),
    ]);
}
