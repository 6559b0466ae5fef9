use super::*;
use crate::recipes::RingPreset;

#[test]
fn test_builtin_registry_lists_in_order() {
    let registry = Registry::builtin().unwrap();
    let ids: Vec<&str> = registry.ids().collect();
    assert_eq!(
        ids,
        vec![
            "vent-ring",
            "vent-ring-snug",
            "hexagon",
            "hexagon-equiangular",
            "dupont-strap",
            "christmas-ornament",
            "gridfinity-test",
            "gridfinity-screwdriver",
            "gridfinity-screwdriver-dual",
            "gridfinity-shaver-box",
        ]
    );
    let listed: Vec<String> = registry.list().into_iter().map(|s| s.id).collect();
    assert_eq!(listed, ids);
}

#[test]
fn test_every_builtin_model_validates() {
    let registry = Registry::builtin().unwrap();
    for id in registry.ids() {
        let model = registry.recipe(id).unwrap();
        assert!(model.validate().is_ok(), "{} failed validation", id);
    }
}

#[test]
fn test_unknown_id() {
    let registry = Registry::builtin().unwrap();
    assert!(registry.get("no-such-model").is_none());
    assert_eq!(
        registry.recipe("no-such-model").unwrap_err(),
        BuildError::UnknownModelId("no-such-model".into())
    );
}

#[test]
fn test_duplicate_id_is_rejected() {
    let mut registry = Registry::new();
    let ring = Model::Ring(RingPreset::VentRing.params());
    registry.register(ModelDescriptor::new("ring", "Ring", "", ring.clone())).unwrap();
    let err = registry.register(ModelDescriptor::new("ring", "Other", "", ring)).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateModelId("ring".into()));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("ring").unwrap().name, "Ring");
}

#[test]
fn test_summary_lists_parameters() {
    let registry = Registry::builtin().unwrap();
    let summary = registry.get("vent-ring").unwrap().summary();
    assert_eq!(summary.family, "ring");
    assert_eq!(summary.parameters.number("outer_diameter"), Some(48.2));
    assert_eq!(summary.parameters.number("inner_diameter"), Some(46.4));

    let strap = registry.get("dupont-strap").unwrap().summary();
    assert_eq!(strap.parameters.number("pin_count"), Some(7.0));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["id"], "vent-ring");
    assert_eq!(json["parameters"]["height"], 5.0);
}
