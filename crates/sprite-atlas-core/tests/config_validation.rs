use sprite_atlas_core::prelude::*;

#[test]
fn defaults_match_the_documented_values() {
    let cfg = PackingConfig::default();
    assert_eq!(cfg.padding, 2);
    assert_eq!(cfg.max_atlas_size, 4096);
    assert!(!cfg.force_square);
    assert!(!cfg.extrude_edges);
    assert_eq!(cfg.heuristic, Heuristic::BestAreaFit);
    assert_eq!(cfg.initial_size, (256, 128));
    assert!(cfg.validate().is_ok());
    assert_eq!(PackingConfig::builder().build(), cfg);
}

#[test]
fn max_size_must_be_a_power_of_two() {
    for bad in [0, 3, 1000, 4095] {
        let cfg = PackingConfig::builder().max_atlas_size(bad).build();
        assert!(matches!(cfg.validate(), Err(AtlasError::InvalidConfig(_))), "{bad}");
    }
    for good in sprite_atlas_core::ATLAS_SIZE_CHOICES {
        assert!(PackingConfig::builder().max_atlas_size(good).build().validate().is_ok());
    }
}

#[test]
fn initial_size_must_be_non_zero() {
    let cfg = PackingConfig::builder().initial_size(0, 128).build();
    assert!(matches!(cfg.validate(), Err(AtlasError::InvalidConfig(_))));
}

#[test]
fn extrude_amount_is_half_the_padding() {
    let on = |p| PackingConfig::builder().padding(p).extrude_edges(true).build().extrude_amount();
    assert_eq!(on(0), 0);
    assert_eq!(on(1), 0);
    assert_eq!(on(4), 2);
    assert_eq!(on(5), 2);
    let off = PackingConfig::builder().padding(4).build();
    assert_eq!(off.extrude_amount(), 0);
}

#[test]
fn partial_json_fills_in_defaults() {
    let cfg: PackingConfig =
        serde_json::from_str(r#"{ "padding": 0, "heuristic": "contactpoint" }"#).expect("parse");
    assert_eq!(cfg.padding, 0);
    assert_eq!(cfg.heuristic, Heuristic::ContactPoint);
    assert_eq!(cfg.max_atlas_size, 4096);
    assert_eq!(cfg.initial_size, (256, 128));
}
