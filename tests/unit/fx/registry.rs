use serde_json::json;

use super::*;

const BUILTIN: [&str; 8] = [
    "bloom",
    "chromatic_orbit",
    "echo",
    "grain",
    "interference",
    "ripple",
    "vignette",
    "vortex",
];

#[test]
fn builtin_ids_are_sorted_and_complete() {
    let reg = EffectRegistry::builtin();
    assert_eq!(reg.ids().collect::<Vec<_>>(), BUILTIN);
    assert_eq!(reg.descriptors().count(), BUILTIN.len());
    for d in reg.descriptors() {
        assert_eq!(reg.get(d.id()).map(EffectDescriptor::id), Some(d.id()));
    }
}

#[test]
fn every_effect_declares_preserve_alpha_defaulting_true() {
    let reg = EffectRegistry::builtin();
    for d in reg.descriptors() {
        let cfg = d.default_config();
        assert!(cfg.flag("preserve_alpha"), "{}", d.id());
        assert!(!d.metadata().description.is_empty());
        let mut names: Vec<_> = d.metadata().params.iter().map(|p| p.name).collect();
        let n = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), n, "duplicate parameter in {}", d.id());
    }
}

#[test]
fn unknown_ids_are_errors() {
    let reg = EffectRegistry::builtin();
    assert!(reg.get("blur").is_none());
    let err = reg.require("blur").unwrap_err();
    assert!(err.to_string().contains("unknown effect 'blur'"));
    assert!(err.to_string().contains("ripple"));
    assert!(
        reg.instantiate("blur", &serde_json::Value::Null, StaticSettings::default())
            .is_err()
    );
}

#[test]
fn non_object_params_are_rejected() {
    let reg = EffectRegistry::builtin();
    let err = reg
        .instantiate("bloom", &json!([1, 2]), StaticSettings::default())
        .unwrap_err();
    assert!(matches!(err, LoopFxError::Validation(_)));
}

#[test]
fn register_rejects_duplicates() {
    let mut reg = EffectRegistry::empty();
    assert_eq!(reg.ids().count(), 0);
    reg.register(EffectDescriptor::of::<Grain>()).unwrap();
    assert!(reg.register(EffectDescriptor::of::<Grain>()).is_err());
    assert_eq!(reg.ids().collect::<Vec<_>>(), ["grain"]);
}

#[test]
fn descriptor_instantiates_with_normalized_config() {
    let reg = EffectRegistry::builtin();
    let d = reg.require("echo").unwrap();
    let cfg = d
        .config_from_json(&json!({ "echo_count": 99, "blend_mode": "ADD" }))
        .unwrap();
    assert_eq!(cfg.i64("echo_count"), 16);
    assert_eq!(cfg.text("blend_mode"), "add");
    let inst = d.instantiate(cfg.clone(), StaticSettings::sized(4, 4));
    assert_eq!(inst.id(), "echo");
    assert_eq!(inst.config(), &cfg);
}
