use shaderkey_keying_core::{Engine, KeyEntry, ParamPath, PresetError, Value};
use shaderkey_test_fixtures::MockScene;

const MIX: &str = "nodes[\"Mix\"].inputs[0].default_value";
const EMIT: &str = "nodes[\"Emission\"].inputs[1].default_value";
const TINT: &str = "nodes[\"Tint\"].inputs[0].default_value";

/// Two selected materials: "Glass" with two animated params, "Metal" with
/// one. Time cursor parked at frame 24.
fn two_material_scene() -> MockScene {
    let mut scene = MockScene::new();
    scene.set_time(24.0);
    scene.add_curve("Glass", MIX, 0, 3, Value::Float(0.5));
    scene.add_curve("Glass", EMIT, 0, 2, Value::Float(2.0));
    scene.add_curve("Metal", MIX, 0, 1, Value::Float(0.25));
    scene.select_components(&["Glass", "Metal"]);
    scene
}

fn entry_keys(engine: &Engine, set: &str) -> Vec<(String, String, u32)> {
    engine
        .sets()
        .get(set)
        .expect("set present")
        .entries
        .iter()
        .map(|e| (e.owner.clone(), e.path.full().to_string(), e.index))
        .collect()
}

/// it should rebuild an existing set in place without duplicating entries
#[test]
fn extract_rebuilds_in_place() {
    let scene = two_material_scene();
    let mut engine = Engine::new();

    let first = engine.extract(&scene, "look", None);
    assert_eq!(first, 3);
    let entries = entry_keys(&engine, "look");

    let second = engine.extract(&scene, "look", None);
    assert_eq!(second, 3);
    assert_eq!(engine.sets().len(), 1);
    assert_eq!(entry_keys(&engine, "look"), entries);
}

/// it should deduplicate entries on (owner, path, index) regardless of candidate order
#[test]
fn extract_dedup_is_order_independent() {
    let scene = two_material_scene();

    let mut a = Engine::new();
    let forward: Vec<String> = vec!["Glass".into(), "Metal".into()];
    a.extract(&scene, "look", Some(&forward));

    let mut b = Engine::new();
    let shuffled: Vec<String> = vec!["Metal".into(), "Glass".into(), "Glass".into()];
    b.extract(&scene, "look", Some(&shuffled));

    let mut ka = entry_keys(&a, "look");
    let mut kb = entry_keys(&b, "look");
    ka.sort();
    kb.sort();
    assert_eq!(ka, kb);
    assert_eq!(ka.len(), 3);
}

/// it should keep same-path curves with different indices distinct
#[test]
fn extract_separates_tuple_indices() {
    let mut scene = MockScene::new();
    scene.add_curve("Glass", TINT, 0, 2, Value::color(0.8, 0.4, 0.2, 1.0));
    scene.add_curve("Glass", TINT, 1, 2, Value::color(0.8, 0.4, 0.2, 1.0));
    scene.select_components(&["Glass"]);

    let mut engine = Engine::new();
    assert_eq!(engine.extract(&scene, "tint", None), 2);
}

/// it should fall back to selection slots when nothing is explicitly selected
#[test]
fn extract_falls_back_to_selection_slots() {
    let mut scene = MockScene::new();
    scene.add_curve("Glass", MIX, 0, 3, Value::Float(0.5));
    // Two selected objects both carrying the same material in a slot.
    scene.set_selection_slots(&["Glass", "Glass"]);

    let mut engine = Engine::new();
    assert_eq!(engine.extract(&scene, "look", None), 1);
}

/// it should skip owners with no component, no timeline, and unanimated curves
#[test]
fn extract_skips_unusable_candidates() {
    let mut scene = MockScene::new();
    scene.add_object("Empty");
    scene.add_component_without_timeline("Static");
    scene.add_curve("Quiet", MIX, 0, 0, Value::Float(1.0));

    let candidates: Vec<String> = vec!["Empty".into(), "Static".into(), "Quiet".into()];
    let mut engine = Engine::new();
    assert_eq!(engine.extract(&scene, "look", Some(&candidates)), 0);
    // Zero entries is a valid result, not an error: the set still exists.
    assert!(engine.sets().get("look").unwrap().is_empty());
}

/// it should mark the rebuilt set active
#[test]
fn extract_marks_set_active() {
    let scene = two_material_scene();
    let mut engine = Engine::new();
    engine.extract(&scene, "look", None);
    assert_eq!(engine.sets().active_name(), Some("look"));
    assert_eq!(engine.sets().active().unwrap().len(), 3);
}

/// it should commit one keyframe per entry at a single captured time
#[test]
fn apply_commits_all_entries_at_one_time() {
    let mut scene = two_material_scene();
    let mut engine = Engine::new();
    engine.extract(&scene, "look", None);

    scene.set_time(42.0);
    let committed = engine.apply(&mut scene, "look");
    assert_eq!(committed, 3);
    assert_eq!(scene.committed.len(), 3);
    for key in &scene.committed {
        assert_eq!(key.time, 42.0);
        assert!(key.on_component);
        assert_eq!(key.index, None);
        // Replay strips the container marker before the commit.
        assert!(!key.path.starts_with("component."));
    }
}

/// it should return zero for a missing set and commit nothing
#[test]
fn apply_missing_set_is_a_noop() {
    let mut scene = two_material_scene();
    let mut engine = Engine::new();
    assert_eq!(engine.apply(&mut scene, "missing-set"), 0);
    assert!(scene.committed.is_empty());
}

/// it should key direct entries with and without an index
#[test]
fn apply_direct_entries_index_rules() {
    let mut scene = MockScene::new();
    scene.add_object("Glass");
    scene.set_time(7.0);

    let mut engine = Engine::new();
    let set = engine.sets_mut().clear_or_create("direct");
    set.entries.push(KeyEntry {
        owner: "Glass".into(),
        path: ParamPath::new("hide_render"),
        index: 0,
    });
    set.entries.push(KeyEntry {
        owner: "Glass".into(),
        path: ParamPath::new("scale"),
        index: 2,
    });

    assert_eq!(engine.apply(&mut scene, "direct"), 2);
    let keys = scene.keys_for("Glass");
    assert!(!keys[0].on_component);
    assert_eq!(keys[0].index, None);
    assert_eq!(keys[1].index, Some(2));
    assert_eq!(keys[1].path, "scale");
}

/// it should skip stale owners and keep replaying the rest
#[test]
fn apply_skips_stale_owners() {
    let mut scene = two_material_scene();
    let mut engine = Engine::new();
    engine.extract(&scene, "look", None);

    scene.remove_object("Metal");
    let committed = engine.apply(&mut scene, "look");
    assert_eq!(committed, 2);
    assert!(scene.keys_for("Metal").is_empty());
    assert_eq!(scene.keys_for("Glass").len(), 2);
}

/// it should refuse capture for an unknown set
#[test]
fn capture_requires_an_existing_set() {
    let scene = two_material_scene();
    let mut engine = Engine::new();
    let err = engine
        .save_current_preset(&scene, "nope", "warm")
        .unwrap_err();
    assert!(matches!(err, PresetError::NoSuchSet(name) if name == "nope"));
    assert!(engine.store().is_empty());
}

/// it should refuse an empty preset name without touching the store
#[test]
fn capture_requires_a_preset_name() {
    let scene = two_material_scene();
    let mut engine = Engine::new();
    engine.extract(&scene, "look", None);

    let err = engine.save_current_preset(&scene, "look", "").unwrap_err();
    assert!(matches!(err, PresetError::MissingName));
    assert!(engine.store().is_empty());
    assert_eq!(engine.store().active_index(), -1);
}

/// it should append the preset and move the cursor on capture
#[test]
fn capture_appends_and_selects() {
    let scene = two_material_scene();
    let mut engine = Engine::new();
    engine.extract(&scene, "look", None);

    let name = engine
        .save_current_preset(&scene, "look", "warm")
        .unwrap()
        .name
        .clone();
    assert_eq!(name, "warm");
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.store().active_index(), 0);

    engine.save_current_preset(&scene, "look", "cool").unwrap();
    assert_eq!(engine.store().len(), 2);
    assert_eq!(engine.store().active_index(), 1);
}

/// it should collect one preset per key-set with derived names
#[test]
fn batch_collect_covers_every_set() {
    let mut scene = two_material_scene();
    scene.add_object("Bare");

    let mut engine = Engine::new();
    let bare: Vec<String> = vec!["Bare".into()];
    engine.extract(&scene, "empty", Some(&bare));
    let glass: Vec<String> = vec!["Glass".into()];
    engine.extract(&scene, "pair", Some(&glass));
    let metal: Vec<String> = vec!["Metal".into()];
    engine.extract(&scene, "solo", Some(&metal));

    assert_eq!(engine.batch_collect(&scene), 3);
    assert_eq!(engine.store().len(), 3);
    assert_eq!(engine.store().active_index(), 2);

    let names: Vec<&str> = engine.store().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["empty_preset", "pair_preset", "solo_preset"]);

    // The empty set still produced a (record-less) preset.
    let empty = engine.store().get(0).unwrap();
    assert_eq!(empty.blob, "[]");
}

/// it should persist the registry and store through serde
#[test]
fn engine_state_serde_roundtrip() {
    let scene = two_material_scene();
    let mut engine = Engine::new();
    engine.extract(&scene, "look", None);
    engine.save_current_preset(&scene, "look", "warm").unwrap();

    let json = serde_json::to_string(&engine).unwrap();
    let back: Engine = serde_json::from_str(&json).unwrap();
    assert_eq!(back.sets().active_name(), Some("look"));
    assert_eq!(entry_keys(&back, "look"), entry_keys(&engine, "look"));
    assert_eq!(back.store().active_index(), 0);
    assert_eq!(back.store().get(0).unwrap().name, "warm");
}

/// it should remove presets and re-clamp the active cursor
#[test]
fn remove_preset_reclamps_cursor() {
    let scene = two_material_scene();
    let mut engine = Engine::new();
    engine.extract(&scene, "look", None);
    engine.save_current_preset(&scene, "look", "a").unwrap();
    engine.save_current_preset(&scene, "look", "b").unwrap();

    engine.remove_preset(1);
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.store().active_index(), 0);

    // Out of range: no-op.
    engine.remove_preset(9);
    engine.remove_preset(-1);
    assert_eq!(engine.store().len(), 1);

    engine.remove_preset(0);
    assert_eq!(engine.store().active_index(), -1);
    assert!(engine.store().is_empty());
}
