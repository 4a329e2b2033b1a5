use std::path::{Path, PathBuf};

use status_content::{
    ConfigLoader, ContentFactory, EffectLoader, EntityLoader, ScenarioLoader, Step,
};
use status_core::{
    ApplyFlags, Bonus, EffectFlags, EffectKind, EffectRegistry, EntityKind, StatId,
    effect::{StackPolicy, TickAction},
};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn shipped_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn missing_file_reports_path() {
    let err = ConfigLoader::load(Path::new("/nonexistent/config.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/config.toml"));
}

#[test]
fn effect_override_replaces_one_record() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "effects.ron",
        r#"(
            effects: [
                (
                    kind: Poison,
                    flags: "DEBUFF | NO_DISPEL",
                    periodic: Some((interval: 500, action: Drain(hp: Fixed(2), sp: Fixed(0)))),
                ),
            ],
        )"#,
    );

    let registry = EffectLoader::load_registry(&path).unwrap();
    let poison = registry.get(EffectKind::Poison);
    assert_eq!(poison.flags, EffectFlags::DEBUFF | EffectFlags::NO_DISPEL);
    assert_eq!(poison.periodic.map(|p| p.interval), Some(500));
    assert!(poison.contributions.is_empty());

    let builtin = EffectRegistry::builtin();
    assert_eq!(registry.get(EffectKind::Stun), builtin.get(EffectKind::Stun));
}

#[test]
fn invalid_override_is_rejected() {
    let dir = TempDir::new().unwrap();
    let self_conflict = write(
        &dir,
        "conflict.ron",
        "(effects: [(kind: Haste, conflicts: [Haste])])",
    );
    assert!(EffectLoader::load_registry(&self_conflict).is_err());

    let twice = write(
        &dir,
        "twice.ron",
        "(effects: [(kind: Haste), (kind: Haste)])",
    );
    assert!(EffectLoader::load_registry(&twice).is_err());

    let stat_magnitude = write(
        &dir,
        "stat.ron",
        "(effects: [(kind: Shield, contributions: [(stat: Defense, op: Flat, magnitude: Stat(stat: Con, percent: 10))])])",
    );
    assert!(EffectLoader::load_registry(&stat_magnitude).is_err());
}

#[test]
fn entity_catalog_rejects_duplicate_names() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "entities.ron",
        r#"(entities: [(name: "a"), (name: "a", kind: Npc)])"#,
    );
    let err = EntityLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("'a'"));
}

#[test]
fn scenario_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "scenarios/short.ron",
        r#"(
            name: "short",
            spawns: [(id: 4, template: "ghoul")],
            steps: [
                Apply(target: 4, kind: Stun, flags: "NO_AVOID"),
                Advance(ticks: 100),
            ],
        )"#,
    );

    let scenario = ScenarioLoader::load(&path).unwrap();
    assert_eq!(scenario.seed, None);
    let request = scenario.steps[0].request().unwrap();
    assert_eq!(request.chance, 10_000);
    assert_eq!(request.duration, None);
    assert_eq!(request.flags, ApplyFlags::NO_AVOID);
    assert_eq!(scenario.steps[1], Step::Advance { ticks: 100 });
}

#[test]
fn scenario_with_duplicate_spawn_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "dup.ron",
        r#"(name: "dup", spawns: [(id: 1, template: "a"), (id: 1, template: "b")], steps: [])"#,
    );
    assert!(ScenarioLoader::load(&path).is_err());
}

#[test]
fn factory_without_overrides_uses_builtin_table() {
    let dir = TempDir::new().unwrap();
    let factory = ContentFactory::new(dir.path());
    assert_eq!(
        factory.load_registry().unwrap().get(EffectKind::Poison),
        EffectRegistry::builtin().get(EffectKind::Poison)
    );
    assert!(factory.load_config().is_err());
}

#[test]
fn shipped_data_loads() {
    let factory = ContentFactory::new(shipped_data());

    let config = factory.load_config().unwrap();
    assert_eq!(config.game_seed, 20261016);

    let registry = factory.load_registry().unwrap();
    assert_eq!(
        registry.get(EffectKind::Bleeding).periodic.map(|p| p.interval),
        Some(1500)
    );
    assert!(matches!(
        registry.get(EffectKind::Bleeding).periodic.map(|p| p.action),
        Some(TickAction::Drain { .. })
    ));
    assert_eq!(
        registry.get(EffectKind::Shield).stacking,
        StackPolicy::RejectUnlessHigher { param: 0 }
    );

    let templates = factory.load_entities().unwrap();
    let knight = templates.get("knight").unwrap();
    assert_eq!(knight.kind, EntityKind::Player);
    assert_eq!(
        knight.equipment.for_stat(StatId::Defense).collect::<Vec<_>>(),
        vec![Bonus::Flat(12)]
    );
    assert!(templates.get("ghoul").unwrap().equipment.is_empty());

    let names = factory.scenario_names().unwrap();
    assert!(names.contains(&"poison_duel".to_string()));
    for name in names {
        let scenario = factory.load_scenario(&name).unwrap();
        for spawn in &scenario.spawns {
            assert!(
                templates.get(&spawn.template).is_some(),
                "{name}: unknown template {}",
                spawn.template
            );
        }
    }
}
