use std::sync::Arc;

use status_core::env::{FixedRng, Observed};
use status_core::{
    ApplyFlags, ApplyOutcome, ApplyRequest, BaseStats, Capability, ClearReason, EffectKind,
    EffectRegistry, EngineConfig, EntityId, EntityKind, ExitReason, RecordingObserver,
    StandardHost, StatId, StatusEngine, Tick,
};

type Engine = StatusEngine<StandardHost, RecordingObserver>;

const HERO: EntityId = EntityId(1);
const FOE: EntityId = EntityId(2);

fn engine_with(config: EngineConfig, roll: u32) -> Engine {
    StatusEngine::with_parts(
        Arc::new(EffectRegistry::builtin()),
        config,
        StandardHost::new(),
        RecordingObserver::new(),
    )
    .with_rng(FixedRng(roll))
}

/// Engine whose rolls always succeed, with HERO and FOE at default stats.
fn engine() -> Engine {
    let mut engine = engine_with(EngineConfig::default(), 0);
    engine
        .spawn(HERO, EntityKind::Player, BaseStats::default())
        .unwrap();
    engine
        .spawn(FOE, EntityKind::Npc, BaseStats::default())
        .unwrap();
    engine
}

/// Certain request that bypasses every defender reduction.
fn certain(kind: EffectKind) -> ApplyRequest {
    ApplyRequest::new(kind).flags(ApplyFlags::NO_AVOID | ApplyFlags::NO_TICK_DEF)
}

fn assert_count_consistent(engine: &Engine, id: EntityId) {
    let status = engine.entity(id).unwrap().status();
    assert_eq!(status.count(), status.iter().count());
}

#[test]
fn count_matches_occupied_slots_through_a_session() {
    let mut engine = engine();

    for kind in [EffectKind::Stun, EffectKind::Blessing, EffectKind::Poison] {
        engine.apply(HERO, certain(kind).duration(3000).param(0, 2));
        assert_count_consistent(&engine, HERO);
    }
    assert_eq!(engine.entity(HERO).unwrap().status().count(), 3);

    engine.force_exit(HERO, EffectKind::Blessing);
    assert_count_consistent(&engine, HERO);

    engine.advance_to(Tick(3000));
    assert_count_consistent(&engine, HERO);
    assert_eq!(engine.entity(HERO).unwrap().status().count(), 0);
}

#[test]
fn force_exit_on_absent_effect_changes_nothing() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Haste).param(0, 20).duration(5000));
    engine.observer_mut().clear();
    let before = *engine.entity(HERO).unwrap().battle();

    assert!(!engine.force_exit(HERO, EffectKind::Slow));
    assert!(!engine.force_exit(EntityId(99), EffectKind::Slow));

    assert_eq!(*engine.entity(HERO).unwrap().battle(), before);
    assert!(engine.has_effect(HERO, EffectKind::Haste));
    assert!(engine.observer().events.is_empty());
}

#[test]
fn poison_matches_hand_computed_resistance() {
    // defender CON 30, EGO 20, level 50; attacker level 40
    let defender = BaseStats::new(10, 30, 10, 10, 10, 20, 50);
    let attacker = BaseStats {
        level: 40,
        ..BaseStats::default()
    };
    let request = ApplyRequest::new(EffectKind::Poison)
        .source(FOE)
        .param(0, 5)
        .chance(8000)
        .duration(30_000);

    // rate 3500 bp: chance 5200, duration 19500
    // fixed: chance -200 → 5000, duration -2000 → 17500
    let mut lucky = engine_with(EngineConfig::default(), 4_999);
    lucky.spawn(HERO, EntityKind::Player, defender).unwrap();
    lucky.spawn(FOE, EntityKind::Npc, attacker).unwrap();
    assert_eq!(lucky.apply(HERO, request), ApplyOutcome::Started);
    assert_eq!(lucky.remaining(HERO, EffectKind::Poison), Some(Some(17_500)));

    let mut unlucky = engine_with(EngineConfig::default(), 5_000);
    unlucky.spawn(HERO, EntityKind::Player, defender).unwrap();
    unlucky.spawn(FOE, EntityKind::Npc, attacker).unwrap();
    assert_eq!(unlucky.apply(HERO, request), ApplyOutcome::Resisted);
    assert!(!unlucky.has_effect(HERO, EffectKind::Poison));
}

#[test]
fn mutually_exclusive_movement_locks_keep_one() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Rooted).duration(5000));
    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Entangled).duration(5000)),
        ApplyOutcome::Started
    );

    assert!(!engine.has_effect(HERO, EffectKind::Rooted));
    assert!(engine.has_effect(HERO, EffectKind::Entangled));
    let status = engine.entity(HERO).unwrap().status();
    assert_eq!(status.lock_count(Capability::Move), 1);
    assert!(!engine.capability(HERO, Capability::Move));

    let ended = engine
        .observer()
        .effect_changes(HERO)
        .into_iter()
        .find(|change| change.kind == EffectKind::Rooted && !change.active)
        .unwrap();
    assert_eq!(ended.reason, Some(ExitReason::Overridden));
}

#[test]
fn stacking_never_exceeds_cap() {
    let mut engine = engine();
    let mut outcomes = Vec::new();
    for _ in 0..6 {
        outcomes.push(engine.apply(HERO, certain(EffectKind::Rage).param(0, 1).duration(10_000)));
    }

    assert_eq!(outcomes[0], ApplyOutcome::Started);
    assert!(outcomes[1..].iter().all(|o| *o == ApplyOutcome::Stacked));
    assert_eq!(engine.param(HERO, EffectKind::Rage, 0), Some(5));

    let hero = engine.entity(HERO).unwrap();
    // attack 15 + 5 × 3
    assert_eq!(hero.stat(StatId::Attack), 30);
    // critical 10 / 3 + 1 + 5
    assert_eq!(hero.stat(StatId::Critical), 9);
}

#[test]
fn single_application_respects_stack_cap() {
    let mut engine = engine();
    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Rage).param(0, 9).duration(10_000)),
        ApplyOutcome::Started
    );
    assert_eq!(engine.param(HERO, EffectKind::Rage, 0), Some(5));

    let hero = engine.entity(HERO).unwrap();
    assert_eq!(hero.stat(StatId::Attack), 30);
    assert_eq!(hero.stat(StatId::Critical), 9);

    // already at the cap, so another stack changes nothing
    engine.apply(HERO, certain(EffectKind::Rage).param(0, 1).duration(10_000));
    assert_eq!(engine.param(HERO, EffectKind::Rage, 0), Some(5));
}

#[test]
fn damage_over_time_fires_ceil_duration_over_interval() {
    let mut engine = engine();
    let hp_before = engine.entity(HERO).unwrap().pool().hp.current;
    engine.apply(HERO, certain(EffectKind::Poison).param(0, 3).duration(4500));
    // defense 10 × 0.75
    assert_eq!(engine.entity(HERO).unwrap().stat(StatId::Defense), 7);

    assert_eq!(engine.advance_to(Tick(4499)), 4);
    assert!(engine.has_effect(HERO, EffectKind::Poison));

    assert_eq!(engine.advance_to(Tick(4500)), 1);
    assert!(!engine.has_effect(HERO, EffectKind::Poison));

    let hero = engine.entity(HERO).unwrap();
    assert_eq!(hero.pool().hp.current, hp_before - 5 * 3);
    assert_eq!(hero.stat(StatId::Defense), 10);
    assert_eq!(engine.advance_by(10_000), 0);
}

#[test]
fn death_clears_everything_except_survivors() {
    let mut engine = engine();
    for kind in [
        EffectKind::Stun,
        EffectKind::Rooted,
        EffectKind::Mute,
        EffectKind::Poison,
    ] {
        assert!(engine.apply(HERO, certain(kind).duration(4000)).is_applied());
    }
    assert!(!engine.capability(HERO, Capability::Move));

    let applied = engine.apply_delta(HERO, -100_000, 0).unwrap();
    assert!(applied.killed);

    let hero = engine.entity(HERO).unwrap();
    assert_eq!(hero.status().kinds(), vec![EffectKind::Mute]);
    assert_eq!(hero.status().lock_count(Capability::Move), 0);
    assert_eq!(hero.status().lock_count(Capability::Cast), 0);
    assert!(!engine.capability(HERO, Capability::Chat));
    assert_count_consistent(&engine, HERO);

    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Stun).duration(1000)),
        ApplyOutcome::Dead
    );
    assert!(
        engine
            .apply(HERO, certain(EffectKind::DeathPenalty).duration(60_000))
            .is_applied()
    );
}

#[test]
fn periodic_kill_ends_the_effect_and_runs_death() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Poison).param(0, 60).duration(10_000));
    engine.apply(HERO, certain(EffectKind::Blind).duration(20_000));

    // 105 HP, 60 per tick: dead on the second fire
    engine.advance_to(Tick(2000));
    let hero = engine.entity(HERO).unwrap();
    assert_eq!(hero.pool().hp.current, 0);
    assert!(hero.status().is_empty());
}

#[test]
fn decay_keeps_ticking_on_a_corpse() {
    let mut engine = engine();
    engine.apply_delta(HERO, -100_000, 0);
    assert!(
        engine
            .apply(HERO, certain(EffectKind::Decay).duration(3000))
            .is_applied()
    );
    engine.advance_to(Tick(3000));
    assert_eq!(engine.observer().effect_changes(HERO).last().unwrap().params[0], 3);
    assert!(!engine.has_effect(HERO, EffectKind::Decay));
}

#[test]
fn berserk_leaves_exhaustion_behind() {
    let mut engine = engine();
    let hp_max = engine.entity(HERO).unwrap().stat(StatId::HpMax);

    engine.apply(HERO, certain(EffectKind::Berserk).duration(1000));
    assert_eq!(engine.entity(HERO).unwrap().stat(StatId::HpMax), hp_max * 2);

    engine.advance_to(Tick(1000));
    assert!(!engine.has_effect(HERO, EffectKind::Berserk));
    assert!(engine.has_effect(HERO, EffectKind::Exhausted));
    assert_eq!(engine.remaining(HERO, EffectKind::Exhausted), Some(Some(10_000)));

    let hero = engine.entity(HERO).unwrap();
    assert_eq!(hero.stat(StatId::HpMax), hp_max);
    assert!(hero.pool().hp.current <= hero.pool().hp.maximum);

    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Berserk).duration(1000)),
        ApplyOutcome::Blocked(EffectKind::Exhausted)
    );
}

#[test]
fn berserk_cleared_by_death_does_not_exhaust() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Berserk).duration(5000));
    engine.handle_death(HERO);
    assert!(!engine.has_effect(HERO, EffectKind::Berserk));
    assert!(!engine.has_effect(HERO, EffectKind::Exhausted));
}

#[test]
fn depth_guard_skips_compensating_effects() {
    let mut engine = engine_with(EngineConfig::default().with_reentry_depth(1), 0);
    engine
        .spawn(HERO, EntityKind::Player, BaseStats::default())
        .unwrap();

    engine.apply(HERO, certain(EffectKind::Berserk).duration(5000));
    assert!(engine.force_exit(HERO, EffectKind::Berserk));
    assert!(!engine.has_effect(HERO, EffectKind::Exhausted));
}

#[test]
fn partner_links_end_both_sides() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Guarding).param(0, FOE.as_param()));
    engine.apply(FOE, certain(EffectKind::Guarded).param(0, HERO.as_param()));

    assert!(engine.force_exit(FOE, EffectKind::Guarded));
    assert!(!engine.has_effect(HERO, EffectKind::Guarding));
    assert!(!engine.has_effect(FOE, EffectKind::Guarded));

    let hero_end = engine.observer().effect_changes(HERO).pop().unwrap();
    assert_eq!(hero_end.reason, Some(ExitReason::Linked));
}

#[test]
fn conditional_lock_follows_partner_effect() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Performing));
    assert!(!engine.capability(HERO, Capability::Move));

    engine.apply(HERO, certain(EffectKind::Longing));
    assert!(engine.capability(HERO, Capability::Move));

    engine.force_exit(HERO, EffectKind::Performing);
    assert!(!engine.has_effect(HERO, EffectKind::Longing));
    assert!(engine.capability(HERO, Capability::Move));
    assert_eq!(
        engine
            .entity(HERO)
            .unwrap()
            .status()
            .lock_count(Capability::Move),
        0
    );
}

#[test]
fn recompute_twice_is_silent_the_second_time() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Blessing).param(0, 5));
    let first = *engine.entity(HERO).unwrap().battle();

    engine.observer_mut().clear();
    engine.recompute_all(HERO).unwrap();
    engine.recompute_all(HERO).unwrap();

    assert_eq!(*engine.entity(HERO).unwrap().battle(), first);
    assert!(engine.observer().stat_changes(HERO).is_empty());
}

#[test]
fn nested_exits_report_settled_stats_once() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Curse).duration(5000));
    engine.observer_mut().clear();

    // blessing cures the curse and starts in the same call
    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Blessing).param(0, 10)),
        ApplyOutcome::Started
    );

    let changes = engine.observer().stat_changes(HERO);
    for (stat, _) in &changes {
        assert_eq!(changes.iter().filter(|(s, _)| s == stat).count(), 1, "{stat} reported twice");
    }
    assert!(changes.contains(&(StatId::Ego, 10)));
    assert!(changes.contains(&(StatId::Str, 20)));

    // effect notifications precede the stat notifications they caused
    let first_stat = engine
        .observer()
        .events
        .iter()
        .position(|e| matches!(e, Observed::Stat { .. }))
        .unwrap();
    let last_effect = engine
        .observer()
        .events
        .iter()
        .rposition(|e| matches!(e, Observed::Effect { .. }))
        .unwrap();
    assert!(last_effect < first_stat);
}

#[test]
fn reject_unless_higher_and_conflict_override() {
    let mut engine = engine();
    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Slow).param(0, 20).duration(5000)),
        ApplyOutcome::Started
    );
    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Slow).param(0, 20).duration(5000)),
        ApplyOutcome::Rejected
    );
    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Slow).param(0, 30).duration(5000)),
        ApplyOutcome::Refreshed
    );
    // move speed 100 × 0.7
    assert_eq!(engine.entity(HERO).unwrap().stat(StatId::MoveSpeed), 70);

    engine.apply(HERO, certain(EffectKind::Haste).param(0, 10).duration(5000));
    assert!(!engine.has_effect(HERO, EffectKind::Slow));
    // move speed 100 × 1.25
    assert_eq!(engine.entity(HERO).unwrap().stat(StatId::MoveSpeed), 125);
}

#[test]
fn refresh_resets_the_timer() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Rooted).duration(1000));
    engine.advance_to(Tick(800));
    engine.apply(HERO, certain(EffectKind::Rooted).duration(1000));

    // the original timer would have fired at 1000
    engine.advance_to(Tick(1500));
    assert!(engine.has_effect(HERO, EffectKind::Rooted));
    engine.advance_to(Tick(1800));
    assert!(!engine.has_effect(HERO, EffectKind::Rooted));
}

#[test]
fn damage_wakes_sleepers_only() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Sleep).duration(5000));
    engine.apply(HERO, certain(EffectKind::Stun).duration(5000));

    engine.apply_delta(HERO, -1, 0);
    assert!(!engine.has_effect(HERO, EffectKind::Sleep));
    assert!(engine.has_effect(HERO, EffectKind::Stun));

    // healing is not damage
    engine.apply(HERO, certain(EffectKind::Sleep).duration(5000));
    engine.apply_delta(HERO, 1, 0);
    assert!(engine.has_effect(HERO, EffectKind::Sleep));
}

#[test]
fn immunity_and_start_filter_outcomes() {
    let mut engine = engine();
    engine.host_mut().grant_immunity(HERO, EffectKind::Stun);
    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Stun).duration(1000)),
        ApplyOutcome::Immune
    );
    assert_eq!(
        engine.apply(EntityId(77), certain(EffectKind::Stun)),
        ApplyOutcome::NoTarget
    );
    assert_eq!(
        engine.apply(HERO, certain(EffectKind::Stun).chance(0).duration(1000)),
        ApplyOutcome::Resisted
    );
}

#[test]
fn dispel_and_cure_respect_flags() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Blessing).param(0, 3));
    engine.apply(HERO, certain(EffectKind::Berserk).duration(5000));
    engine.apply(HERO, certain(EffectKind::Poison).param(0, 1).duration(5000));
    engine.apply(HERO, certain(EffectKind::Exhausted).duration(5000));

    assert_eq!(engine.clear(HERO, ClearReason::Dispel), 1);
    assert!(!engine.has_effect(HERO, EffectKind::Blessing));
    assert!(engine.has_effect(HERO, EffectKind::Berserk));

    assert_eq!(engine.clear(HERO, ClearReason::Cure), 1);
    assert!(!engine.has_effect(HERO, EffectKind::Poison));
    assert!(engine.has_effect(HERO, EffectKind::Exhausted));
}

#[test]
fn logout_save_and_restore() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Hiding).duration(30_000));
    engine.apply(HERO, certain(EffectKind::Blessing).param(0, 7).duration(60_000));
    engine.apply(HERO, certain(EffectKind::MailQuota).params([20261016, 3, 0, 0]));
    engine.advance_to(Tick(1000));

    let saved = engine.saved_effects(HERO);
    let kinds: Vec<_> = saved.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![EffectKind::Blessing, EffectKind::MailQuota]);
    assert_eq!(saved[0].remaining, Some(59_000));
    assert_eq!(saved[1].remaining, None);

    assert_eq!(engine.clear(HERO, ClearReason::Logout), 1);
    assert!(!engine.has_effect(HERO, EffectKind::Hiding));
    engine.despawn(HERO).unwrap();

    engine
        .spawn(HERO, EntityKind::Player, BaseStats::default())
        .unwrap();
    assert_eq!(engine.restore(HERO, &saved), 2);
    assert_eq!(engine.param(HERO, EffectKind::MailQuota, 1), Some(3));
    assert_eq!(engine.remaining(HERO, EffectKind::Blessing), Some(Some(59_000)));
    assert_eq!(engine.entity(HERO).unwrap().stat(StatId::Str), 17);
}

#[test]
fn stone_hardens_each_tick() {
    let mut engine = engine();
    engine.apply(HERO, certain(EffectKind::Stone).duration(3500));
    engine.advance_to(Tick(3000));
    assert_eq!(engine.param(HERO, EffectKind::Stone, 1), Some(3));
    // defense 10 × (1 - 0.30)
    assert_eq!(engine.entity(HERO).unwrap().stat(StatId::Defense), 7);

    engine.advance_to(Tick(3500));
    assert!(!engine.has_effect(HERO, EffectKind::Stone));
    assert_eq!(engine.entity(HERO).unwrap().stat(StatId::Defense), 10);
}

#[test]
fn level_and_equipment_changes_recompute() {
    let mut engine = engine();
    engine.set_level(HERO, 10).unwrap();
    // accuracy 10 + 10
    assert_eq!(engine.entity(HERO).unwrap().stat(StatId::Accuracy), 20);

    let bonuses = status_core::StatBonuses::new().with(StatId::Str, status_core::Bonus::flat(5));
    engine.set_equipment_bonuses(HERO, bonuses).unwrap();
    assert_eq!(engine.entity(HERO).unwrap().stat(StatId::Str), 15);

    assert!(engine.set_level(EntityId(42), 3).is_err());
}

#[test]
fn unknown_entities_may_do_nothing() {
    let engine = engine();
    assert!(!engine.capability(EntityId(9), Capability::Move));
    assert!(engine.capability(HERO, Capability::Move));
    assert_eq!(engine.param(HERO, EffectKind::Stun, 0), None);
}
