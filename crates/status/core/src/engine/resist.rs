//! Two-stage resistance: rate reduction, then fixed reduction, then the
//! per-effect duration clamp.
//!
//! ```text
//! rate     = clamp(stat × per_point + (def_level - atk_level) × per_level, 0, rate_ceiling)
//! chance'  = chance × (1 - rate)                 skipped by NO_AVOID / NO_RATE_DEF
//! duration'= duration × (1 - rate)               only if the profile says so
//! chance'' = chance' - clamp(stat × cpp, 0, fixed_chance_ceiling)
//! duration''= duration' - clamp(stat × dpp, 0, fixed_duration_ceiling)
//! duration = clamp(duration'', min_duration, max_duration)
//! ```

use crate::config::EngineConfig;
use crate::effect::EffectMetadata;
use crate::stats::BattleStats;

use super::request::{ApplyFlags, ApplyRequest};

/// Chance and duration left after every reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// Basis points.
    pub chance: u32,
    /// Ticks; `None` never expires.
    pub duration: Option<u64>,
}

/// Defender-side inputs of a resistance computation.
#[derive(Clone, Copy, Debug)]
pub struct Defender<'a> {
    pub battle: &'a BattleStats,
    pub level: i32,
}

pub fn resolve(
    meta: &EffectMetadata,
    config: &EngineConfig,
    request: &ApplyRequest,
    defender: Defender<'_>,
    attacker_level: i32,
) -> Resolved {
    let scale = EngineConfig::CHANCE_SCALE as i64;

    if request.flags.contains(ApplyFlags::LOADED) {
        return Resolved {
            chance: EngineConfig::CHANCE_SCALE,
            duration: request.duration,
        };
    }

    let avoid = !request.flags.contains(ApplyFlags::NO_AVOID);
    let shorten = !request.flags.contains(ApplyFlags::NO_TICK_DEF);

    let mut chance = (request.chance as i64).min(scale);
    let mut duration = request.duration.map(|d| d as i64);

    if let Some(rate) = &meta.resist.rate
        && !request.flags.contains(ApplyFlags::NO_RATE_DEF)
    {
        let ceiling = (config.max_rate_reduction as i64).min(scale);
        let raw = defender.battle.get(rate.stat) as i64 * rate.per_point as i64
            + (defender.level as i64 - attacker_level as i64) * rate.per_level as i64;
        let reduction = raw.clamp(0, ceiling);

        if avoid {
            chance = chance * (scale - reduction) / scale;
        }
        if rate.duration && shorten {
            duration = duration.map(|d| d * (scale - reduction) / scale);
        }
    }

    if let Some(fixed) = &meta.resist.fixed {
        let stat = defender.battle.get(fixed.stat) as i64;

        if avoid {
            let ceiling = config.max_fixed_chance_reduction as i64;
            let reduction = (stat * fixed.chance_per_point as i64).clamp(0, ceiling);
            chance -= reduction;
        }
        if shorten {
            let ceiling = config.max_fixed_duration_reduction.min(i64::MAX as u64) as i64;
            let reduction = (stat * fixed.duration_per_point).clamp(0, ceiling);
            duration = duration.map(|d| d - reduction);
        }
    }

    Resolved {
        chance: chance.clamp(0, scale) as u32,
        duration: duration.map(|d| meta.clamp_duration(d.max(0) as u64)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectKind, EffectRegistry};
    use crate::stats::StatId;

    fn defender(con: i32, ego: i32) -> BattleStats {
        let mut battle = BattleStats::zeroed();
        battle.set(StatId::Con, con);
        battle.set(StatId::Ego, ego);
        battle
    }

    #[test]
    fn poison_against_sturdy_defender() {
        let registry = EffectRegistry::builtin();
        let meta = registry.get(EffectKind::Poison);
        let config = EngineConfig::default();
        let battle = defender(30, 20);
        let request = ApplyRequest::new(EffectKind::Poison)
            .chance(8000)
            .duration(30_000);

        let resolved = resolve(
            meta,
            &config,
            &request,
            Defender {
                battle: &battle,
                level: 50,
            },
            40,
        );

        // rate = 30 × 100 + (50 - 40) × 50 = 3500 bp
        // chance 8000 × 0.65 = 5200, minus 20 × 10 = 5000
        // duration 30000 × 0.65 = 19500, minus 20 × 100 = 17500
        assert_eq!(
            resolved,
            Resolved {
                chance: 5000,
                duration: Some(17_500)
            }
        );
    }

    #[test]
    fn ceilings_bound_each_stage() {
        let registry = EffectRegistry::builtin();
        let meta = registry.get(EffectKind::Poison);
        let config = EngineConfig {
            max_rate_reduction: 2_000,
            max_fixed_chance_reduction: 100,
            max_fixed_duration_reduction: 500,
            ..EngineConfig::default()
        };
        let battle = defender(99, 99);
        let request = ApplyRequest::new(EffectKind::Poison)
            .chance(10_000)
            .duration(10_000);

        let resolved = resolve(
            meta,
            &config,
            &request,
            Defender {
                battle: &battle,
                level: 1,
            },
            1,
        );

        // 10000 × 0.8 - 100
        assert_eq!(resolved.chance, 7_900);
        // 10000 × 0.8 - 500
        assert_eq!(resolved.duration, Some(7_500));
    }

    #[test]
    fn floor_applies_after_reductions() {
        let registry = EffectRegistry::builtin();
        let meta = registry.get(EffectKind::Poison);
        let config = EngineConfig::default();
        let battle = defender(99, 99);
        let request = ApplyRequest::new(EffectKind::Poison).duration(2_000);

        let resolved = resolve(
            meta,
            &config,
            &request,
            Defender {
                battle: &battle,
                level: 99,
            },
            1,
        );

        // rate stage saturates at 100%, never negative, then floored at 1000
        assert_eq!(resolved.chance, 0);
        assert_eq!(resolved.duration, Some(1_000));
    }

    #[test]
    fn stronger_attacker_lowers_rate_but_not_below_zero() {
        let registry = EffectRegistry::builtin();
        let meta = registry.get(EffectKind::Silence);
        let config = EngineConfig::default();
        let battle = defender(1, 0);
        let request = ApplyRequest::new(EffectKind::Silence).chance(6_000);

        let resolved = resolve(
            meta,
            &config,
            &request,
            Defender {
                battle: &battle,
                level: 1,
            },
            99,
        );

        // 1 × 100 - 98 × 50 < 0, so no reduction at all
        assert_eq!(resolved.chance, 6_000);
        assert_eq!(resolved.duration, None);
    }

    #[test]
    fn flags_skip_stages() {
        let registry = EffectRegistry::builtin();
        let meta = registry.get(EffectKind::Poison);
        let config = EngineConfig::default();
        let battle = defender(30, 20);
        let defender = Defender {
            battle: &battle,
            level: 50,
        };
        let base = ApplyRequest::new(EffectKind::Poison)
            .chance(8000)
            .duration(30_000);

        let no_rate = resolve(meta, &config, &base.flags(ApplyFlags::NO_RATE_DEF), defender, 40);
        assert_eq!(no_rate.chance, 7_800);
        assert_eq!(no_rate.duration, Some(28_000));

        let no_avoid = resolve(meta, &config, &base.flags(ApplyFlags::NO_AVOID), defender, 40);
        assert_eq!(no_avoid.chance, 8_000);
        assert_eq!(no_avoid.duration, Some(17_500));

        let loaded = resolve(meta, &config, &base.duration(10).flags(ApplyFlags::LOADED), defender, 40);
        assert_eq!(loaded.chance, 10_000);
        // no floor for restored effects
        assert_eq!(loaded.duration, Some(10));
    }
}
