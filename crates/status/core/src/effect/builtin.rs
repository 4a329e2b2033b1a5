//! Built-in effect content.
//!
//! One record per [`EffectKind`]. Numbers here are game content, not engine
//! rules; data files may replace any record through
//! [`EffectRegistry::with_overrides`](super::EffectRegistry::with_overrides).

use super::kind::{Capabilities, EffectKind};
use super::metadata::{
    EffectFlags, EffectMetadata, EndAction, ExitReasons, FixedResist, LockCondition, Magnitude,
    RateResist, ResistProfile, StackPolicy, TickAction,
};
use crate::stats::{BonusOp, StatId};

const HARD_LOCK: Capabilities = Capabilities::MOVE
    .union(Capabilities::CAST)
    .union(Capabilities::PICKUP)
    .union(Capabilities::DROP);

const fn rate(stat: StatId, per_point: i32, per_level: i32) -> Option<RateResist> {
    Some(RateResist {
        stat,
        per_point,
        per_level,
        duration: true,
    })
}

const fn fixed(stat: StatId, chance_per_point: i32, duration_per_point: i64) -> Option<FixedResist> {
    Some(FixedResist {
        stat,
        chance_per_point,
        duration_per_point,
    })
}

const fn param_percent(index: u8, percent: i32) -> Magnitude {
    Magnitude::Param { index, percent }
}

const NOTHING: Magnitude = Magnitude::Fixed(0);

pub(crate) fn table() -> Vec<EffectMetadata> {
    use EffectKind as K;
    use StatId as S;

    vec![
        // ===== damage over time =====
        EffectMetadata::new(K::Poison)
            .icon(30)
            .skill(52)
            .flags(EffectFlags::DEBUFF)
            .contributes(S::Defense, BonusOp::Less, Magnitude::Fixed(25))
            .periodic(
                1000,
                TickAction::Drain {
                    hp: Magnitude::param(0),
                    sp: NOTHING,
                },
            )
            .resist(ResistProfile {
                rate: rate(S::Con, 100, 50),
                fixed: fixed(S::Ego, 10, 100),
            })
            .duration_clamp(Some(1000), None),
        EffectMetadata::new(K::Bleeding)
            .icon(31)
            .flags(EffectFlags::DEBUFF)
            .contributes(S::HpRegen, BonusOp::Override, Magnitude::Fixed(0))
            .periodic(
                2000,
                TickAction::Drain {
                    hp: Magnitude::param(0),
                    sp: NOTHING,
                },
            )
            .resist(ResistProfile {
                rate: rate(S::Con, 50, 50),
                fixed: None,
            }),
        EffectMetadata::new(K::Burning)
            .icon(32)
            .flags(EffectFlags::DEBUFF)
            .contributes(S::MagicDefense, BonusOp::Less, Magnitude::Fixed(20))
            .periodic(
                1000,
                TickAction::Drain {
                    hp: Magnitude::param(0),
                    sp: NOTHING,
                },
            )
            .conflicts_with(&[K::Freeze]),
        // ===== incapacitating states =====
        EffectMetadata::new(K::Stun)
            .icon(33)
            .flags(EffectFlags::DEBUFF)
            .locks(HARD_LOCK)
            .contributes(S::Evasion, BonusOp::Override, Magnitude::Fixed(0))
            .resist(ResistProfile {
                rate: rate(S::Con, 100, 50),
                fixed: fixed(S::Ego, 10, 50),
            })
            .duration_clamp(Some(500), Some(5000)),
        EffectMetadata::new(K::Freeze)
            .icon(34)
            .flags(EffectFlags::DEBUFF)
            .locks(HARD_LOCK)
            .contributes(S::Defense, BonusOp::Less, Magnitude::Fixed(50))
            .contributes(S::MagicDefense, BonusOp::More, Magnitude::Fixed(25))
            .conflicts_with(&[K::Burning])
            .resist(ResistProfile {
                rate: rate(S::Wil, 100, 50),
                fixed: None,
            }),
        EffectMetadata::new(K::Stone)
            .icon(35)
            .flags(EffectFlags::DEBUFF)
            .locks(HARD_LOCK)
            // 10% less defense per hardening stage
            .contributes(S::Defense, BonusOp::Less, param_percent(1, 1000))
            .periodic(1000, TickAction::Pulse { param: 1, max: 5 })
            .resist(ResistProfile {
                rate: rate(S::Wil, 100, 50),
                fixed: None,
            }),
        EffectMetadata::new(K::Sleep)
            .icon(36)
            .flags(EffectFlags::DEBUFF | EffectFlags::REMOVE_ON_DAMAGE)
            .locks(HARD_LOCK)
            .resist(ResistProfile {
                rate: rate(S::Int, 100, 50),
                fixed: None,
            }),
        EffectMetadata::new(K::Silence)
            .icon(37)
            .flags(EffectFlags::DEBUFF)
            .locks(Capabilities::CAST)
            .resist(ResistProfile {
                rate: rate(S::Con, 100, 50),
                fixed: None,
            }),
        EffectMetadata::new(K::Mute)
            .icon(38)
            .flags(EffectFlags::DEBUFF | EffectFlags::NO_DISPEL | EffectFlags::NO_CLEAR_ON_DEATH)
            .locks(Capabilities::CHAT),
        EffectMetadata::new(K::Blind)
            .icon(39)
            .flags(EffectFlags::DEBUFF)
            .contributes(S::Accuracy, BonusOp::Less, Magnitude::Fixed(25))
            .contributes(S::Evasion, BonusOp::Less, Magnitude::Fixed(25))
            .resist(ResistProfile {
                rate: rate(S::Int, 100, 50),
                fixed: None,
            }),
        EffectMetadata::new(K::Curse)
            .icon(40)
            .flags(EffectFlags::DEBUFF)
            .contributes(S::Ego, BonusOp::Override, Magnitude::Fixed(0))
            .contributes(S::Attack, BonusOp::Less, Magnitude::Fixed(25))
            .contributes(S::MoveSpeed, BonusOp::Less, Magnitude::Fixed(10))
            .resist(ResistProfile {
                rate: rate(S::Ego, 100, 50),
                fixed: None,
            }),
        EffectMetadata::new(K::Confusion)
            .icon(41)
            .flags(EffectFlags::DEBUFF)
            .resist(ResistProfile {
                rate: rate(S::Int, 100, 50),
                fixed: None,
            }),
        // ===== movement locks =====
        EffectMetadata::new(K::Rooted)
            .icon(42)
            .flags(EffectFlags::DEBUFF)
            .locks(Capabilities::MOVE)
            .conflicts_with(&[K::Entangled]),
        EffectMetadata::new(K::Entangled)
            .icon(43)
            .flags(EffectFlags::DEBUFF)
            .locks(Capabilities::MOVE)
            .contributes(S::Evasion, BonusOp::Less, Magnitude::Fixed(50))
            .conflicts_with(&[K::Rooted]),
        // ===== stat debuffs =====
        EffectMetadata::new(K::Slow)
            .icon(44)
            .flags(EffectFlags::DEBUFF)
            .contributes(S::MoveSpeed, BonusOp::Less, Magnitude::param(0))
            .contributes(S::AttackSpeed, BonusOp::Less, param_percent(0, 50))
            .stacking(StackPolicy::RejectUnlessHigher { param: 0 })
            .conflicts_with(&[K::Haste]),
        EffectMetadata::new(K::Weakness)
            .icon(45)
            .flags(EffectFlags::DEBUFF)
            .contributes(S::Str, BonusOp::Flat, param_percent(0, -100))
            .stacking(StackPolicy::RejectUnlessHigher { param: 0 }),
        EffectMetadata::new(K::Exhausted)
            .icon(46)
            .flags(EffectFlags::DEBUFF | EffectFlags::NO_DISPEL)
            .contributes(S::AttackSpeed, BonusOp::Less, Magnitude::Fixed(30))
            .contributes(S::MpRegen, BonusOp::Override, Magnitude::Fixed(0)),
        // ===== stat buffs =====
        EffectMetadata::new(K::Blessing)
            .icon(10)
            .skill(34)
            .flags(EffectFlags::BUFF)
            .contributes(S::Str, BonusOp::Flat, Magnitude::param(0))
            .contributes(S::Dex, BonusOp::Flat, Magnitude::param(0))
            .contributes(S::Int, BonusOp::Flat, Magnitude::param(0))
            .stacking(StackPolicy::RejectUnlessHigher { param: 0 })
            .conflicts_with(&[K::Curse]),
        EffectMetadata::new(K::Haste)
            .icon(12)
            .skill(29)
            .flags(EffectFlags::BUFF)
            .contributes(S::AttackSpeed, BonusOp::Increased, Magnitude::param(0))
            .contributes(S::MoveSpeed, BonusOp::More, Magnitude::Fixed(25))
            .stacking(StackPolicy::RejectUnlessHigher { param: 0 })
            .conflicts_with(&[K::Slow]),
        EffectMetadata::new(K::Regeneration)
            .icon(14)
            .flags(EffectFlags::BUFF)
            .periodic(
                2000,
                TickAction::Restore {
                    hp: Magnitude::Stat {
                        stat: S::HpRegen,
                        percent: 100,
                    },
                    sp: Magnitude::Stat {
                        stat: S::MpRegen,
                        percent: 50,
                    },
                },
            ),
        EffectMetadata::new(K::Berserk)
            .icon(16)
            .skill(258)
            .flags(EffectFlags::BUFF | EffectFlags::NO_DISPEL)
            .locks(Capabilities::CAST)
            .contributes(S::Attack, BonusOp::More, Magnitude::Fixed(50))
            .contributes(S::Defense, BonusOp::Override, Magnitude::Fixed(0))
            .contributes(S::HpMax, BonusOp::More, Magnitude::Fixed(100))
            .blocked_by(&[K::Exhausted])
            .on_end(
                ExitReasons::EXPIRED | ExitReasons::CANCELLED,
                EndAction::Start {
                    kind: K::Exhausted,
                    params: [0; 4],
                    duration: Some(10_000),
                },
            ),
        EffectMetadata::new(K::Shield)
            .icon(18)
            .flags(EffectFlags::BUFF)
            .contributes(S::Defense, BonusOp::Flat, Magnitude::param(0))
            .contributes(S::MagicDefense, BonusOp::Flat, param_percent(0, 50)),
        EffectMetadata::new(K::Rage)
            .icon(20)
            .flags(EffectFlags::BUFF)
            .contributes(S::Attack, BonusOp::Flat, param_percent(0, 300))
            .contributes(S::Critical, BonusOp::Flat, Magnitude::param(0))
            .stacking(StackPolicy::Accumulate { param: 0, cap: 5 }),
        EffectMetadata::new(K::Concentration)
            .icon(22)
            .skill(45)
            .flags(EffectFlags::BUFF)
            .contributes(S::Dex, BonusOp::Increased, Magnitude::param(0))
            .contributes(S::Accuracy, BonusOp::Flat, param_percent(0, 50))
            .conflicts_with(&[K::Hiding, K::Cloaking]),
        // ===== stealth =====
        EffectMetadata::new(K::Hiding)
            .icon(4)
            .skill(51)
            .flags(EffectFlags::NO_SAVE | EffectFlags::NO_DISPEL)
            .locks(HARD_LOCK)
            .periodic(
                5000,
                TickAction::Drain {
                    hp: NOTHING,
                    sp: Magnitude::Fixed(1),
                },
            )
            .conflicts_with(&[K::Cloaking]),
        EffectMetadata::new(K::Cloaking)
            .icon(5)
            .skill(135)
            .flags(EffectFlags::NO_SAVE)
            .locks(Capabilities::PICKUP)
            .contributes(S::MoveSpeed, BonusOp::Less, Magnitude::Fixed(30))
            .conflicts_with(&[K::Hiding]),
        // ===== ensemble and partner links =====
        EffectMetadata::new(K::Performing)
            .icon(50)
            .flags(EffectFlags::NO_SAVE)
            .contributes(S::AttackSpeed, BonusOp::Less, Magnitude::Fixed(25))
            .lock_while(Capabilities::MOVE, LockCondition::Absent(K::Longing))
            .on_end(ExitReasons::all(), EndAction::End(K::Longing)),
        EffectMetadata::new(K::Longing)
            .icon(51)
            .flags(EffectFlags::NO_SAVE)
            .contributes(S::MoveSpeed, BonusOp::Less, Magnitude::Fixed(50)),
        EffectMetadata::new(K::Guarding)
            .icon(52)
            .flags(EffectFlags::BUFF | EffectFlags::NO_SAVE)
            .contributes(S::MoveSpeed, BonusOp::Less, Magnitude::Fixed(20))
            .on_end(
                ExitReasons::all(),
                EndAction::EndLinked {
                    param: 0,
                    kind: K::Guarded,
                },
            ),
        EffectMetadata::new(K::Guarded)
            .icon(53)
            .flags(EffectFlags::BUFF | EffectFlags::NO_SAVE)
            .contributes(S::Defense, BonusOp::More, Magnitude::Fixed(50))
            .on_end(
                ExitReasons::all(),
                EndAction::EndLinked {
                    param: 0,
                    kind: K::Guarding,
                },
            ),
        // ===== bookkeeping states =====
        EffectMetadata::new(K::Vending)
            .icon(60)
            .flags(EffectFlags::NO_SAVE | EffectFlags::NO_DISPEL)
            .locks(HARD_LOCK),
        EffectMetadata::new(K::DeathPenalty)
            .icon(61)
            .flags(
                EffectFlags::DEBUFF
                    | EffectFlags::APPLY_ON_DEAD
                    | EffectFlags::NO_CLEAR_ON_DEATH
                    | EffectFlags::NO_DISPEL,
            )
            .contributes(S::HpRegen, BonusOp::Less, Magnitude::Fixed(50))
            .contributes(S::MpRegen, BonusOp::Less, Magnitude::Fixed(50)),
        EffectMetadata::new(K::MailQuota)
            .flags(
                EffectFlags::NO_ICON
                    | EffectFlags::NO_CLEAR_ON_DEATH
                    | EffectFlags::NO_DISPEL
                    | EffectFlags::NO_CLEAR,
            )
            .stacking(StackPolicy::Replace),
        EffectMetadata::new(K::Shapeshift)
            .icon(70)
            .flags(EffectFlags::BUFF | EffectFlags::NO_SAVE)
            .contributes(S::Str, BonusOp::Flat, Magnitude::param(0))
            .contributes(S::MoveSpeed, BonusOp::More, Magnitude::Fixed(20))
            .on_end(ExitReasons::all(), EndAction::End(K::Disguise)),
        EffectMetadata::new(K::Disguise)
            .icon(71)
            .flags(EffectFlags::DISPLAY_ONLY | EffectFlags::NO_SAVE),
        EffectMetadata::new(K::Decay)
            .icon(72)
            .flags(
                EffectFlags::DEBUFF
                    | EffectFlags::OPERATES_ON_DEAD
                    | EffectFlags::APPLY_ON_DEAD
                    | EffectFlags::NO_CLEAR_ON_DEATH,
            )
            .periodic(1000, TickAction::Pulse { param: 0, max: 10 }),
    ]
}
