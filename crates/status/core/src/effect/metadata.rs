//! Declarative per-effect records.
//!
//! Every behavioural difference between effect types lives here as data: the
//! engine interprets an [`EffectMetadata`] record instead of branching on the
//! effect type.

use bitflags::bitflags;

use super::kind::{Capabilities, EffectKind};
use crate::stats::{BattleStats, Bonus, BonusOp, StatCategory, StatId};

bitflags! {
    /// Static traits of an effect type.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct EffectFlags: u16 {
        /// Beneficial; removed by dispel.
        const BUFF              = 1 << 0;
        /// Harmful; removed by cure.
        const DEBUFF            = 1 << 1;
        /// Never persisted on logout.
        const NO_SAVE           = 1 << 2;
        /// Not persisted when the instance has no expiration.
        const NO_SAVE_INFINITE  = 1 << 3;
        /// Survives the owner's death.
        const NO_CLEAR_ON_DEATH = 1 << 4;
        /// Keeps ticking while the owner is dead.
        const OPERATES_ON_DEAD  = 1 << 5;
        /// May be started on a dead entity.
        const APPLY_ON_DEAD     = 1 << 6;
        /// Immune to dispel and cure.
        const NO_DISPEL         = 1 << 7;
        /// Immune to every bulk clear short of despawn.
        const NO_CLEAR          = 1 << 8;
        /// Ends as soon as the owner takes damage.
        const REMOVE_ON_DAMAGE  = 1 << 9;
        /// Pure display state without gameplay contributions.
        const DISPLAY_ONLY      = 1 << 10;
        /// Never announced to observers.
        const NO_ICON           = 1 << 11;
    }
}

/// A scalar resolved against an instance's parameters or its owner's stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magnitude {
    Fixed(i32),
    /// `params[index] × percent / 100`
    Param { index: u8, percent: i32 },
    /// `stat × percent / 100`, read from the owner's computed statistics.
    Stat { stat: StatId, percent: i32 },
}

impl Magnitude {
    pub const fn param(index: u8) -> Self {
        Self::Param {
            index,
            percent: 100,
        }
    }

    pub fn resolve(&self, params: &[i32; 4], battle: &BattleStats) -> i32 {
        match *self {
            Self::Fixed(v) => v,
            Self::Param { index, percent } => {
                let raw = params.get(index as usize).copied().unwrap_or(0) as i64;
                (raw * percent as i64 / 100) as i32
            }
            Self::Stat { stat, percent } => {
                (battle.get(stat) as i64 * percent as i64 / 100) as i32
            }
        }
    }

    pub(crate) fn param_index(&self) -> Option<u8> {
        match self {
            Self::Param { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// One bonus an active effect adds to a statistic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contribution {
    pub stat: StatId,
    pub op: BonusOp,
    pub magnitude: Magnitude,
}

impl Contribution {
    pub fn bonus(&self, params: &[i32; 4], battle: &BattleStats) -> Bonus {
        Bonus::with_op(self.op, self.magnitude.resolve(params, battle))
    }
}

/// Presence test used by conditional capability locks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LockCondition {
    Present(EffectKind),
    Absent(EffectKind),
}

/// Locks that only hold while a condition on the owner's other effects holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalLock {
    pub locks: Capabilities,
    pub condition: LockCondition,
}

/// What happens when an effect is applied to a slot that is already active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackPolicy {
    /// Overwrite parameters and duration in place.
    #[default]
    Replace,
    /// Reject unless `params[param]` of the new request is strictly greater.
    RejectUnlessHigher { param: u8 },
    /// Add `params[param]` onto the existing value, saturating at `cap`.
    Accumulate { param: u8, cap: i32 },
    /// The active instance wins; the request is rejected.
    Keep,
}

/// Percentage reduction driven by a defender statistic and the level delta.
///
/// `rate = stat × per_point + (defender_level - attacker_level) × per_level`
/// in basis points, floored at zero and capped by the configured ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateResist {
    pub stat: StatId,
    pub per_point: i32,
    pub per_level: i32,
    /// Whether the same rate also shortens the duration.
    pub duration: bool,
}

/// Flat subtraction driven by a defender statistic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedResist {
    pub stat: StatId,
    /// Basis points of chance removed per point of `stat`.
    pub chance_per_point: i32,
    /// Ticks of duration removed per point of `stat`.
    pub duration_per_point: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResistProfile {
    pub rate: Option<RateResist>,
    pub fixed: Option<FixedResist>,
}

impl ResistProfile {
    pub const NONE: Self = Self {
        rate: None,
        fixed: None,
    };
}

/// Side effect performed on every periodic fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickAction {
    /// Damage the owner's pools.
    Drain { hp: Magnitude, sp: Magnitude },
    /// Heal the owner's pools.
    Restore { hp: Magnitude, sp: Magnitude },
    /// Advance the counter in `params[param]` by one, up to `max`, then
    /// recompute the effect's categories.
    Pulse { param: u8, max: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Periodic {
    pub interval: u64,
    pub action: TickAction,
}

/// Why an instance left its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ExitReason {
    /// Remaining duration ran out.
    Expired,
    /// Ended by an explicit `force_exit`.
    Cancelled,
    /// Pushed out by a conflicting effect.
    Overridden,
    /// Owner died.
    Death,
    /// Removed by a bulk clear other than death.
    Cleared,
    /// Interrupted by damage.
    Interrupted,
    /// Owner stopped being eligible for ticks.
    Ineligible,
    /// Ended by a compensating action of another effect.
    Linked,
}

impl ExitReason {
    pub const fn flag(self) -> ExitReasons {
        match self {
            Self::Expired => ExitReasons::EXPIRED,
            Self::Cancelled => ExitReasons::CANCELLED,
            Self::Overridden => ExitReasons::OVERRIDDEN,
            Self::Death => ExitReasons::DEATH,
            Self::Cleared => ExitReasons::CLEARED,
            Self::Interrupted => ExitReasons::INTERRUPTED,
            Self::Ineligible => ExitReasons::INELIGIBLE,
            Self::Linked => ExitReasons::LINKED,
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct ExitReasons: u8 {
        const EXPIRED     = 1 << 0;
        const CANCELLED   = 1 << 1;
        const OVERRIDDEN  = 1 << 2;
        const DEATH       = 1 << 3;
        const CLEARED     = 1 << 4;
        const INTERRUPTED = 1 << 5;
        const INELIGIBLE  = 1 << 6;
        const LINKED      = 1 << 7;
    }
}

/// Compensating action run after an instance has left its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndAction {
    /// Start a follow-up effect on the owner. No roll, no reductions.
    Start {
        kind: EffectKind,
        params: [i32; 4],
        duration: Option<u64>,
    },
    /// End another effect on the owner.
    End(EffectKind),
    /// End `kind` on the entity whose id is stored in `params[param]`.
    EndLinked { param: u8, kind: EffectKind },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTrigger {
    pub when: ExitReasons,
    pub action: EndAction,
}

/// Everything the engine knows about one effect type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectMetadata {
    pub kind: EffectKind,
    /// Client display token.
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon: u16,
    /// Skill that usually grants this effect, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill: Option<u16>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: EffectFlags,
    /// Categories recomputed on start/end beyond those implied by
    /// `contributions`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_categories: StatCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub contributions: Vec<Contribution>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub locks: Capabilities,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditional_locks: Vec<ConditionalLock>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stacking: StackPolicy,
    /// Active effects force-exited when this one starts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conflicts: Vec<EffectKind>,
    /// Active effects that make this one fail to start.
    #[cfg_attr(feature = "serde", serde(default))]
    pub blocked_by: Vec<EffectKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resist: ResistProfile,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_duration: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_duration: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub periodic: Option<Periodic>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_end: Vec<EndTrigger>,
}

impl EffectMetadata {
    /// Record with no behaviour: no contributions, no locks, replace on
    /// reapply, no resistance.
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            icon: 0,
            skill: None,
            flags: EffectFlags::empty(),
            extra_categories: StatCategory::empty(),
            contributions: Vec::new(),
            locks: Capabilities::empty(),
            conditional_locks: Vec::new(),
            stacking: StackPolicy::Replace,
            conflicts: Vec::new(),
            blocked_by: Vec::new(),
            resist: ResistProfile::NONE,
            min_duration: None,
            max_duration: None,
            periodic: None,
            on_end: Vec::new(),
        }
    }

    /// Statistics this effect can change, recomputed on every start and end.
    pub fn categories(&self) -> StatCategory {
        self.contributions
            .iter()
            .fold(self.extra_categories, |acc, c| acc | c.stat.category())
    }

    pub fn is_periodic(&self) -> bool {
        self.periodic.is_some()
    }

    /// Clamp a rolled duration into `[min_duration, max_duration]`.
    ///
    /// The floor wins when the two disagree; registry validation rejects
    /// tables where they do.
    pub fn clamp_duration(&self, duration: u64) -> u64 {
        let capped = match self.max_duration {
            Some(max) => duration.min(max),
            None => duration,
        };
        match self.min_duration {
            Some(min) => capped.max(min),
            None => capped,
        }
    }

    // ===== builder =====

    pub fn icon(mut self, icon: u16) -> Self {
        self.icon = icon;
        self
    }

    pub fn skill(mut self, skill: u16) -> Self {
        self.skill = Some(skill);
        self
    }

    pub fn flags(mut self, flags: EffectFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn touches(mut self, categories: StatCategory) -> Self {
        self.extra_categories |= categories;
        self
    }

    pub fn contributes(mut self, stat: StatId, op: BonusOp, magnitude: Magnitude) -> Self {
        self.contributions.push(Contribution {
            stat,
            op,
            magnitude,
        });
        self
    }

    pub fn locks(mut self, locks: Capabilities) -> Self {
        self.locks |= locks;
        self
    }

    pub fn lock_while(mut self, locks: Capabilities, condition: LockCondition) -> Self {
        self.conditional_locks.push(ConditionalLock { locks, condition });
        self
    }

    pub fn stacking(mut self, policy: StackPolicy) -> Self {
        self.stacking = policy;
        self
    }

    pub fn conflicts_with(mut self, kinds: &[EffectKind]) -> Self {
        self.conflicts.extend_from_slice(kinds);
        self
    }

    pub fn blocked_by(mut self, kinds: &[EffectKind]) -> Self {
        self.blocked_by.extend_from_slice(kinds);
        self
    }

    pub fn resist(mut self, resist: ResistProfile) -> Self {
        self.resist = resist;
        self
    }

    pub fn duration_clamp(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    pub fn periodic(mut self, interval: u64, action: TickAction) -> Self {
        self.periodic = Some(Periodic { interval, action });
        self
    }

    pub fn on_end(mut self, when: ExitReasons, action: EndAction) -> Self {
        self.on_end.push(EndTrigger { when, action });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_union_contributions_and_extras() {
        let meta = EffectMetadata::new(EffectKind::Blessing)
            .contributes(StatId::Str, BonusOp::Flat, Magnitude::param(0))
            .contributes(StatId::Dex, BonusOp::Flat, Magnitude::param(0))
            .touches(StatCategory::MOVE_SPEED);
        assert_eq!(
            meta.categories(),
            StatCategory::STR | StatCategory::DEX | StatCategory::MOVE_SPEED
        );
    }

    #[test]
    fn duration_floor_applies_after_ceiling() {
        let meta = EffectMetadata::new(EffectKind::Stun).duration_clamp(Some(1000), Some(5000));
        assert_eq!(meta.clamp_duration(200), 1000);
        assert_eq!(meta.clamp_duration(3000), 3000);
        assert_eq!(meta.clamp_duration(9000), 5000);
    }

    #[test]
    fn param_magnitude_scales_by_percent() {
        let battle = BattleStats::zeroed();
        let m = Magnitude::Param {
            index: 1,
            percent: 50,
        };
        // 40 × 50 / 100
        assert_eq!(m.resolve(&[0, 40, 0, 0], &battle), 20);
        assert_eq!(Magnitude::param(9).resolve(&[1, 2, 3, 4], &battle), 0);
    }
}
