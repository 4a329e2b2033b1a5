use bitflags::bitflags;

use crate::config::EngineConfig;
use crate::effect::EffectKind;
use crate::types::EntityId;

bitflags! {
    /// Per-request switches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct ApplyFlags: u8 {
        /// Chance is not reduced by the defender.
        const NO_AVOID    = 1 << 0;
        /// Duration is not reduced by the defender.
        const NO_TICK_DEF = 1 << 1;
        /// Skip the rate stage; the fixed stage still applies.
        const NO_RATE_DEF = 1 << 2;
        /// Do not announce the start to observers.
        const NO_ICON     = 1 << 3;
        /// Restoring a saved effect: no roll, no reductions, no clamps,
        /// no immunity or start filter.
        const LOADED      = 1 << 4;
    }
}

/// A request to start (or refresh) an effect on an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplyRequest {
    pub kind: EffectKind,
    pub source: Option<EntityId>,
    pub params: [i32; 4],
    /// Base duration in ticks; `None` never expires.
    pub duration: Option<u64>,
    /// Base chance in basis points.
    pub chance: u32,
    pub flags: ApplyFlags,
}

impl ApplyRequest {
    /// Certain, infinite, sourceless request with zeroed parameters.
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            source: None,
            params: [0; 4],
            duration: None,
            chance: EngineConfig::CHANCE_SCALE,
            flags: ApplyFlags::empty(),
        }
    }

    pub fn source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn params(mut self, params: [i32; 4]) -> Self {
        self.params = params;
        self
    }

    /// Sets a single parameter; out-of-range indices are ignored.
    pub fn param(mut self, index: usize, value: i32) -> Self {
        if let Some(slot) = self.params.get_mut(index) {
            *slot = value;
        }
        self
    }

    pub fn duration(mut self, ticks: u64) -> Self {
        self.duration = Some(ticks);
        self
    }

    pub fn infinite(mut self) -> Self {
        self.duration = None;
        self
    }

    pub fn chance(mut self, basis_points: u32) -> Self {
        self.chance = basis_points;
        self
    }

    pub fn flags(mut self, flags: ApplyFlags) -> Self {
        self.flags |= flags;
        self
    }
}

/// How an apply request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ApplyOutcome {
    /// A new instance now occupies the slot.
    Started,
    /// The active instance got new parameters and duration.
    Refreshed,
    /// The active instance accumulated onto its counter.
    Stacked,
    /// The roll failed or reductions left nothing.
    Resisted,
    /// The host declared the target immune.
    Immune,
    /// An active effect forbids this one.
    Blocked(EffectKind),
    /// The stacking policy kept the active instance.
    Rejected,
    /// The host start filter vetoed the request.
    Filtered,
    /// The target is dead and the effect cannot start on dead entities.
    Dead,
    /// No such entity.
    NoTarget,
    /// Too many nested apply/exit calls.
    DepthExceeded,
}

impl ApplyOutcome {
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Started | Self::Refreshed | Self::Stacked)
    }
}

/// Bulk-clear selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ClearReason {
    /// Everything that does not survive death.
    Death,
    /// Everything that must not be persisted, plus configured buff/debuff drops.
    Logout,
    /// Dispellable buffs.
    Dispel,
    /// Dispellable debuffs.
    Cure,
    /// Everything not protected from clearing.
    All,
}

/// One effect as handed to the persistence collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedEffect {
    pub kind: EffectKind,
    pub params: [i32; 4],
    pub remaining: Option<u64>,
}
