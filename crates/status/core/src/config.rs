/// Engine configuration constants and tunable parameters.
///
/// Ceilings are expressed in basis points (`10_000` = 100%) for chance
/// reductions and in ticks for duration reductions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Base seed mixed into every resistance roll (for replay/determinism).
    pub game_seed: u64,

    /// Ceiling for the rate (percentage) reduction stage, in basis points.
    pub max_rate_reduction: u32,

    /// Ceiling for the fixed reduction stage applied to chance, in basis points.
    pub max_fixed_chance_reduction: u32,

    /// Ceiling for the fixed reduction stage applied to duration, in ticks.
    pub max_fixed_duration_reduction: u64,

    /// Maximum nesting of apply/exit calls triggered from inside other
    /// apply/exit calls. Compensating effects beyond this depth are skipped.
    pub max_reentry_depth: u32,

    /// Which effects are dropped when an entity logs out.
    pub logout: LogoutPolicy,
}

/// Bulk-clear behaviour on logout, on top of the per-effect save flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LogoutPolicy {
    pub clear_debuffs: bool,
    pub clear_buffs: bool,
}

impl EngineConfig {
    // ===== compile-time constants =====
    /// Number of generic parameters carried by every effect instance.
    pub const MAX_PARAMS: usize = 4;
    /// Longest dependency chain in the statistic graph (primary → maximum → regen).
    pub const MAX_CASCADE_DEPTH: usize = 3;
    /// Denominator of every chance and rate value.
    pub const CHANCE_SCALE: u32 = 10_000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_RATE_REDUCTION: u32 = 10_000;
    pub const DEFAULT_MAX_FIXED_CHANCE_REDUCTION: u32 = 5_000;
    pub const DEFAULT_MAX_FIXED_DURATION_REDUCTION: u64 = 10_000;
    pub const DEFAULT_MAX_REENTRY_DEPTH: u32 = 8;

    pub fn new() -> Self {
        Self {
            game_seed: 0,
            max_rate_reduction: Self::DEFAULT_MAX_RATE_REDUCTION,
            max_fixed_chance_reduction: Self::DEFAULT_MAX_FIXED_CHANCE_REDUCTION,
            max_fixed_duration_reduction: Self::DEFAULT_MAX_FIXED_DURATION_REDUCTION,
            max_reentry_depth: Self::DEFAULT_MAX_REENTRY_DEPTH,
            logout: LogoutPolicy::default(),
        }
    }

    pub fn with_seed(mut self, game_seed: u64) -> Self {
        self.game_seed = game_seed;
        self
    }

    pub fn with_reentry_depth(mut self, depth: u32) -> Self {
        self.max_reentry_depth = depth;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
