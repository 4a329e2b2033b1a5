//! Bonus application following the layered stack:
//! Flat → %Inc → More → Less → Override → Clamp
//!
//! Every statistic folds equipment and effect contributions through this one
//! stack, so the result only depends on the set of bonuses and the order in
//! which the caller pushes multiplicative terms.

/// Application stage of a bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusOp {
    Flat,
    Increased,
    More,
    Less,
    Override,
}

/// A single bonus that can be applied to a stat value.
///
/// - **Flat**: additive, summed first (e.g. +5 STR)
/// - **Increased**: percentages summed then multiplied once (e.g. +20%)
/// - **More**: sequential multipliers (50 = ×1.5)
/// - **Less**: sequential reductions (10 = ×0.9)
/// - **Override**: replaces the result outright; the last override wins
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    Flat(i32),
    Increased(i32),
    More(i32),
    Less(i32),
    Override(i32),
}

impl Bonus {
    pub fn flat(value: i32) -> Self {
        Bonus::Flat(value)
    }

    pub fn increased(percent: i32) -> Self {
        Bonus::Increased(percent)
    }

    pub fn more(percent: i32) -> Self {
        Bonus::More(percent)
    }

    pub fn less(percent: i32) -> Self {
        Bonus::Less(percent)
    }

    pub fn override_to(value: i32) -> Self {
        Bonus::Override(value)
    }

    /// Builds a bonus of the given stage.
    pub fn with_op(op: BonusOp, value: i32) -> Self {
        match op {
            BonusOp::Flat => Bonus::Flat(value),
            BonusOp::Increased => Bonus::Increased(value),
            BonusOp::More => Bonus::More(value),
            BonusOp::Less => Bonus::Less(value),
            BonusOp::Override => Bonus::Override(value),
        }
    }
}

/// A collection of bonuses applied in stage order.
///
/// # Example
/// ```
/// # use status_core::stats::bonus::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::flat(5));           // +5
/// stack.add(Bonus::increased(20));     // +20%
/// stack.add(Bonus::increased(15));     // +15% (summed)
/// stack.add(Bonus::more(50));          // ×1.5
/// stack.add(Bonus::less(10));          // ×0.9
///
/// // clamp((10 + 5) × 1.35 × 1.5 × 0.9, 5, 100) = 27
/// assert_eq!(stack.apply(10, 5, 100), 27);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            bonuses: Vec::new(),
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn extend(&mut self, bonuses: impl IntoIterator<Item = Bonus>) {
        self.bonuses.extend(bonuses);
    }

    pub fn clear(&mut self) {
        self.bonuses.clear();
    }

    /// Apply all bonuses to a base value with clamping.
    ///
    /// ```text
    /// result = clamp(override ?? (base + flat) × (1 + inc/100) × more × less, min, max)
    /// ```
    ///
    /// Arithmetic runs in `i64` so large multiplier chains cannot overflow
    /// before the clamp.
    pub fn apply(&self, base: i32, min: i32, max: i32) -> i32 {
        let mut flat_sum: i64 = 0;
        let mut inc_sum: i64 = 0;
        for bonus in &self.bonuses {
            match bonus {
                Bonus::Flat(v) => flat_sum += *v as i64,
                Bonus::Increased(p) => inc_sum += *p as i64,
                _ => {}
            }
        }

        let mut value = base as i64 + flat_sum;
        if inc_sum != 0 {
            value = value * (100 + inc_sum) / 100;
        }

        for bonus in &self.bonuses {
            if let Bonus::More(p) = bonus {
                value = value * (100 + *p as i64) / 100;
            }
        }

        for bonus in &self.bonuses {
            if let Bonus::Less(p) = bonus {
                value = value * (100 - *p as i64) / 100;
            }
        }

        let overridden = self.bonuses.iter().rev().find_map(|b| match b {
            Bonus::Override(v) => Some(*v as i64),
            _ => None,
        });
        if let Some(v) = overridden {
            value = v;
        }

        value.clamp(min as i64, max as i64) as i32
    }

    pub fn apply_unclamped(&self, base: i32) -> i32 {
        self.apply(base, i32::MIN, i32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }
}

/// Builder for constructing bonus stacks fluently
///
/// ```
/// # use status_core::stats::bonus::BonusStack;
/// let result = BonusStack::new()
///     .flat(5)
///     .increased(20)
///     .more(50)
///     .apply(10, 0, 100);
/// assert_eq!(result, 27);
/// ```
impl BonusStack {
    pub fn flat(mut self, value: i32) -> Self {
        self.add(Bonus::flat(value));
        self
    }

    pub fn increased(mut self, percent: i32) -> Self {
        self.add(Bonus::increased(percent));
        self
    }

    pub fn more(mut self, percent: i32) -> Self {
        self.add(Bonus::more(percent));
        self
    }

    pub fn less(mut self, percent: i32) -> Self {
        self.add(Bonus::less(percent));
        self
    }

    pub fn overridden(mut self, value: i32) -> Self {
        self.add(Bonus::override_to(value));
        self
    }
}

/// Legal range of a statistic.
///
/// - **Primary attributes**: [1, 99] prevents degenerate zero stats
/// - **Combat figures**: [0, 9999]
/// - **Attack speed**: [50, 200] keeps swings between 2x slower and 2x faster
/// - **Move speed**: [25, 200]
/// - **Critical**: [0, 100] percent
/// - **Resource maximums**: [1, 99999] never zero
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    pub const PRIMARY: Self = Self { min: 1, max: 99 };
    pub const COMBAT: Self = Self { min: 0, max: 9999 };
    pub const ATTACK_SPEED: Self = Self { min: 50, max: 200 };
    pub const MOVE_SPEED: Self = Self { min: 25, max: 200 };
    pub const PERCENT: Self = Self { min: 0, max: 100 };
    pub const RESOURCE_MAX: Self = Self { min: 1, max: 99999 };
    pub const UNCLAMPED: Self = Self {
        min: i32::MIN,
        max: i32::MAX,
    };

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_apply_in_fixed_order_regardless_of_push_order() {
        let a = BonusStack::new().more(50).flat(10).increased(20);
        let b = BonusStack::new().increased(20).flat(10).more(50);
        assert_eq!(a.apply(100, 0, 9999), b.apply(100, 0, 9999));
        // (100 + 10) × 1.2 × 1.5 = 198
        assert_eq!(a.apply(100, 0, 9999), 198);
    }

    #[test]
    fn override_beats_every_other_stage() {
        let stack = BonusStack::new().flat(500).more(100).overridden(0);
        assert_eq!(stack.apply(40, 0, 9999), 0);
    }

    #[test]
    fn last_override_wins() {
        let stack = BonusStack::new().overridden(10).overridden(30);
        assert_eq!(stack.apply(0, 0, 100), 30);
    }

    #[test]
    fn clamp_applies_after_override() {
        let stack = BonusStack::new().overridden(-50);
        assert_eq!(stack.apply(10, 1, 99), 1);
    }

    #[test]
    fn large_chains_do_not_overflow() {
        let stack = BonusStack::new().more(1000).more(1000).more(1000);
        assert_eq!(stack.apply(9999, 0, 9999), 9999);
    }
}
