//! Identifiers and time units shared by every engine component.

use std::fmt;

/// Unique identifier for any entity hosted by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for effects that have no in-world source
    /// (scripted rewards, map hazards, restored saves).
    pub const SYSTEM: Self = Self(u32::MAX);

    /// Returns true if this entity represents the system source.
    #[inline]
    pub const fn is_system(self) -> bool {
        self.0 == Self::SYSTEM.0
    }

    /// Reinterprets an effect parameter as a linked entity reference.
    ///
    /// Negative values never name an entity.
    #[inline]
    pub fn from_param(value: i32) -> Option<Self> {
        u32::try_from(value).ok().map(Self)
    }

    /// Encodes this id into an effect parameter slot.
    #[inline]
    pub fn as_param(self) -> i32 {
        self.0 as i32
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation time in engine ticks (one tick is one millisecond of game time).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Ticks elapsed since `earlier`, zero if `earlier` is in the future.
    #[inline]
    pub const fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl std::ops::Sub<u64> for Tick {
    type Output = Tick;
    fn sub(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_sub(rhs))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integer resource meter (health or mana) tracked per entity.
///
/// `maximum` mirrors the computed maximum statistic and is only written by the
/// attribute calculator; `current` is written by the damage collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// Creates a full meter.
    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Applies a signed change clamped to `[0, maximum]`.
    ///
    /// Returns the change that was actually applied.
    pub fn apply(&mut self, delta: i32) -> i32 {
        let before = self.current as i64;
        let after = (before + delta as i64).clamp(0, self.maximum as i64);
        self.current = after as u32;
        (after - before) as i32
    }

    /// Lowers `current` if the maximum shrank below it.
    pub(crate) fn set_maximum(&mut self, maximum: u32) {
        self.maximum = maximum;
        self.current = self.current.min(maximum);
    }
}

/// Health and mana pools of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    pub hp: ResourceMeter,
    pub mp: ResourceMeter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_apply_clamps_both_ends() {
        let mut meter = ResourceMeter::new(10, 20);
        assert_eq!(meter.apply(-15), -10);
        assert_eq!(meter.current, 0);
        assert_eq!(meter.apply(50), 20);
        assert_eq!(meter.current, 20);
    }

    #[test]
    fn shrinking_maximum_clamps_current() {
        let mut meter = ResourceMeter::full(100);
        meter.set_maximum(60);
        assert_eq!(meter.current, 60);
    }

    #[test]
    fn entity_param_round_trip_rejects_negative() {
        assert_eq!(EntityId::from_param(7), Some(EntityId(7)));
        assert_eq!(EntityId::from_param(-1), None);
    }
}
