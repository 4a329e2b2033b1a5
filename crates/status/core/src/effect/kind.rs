//! Effect type identifiers and capability restrictions.

use bitflags::bitflags;

/// Every effect type the engine knows about.
///
/// The discriminant is the slot index inside an entity's
/// [`StatusChangeStore`](crate::status::StatusChangeStore), and declaration
/// order is the order in which effect contributions are folded into a
/// statistic.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumCount,
    strum::EnumIter,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u16)]
pub enum EffectKind {
    // ===== damage over time =====
    Poison,
    Bleeding,
    Burning,

    // ===== incapacitating states =====
    Stun,
    Freeze,
    Stone,
    Sleep,
    Silence,
    Mute,
    Blind,
    Curse,
    Confusion,

    // ===== movement locks =====
    Rooted,
    Entangled,

    // ===== stat debuffs =====
    Slow,
    Weakness,
    Exhausted,

    // ===== stat buffs =====
    Blessing,
    Haste,
    Regeneration,
    Berserk,
    Shield,
    Rage,
    Concentration,

    // ===== stealth =====
    Hiding,
    Cloaking,

    // ===== ensemble and partner links =====
    Performing,
    Longing,
    Guarding,
    Guarded,

    // ===== bookkeeping states =====
    Vending,
    DeathPenalty,
    MailQuota,
    Shapeshift,
    Disguise,
    Decay,
}

impl EffectKind {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Converts a raw identifier coming from scripts or the wire.
    ///
    /// # Panics
    ///
    /// Panics if `raw` does not name a registered effect type. An unknown id
    /// means the caller and the registry disagree about the effect table.
    pub fn from_raw(raw: u16) -> Self {
        match Self::from_repr(raw) {
            Some(kind) => kind,
            None => panic!("effect id {raw} is not part of the effect registry"),
        }
    }
}

/// Actions an effect can forbid.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumCount,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Capability {
    Move,
    Cast,
    Chat,
    Pickup,
    Drop,
}

impl Capability {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn flag(self) -> Capabilities {
        match self {
            Self::Move => Capabilities::MOVE,
            Self::Cast => Capabilities::CAST,
            Self::Chat => Capabilities::CHAT,
            Self::Pickup => Capabilities::PICKUP,
            Self::Drop => Capabilities::DROP,
        }
    }
}

bitflags! {
    /// A set of [`Capability`] restrictions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct Capabilities: u8 {
        const MOVE   = 1 << 0;
        const CAST   = 1 << 1;
        const CHAT   = 1 << 2;
        const PICKUP = 1 << 3;
        const DROP   = 1 << 4;
    }
}

impl Capabilities {
    pub fn capabilities(self) -> impl Iterator<Item = Capability> {
        use strum::IntoEnumIterator;
        Capability::iter().filter(move |cap| self.contains(cap.flag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn raw_ids_round_trip() {
        assert_eq!(EffectKind::from_raw(0), EffectKind::Poison);
        let last = (EffectKind::COUNT - 1) as u16;
        assert_eq!(EffectKind::from_raw(last), EffectKind::Decay);
    }

    #[test]
    #[should_panic(expected = "not part of the effect registry")]
    fn unknown_raw_id_panics() {
        EffectKind::from_raw(EffectKind::COUNT as u16);
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("MAIL_QUOTA".parse::<EffectKind>(), Ok(EffectKind::MailQuota));
        assert_eq!(EffectKind::DeathPenalty.to_string(), "death_penalty");
    }

    #[test]
    fn capability_flags_iterate_in_order() {
        let set = Capabilities::CHAT | Capabilities::MOVE;
        let caps: Vec<_> = set.capabilities().collect();
        assert_eq!(caps, vec![Capability::Move, Capability::Chat]);
    }
}
