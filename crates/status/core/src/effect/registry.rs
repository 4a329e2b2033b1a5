//! Immutable effect metadata table.
//!
//! Built once at startup, validated, then shared by `Arc` between every engine
//! instance. Lookups are a plain index by [`EffectKind`].

use strum::EnumCount;

use super::builtin;
use super::kind::EffectKind;
use super::metadata::{EffectMetadata, EndAction, Magnitude, StackPolicy, TickAction};
use crate::config::EngineConfig;
use crate::error::RegistryError;
use crate::stats::StatCategory;

#[derive(Clone, Debug)]
pub struct EffectRegistry {
    entries: Vec<EffectMetadata>,
}

impl EffectRegistry {
    /// The built-in content table.
    ///
    /// # Panics
    ///
    /// Panics if the built-in table fails validation, which is a bug in this
    /// crate rather than a runtime condition.
    pub fn builtin() -> Self {
        match Self::from_entries(builtin::table()) {
            Ok(registry) => registry,
            Err(err) => panic!("built-in effect table is invalid: {err}"),
        }
    }

    /// Builds a registry from one record per effect kind, in any order.
    pub fn from_entries(
        entries: impl IntoIterator<Item = EffectMetadata>,
    ) -> Result<Self, RegistryError> {
        let mut slots: Vec<Option<EffectMetadata>> = vec![None; EffectKind::COUNT];
        for meta in entries {
            let slot = &mut slots[meta.kind.index()];
            if slot.is_some() {
                return Err(RegistryError::Duplicate(meta.kind));
            }
            *slot = Some(meta);
        }

        let mut ordered = Vec::with_capacity(EffectKind::COUNT);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(meta) => {
                    validate(&meta)?;
                    ordered.push(meta);
                }
                None => {
                    let kind = EffectKind::from_repr(index as u16)
                        .ok_or(RegistryError::Missing(EffectKind::Poison))?;
                    return Err(RegistryError::Missing(kind));
                }
            }
        }

        Ok(Self { entries: ordered })
    }

    /// Returns a copy with some records replaced (content overlays).
    ///
    /// Each override may appear at most once.
    pub fn with_overrides(
        &self,
        overrides: impl IntoIterator<Item = EffectMetadata>,
    ) -> Result<Self, RegistryError> {
        let mut entries = self.entries.clone();
        let mut seen = [false; EffectKind::COUNT];
        for meta in overrides {
            let index = meta.kind.index();
            if seen[index] {
                return Err(RegistryError::Duplicate(meta.kind));
            }
            seen[index] = true;
            validate(&meta)?;
            tracing::debug!(kind = %meta.kind, "effect metadata overridden");
            entries[index] = meta;
        }
        Ok(Self { entries })
    }

    #[inline]
    pub fn get(&self, kind: EffectKind) -> &EffectMetadata {
        &self.entries[kind.index()]
    }

    /// Categories recomputed when `kind` starts or ends.
    pub fn categories(&self, kind: EffectKind) -> StatCategory {
        self.get(kind).categories()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectMetadata> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_param(kind: EffectKind, index: u8) -> Result<(), RegistryError> {
    if (index as usize) < EngineConfig::MAX_PARAMS {
        Ok(())
    } else {
        Err(RegistryError::ParamOutOfRange { kind, index })
    }
}

fn check_magnitude(kind: EffectKind, magnitude: &Magnitude) -> Result<(), RegistryError> {
    match magnitude.param_index() {
        Some(index) => check_param(kind, index),
        None => Ok(()),
    }
}

fn validate(meta: &EffectMetadata) -> Result<(), RegistryError> {
    let kind = meta.kind;

    for contribution in &meta.contributions {
        if let Magnitude::Stat { stat, .. } = contribution.magnitude {
            return Err(RegistryError::StatReference { kind, stat });
        }
        check_magnitude(kind, &contribution.magnitude)?;
    }

    match meta.stacking {
        StackPolicy::RejectUnlessHigher { param } => check_param(kind, param)?,
        StackPolicy::Accumulate { param, cap } => {
            check_param(kind, param)?;
            if cap <= 0 {
                return Err(RegistryError::InvalidStackCap(kind));
            }
        }
        StackPolicy::Replace | StackPolicy::Keep => {}
    }

    if meta.conflicts.contains(&kind) {
        return Err(RegistryError::SelfConflict(kind));
    }

    if let Some(periodic) = &meta.periodic {
        if periodic.interval == 0 {
            return Err(RegistryError::ZeroInterval(kind));
        }
        match periodic.action {
            TickAction::Drain { hp, sp } | TickAction::Restore { hp, sp } => {
                check_magnitude(kind, &hp)?;
                check_magnitude(kind, &sp)?;
            }
            TickAction::Pulse { param, .. } => check_param(kind, param)?,
        }
    }

    if let (Some(min), Some(max)) = (meta.min_duration, meta.max_duration)
        && min > max
    {
        return Err(RegistryError::InvertedDurationClamp { kind, min, max });
    }

    for trigger in &meta.on_end {
        if let EndAction::EndLinked { param, .. } = trigger.action {
            check_param(kind, param)?;
        }
    }

    Ok(())
}
