//! Common error infrastructure for status-core.
//!
//! Gameplay failures (resisted rolls, immune targets, conflicting slots, dead
//! targets) are ordinary [`ApplyOutcome`](crate::engine::ApplyOutcome) values,
//! never errors. The types here cover setup problems only: malformed effect
//! tables and entity bookkeeping mistakes made by the embedding code.

use crate::effect::EffectKind;
use crate::stats::StatId;
use crate::types::EntityId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input that should be rejected without retry.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug in the caller.
    Internal,

    /// Content is unusable; the engine cannot be constructed.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all status-core errors.
pub trait StatusError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant (metrics, tests).
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Problems found while building an [`EffectRegistry`](crate::effect::EffectRegistry).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("effect {0} has no metadata entry")]
    Missing(EffectKind),

    #[error("effect {0} is declared more than once")]
    Duplicate(EffectKind),

    #[error("effect {kind} references parameter {index}, only 0..4 exist")]
    ParamOutOfRange { kind: EffectKind, index: u8 },

    #[error("effect {0} lists itself in its conflict set")]
    SelfConflict(EffectKind),

    #[error("effect {0} stacks with a non-positive cap")]
    InvalidStackCap(EffectKind),

    #[error("effect {0} has a zero tick interval")]
    ZeroInterval(EffectKind),

    #[error("effect {kind} has a duration floor {min} above its ceiling {max}")]
    InvertedDurationClamp { kind: EffectKind, min: u64, max: u64 },

    #[error("effect {kind} contribution reads statistic {stat}; only tick actions may")]
    StatReference { kind: EffectKind, stat: StatId },
}

impl StatusError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing(_) => "registry_missing",
            Self::Duplicate(_) => "registry_duplicate",
            Self::ParamOutOfRange { .. } => "registry_param_out_of_range",
            Self::SelfConflict(_) => "registry_self_conflict",
            Self::InvalidStackCap(_) => "registry_invalid_stack_cap",
            Self::ZeroInterval(_) => "registry_zero_interval",
            Self::InvertedDurationClamp { .. } => "registry_inverted_duration_clamp",
            Self::StatReference { .. } => "registry_stat_reference",
        }
    }
}

/// Entity bookkeeping errors raised by the engine façade.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("entity {0} is already registered")]
    DuplicateEntity(EntityId),

    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),
}

impl StatusError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::DuplicateEntity(_) => ErrorSeverity::Internal,
            Self::UnknownEntity(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateEntity(_) => "duplicate_entity",
            Self::UnknownEntity(_) => "unknown_entity",
        }
    }
}
