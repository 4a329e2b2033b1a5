//! Effect types, their declarative metadata and the registry that holds it.
mod builtin;
pub mod instance;
pub mod kind;
pub mod metadata;
pub mod registry;

pub use instance::{EffectInstance, TimerHandle};
pub use kind::{Capabilities, Capability, EffectKind};
pub use metadata::{
    ConditionalLock, Contribution, EffectFlags, EffectMetadata, EndAction, EndTrigger, ExitReason,
    ExitReasons, FixedResist, LockCondition, Magnitude, Periodic, RateResist, ResistProfile,
    StackPolicy, TickAction,
};
pub use registry::EffectRegistry;
