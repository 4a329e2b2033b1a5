//! Start filters consulted before an effect starts.
//!
//! A filter sees every request that passed the engine's own checks (target
//! alive, not immune, not blocked, roll won) and may veto it. The engine then
//! reports [`status_core::ApplyOutcome::Filtered`]. Restored saves never reach
//! the filters.
//!
//! # Execution Order
//!
//! Filters are sorted by priority (lower values run first). The first veto
//! wins and later filters are not consulted.

mod block;
mod host;
mod registry;

pub use block::BlockKinds;
pub use host::HookedHost;
pub use registry::HookRegistry;

use status_core::{ApplyRequest, EntityId};

/// Script-level veto over effect starts.
pub trait StartFilter: Send + Sync {
    /// Returns a human-readable name for this filter (used in logging).
    fn name(&self) -> &'static str;

    /// Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether `request` may start on `target`.
    fn admit(&self, target: EntityId, request: &ApplyRequest) -> bool;
}
