use std::collections::BTreeSet;

use status_core::{ApplyRequest, EffectKind, EntityId};

use super::StartFilter;

/// Vetoes a fixed set of effect kinds, optionally only on some entities.
///
/// Models map-wide rules such as "no stealth in town".
#[derive(Clone, Debug, Default)]
pub struct BlockKinds {
    kinds: BTreeSet<EffectKind>,
    only: Option<BTreeSet<EntityId>>,
    priority: i32,
}

impl BlockKinds {
    pub fn new(kinds: impl IntoIterator<Item = EffectKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            only: None,
            priority: 0,
        }
    }

    /// Restricts the rule to the given entities.
    pub fn on(mut self, entities: impl IntoIterator<Item = EntityId>) -> Self {
        self.only = Some(entities.into_iter().collect());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl StartFilter for BlockKinds {
    fn name(&self) -> &'static str {
        "block_kinds"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn admit(&self, target: EntityId, request: &ApplyRequest) -> bool {
        let applies = self
            .only
            .as_ref()
            .is_none_or(|entities| entities.contains(&target));
        !(applies && self.kinds.contains(&request.kind))
    }
}
