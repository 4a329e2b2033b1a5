use status_core::{
    AppliedDelta, ApplyRequest, CombatHost, EffectKind, EntityId, ResourcePool, StandardHost,
};

use super::HookRegistry;

/// Standard meter arithmetic and immunities, with start filters from a
/// [`HookRegistry`].
#[derive(Clone, Default)]
pub struct HookedHost {
    pub standard: StandardHost,
    pub hooks: HookRegistry,
}

impl HookedHost {
    pub fn new(hooks: HookRegistry) -> Self {
        Self {
            standard: StandardHost::new(),
            hooks,
        }
    }
}

impl CombatHost for HookedHost {
    fn apply_delta(
        &mut self,
        target: EntityId,
        pool: &mut ResourcePool,
        hp: i32,
        sp: i32,
    ) -> AppliedDelta {
        self.standard.apply_delta(target, pool, hp, sp)
    }

    fn is_dead(&self, target: EntityId, pool: &ResourcePool) -> bool {
        self.standard.is_dead(target, pool)
    }

    fn is_immune(&self, target: EntityId, kind: EffectKind) -> bool {
        self.standard.is_immune(target, kind)
    }

    fn admit(&mut self, target: EntityId, request: &ApplyRequest) -> bool {
        self.standard.admit(target, request) && self.hooks.admit(target, request)
    }
}
