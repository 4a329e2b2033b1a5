//! Periodic tick driver.
//!
//! Each active timed effect has exactly one armed timer. On fire the driver
//! checks the timer still belongs to the slot, performs the periodic action,
//! subtracts the elapsed span and either re-arms or expires the effect. An
//! effect of duration `T` and interval `I` therefore acts `⌈T / I⌉` times.

use std::sync::Arc;

use crate::effect::{EffectFlags, EffectKind, ExitReason, TickAction};
use crate::env::{CombatHost, EffectChange, StatusObserver};
use crate::types::{EntityId, Tick};

use super::StatusEngine;
use super::timer::TimerTarget;

impl<H: CombatHost, O: StatusObserver> StatusEngine<H, O> {
    /// Fires every timer due at or before `until`, in due order, then moves
    /// the clock to `until`. Returns how many timers fired.
    pub fn advance_to(&mut self, until: Tick) -> usize {
        let mut fired = 0;
        while let Some((id, due, target)) = self.timers.pop_due(until) {
            self.now = self.now.max(due);
            self.fire(id, target);
            fired += 1;
        }
        self.now = self.now.max(until);
        fired
    }

    pub fn advance_by(&mut self, ticks: u64) -> usize {
        self.advance_to(self.now + ticks)
    }

    fn fire(&mut self, id: u64, target: TimerTarget) {
        let TimerTarget { entity: owner, kind } = target;
        let Some(instance) = self.effect(owner, kind).copied() else {
            tracing::trace!(entity = %owner, %kind, timer = id, "timer for vacated slot");
            return;
        };
        let Some(handle) = instance.timer.filter(|handle| handle.id == id) else {
            tracing::trace!(entity = %owner, %kind, timer = id, "stale timer");
            return;
        };
        if !self.enter() {
            return;
        }

        let registry = Arc::clone(&self.registry);
        let meta = registry.get(kind);
        tracing::trace!(entity = %owner, %kind, timer = id, "timer fired");

        if !self.is_eligible(owner, meta.flags) {
            self.exit_inner(owner, kind, ExitReason::Ineligible);
            self.leave();
            return;
        }

        if let Some(periodic) = meta.periodic {
            self.perform(owner, kind, periodic.action);
        }

        // the action may have killed the owner and cleared this slot
        let still_armed = self
            .effect(owner, kind)
            .and_then(|inst| inst.timer)
            .is_some_and(|t| t.id == handle.id);
        if still_armed {
            self.rearm_or_expire(owner, kind, handle.span);
        }
        self.leave();
    }

    fn is_eligible(&self, owner: EntityId, flags: EffectFlags) -> bool {
        if flags.contains(EffectFlags::OPERATES_ON_DEAD) {
            return true;
        }
        self.entities
            .get(&owner)
            .is_some_and(|entity| !self.host.is_dead(owner, &entity.pool))
    }

    fn perform(&mut self, owner: EntityId, kind: EffectKind, action: TickAction) {
        let Some(entity) = self.entities.get_mut(&owner) else {
            return;
        };
        let Some(params) = entity.status.get(kind).map(|inst| inst.params) else {
            return;
        };

        match action {
            TickAction::Drain { hp, sp } | TickAction::Restore { hp, sp } => {
                let sign = if matches!(action, TickAction::Drain { .. }) {
                    -1
                } else {
                    1
                };
                let hp = sign * hp.resolve(&params, &entity.battle);
                let sp = sign * sp.resolve(&params, &entity.battle);
                let applied = self.host.apply_delta(owner, &mut entity.pool, hp, sp);
                tracing::trace!(entity = %owner, %kind, hp = applied.hp, sp = applied.sp, "periodic delta");
                if applied.killed {
                    tracing::debug!(entity = %owner, %kind, "killed by periodic effect");
                    self.handle_death(owner);
                }
            }
            TickAction::Pulse { param, max } => {
                let Some(instance) = entity.status.get_mut(kind) else {
                    return;
                };
                let slot = &mut instance.params[param as usize];
                if *slot >= max {
                    return;
                }
                *slot += 1;
                let change = EffectChange {
                    kind,
                    active: true,
                    remaining: instance.remaining_at(self.now),
                    params: instance.params,
                    reason: None,
                };
                let categories = self.registry.categories(kind);
                self.mark_dirty(owner, categories);
                self.notify_effect(owner, kind, change);
            }
        }
    }

    fn rearm_or_expire(&mut self, owner: EntityId, kind: EffectKind, span: u64) {
        let now = self.now;
        let Some(instance) = self
            .entities
            .get_mut(&owner)
            .and_then(|entity| entity.status.get_mut(kind))
        else {
            return;
        };

        instance.timer = None;
        match instance.remaining {
            Some(remaining) if remaining <= span => {
                self.exit_inner(owner, kind, ExitReason::Expired);
            }
            Some(remaining) => {
                instance.remaining = Some(remaining - span);
                instance.armed_at = now;
                self.arm(owner, kind);
            }
            None => {
                instance.armed_at = now;
                self.arm(owner, kind);
            }
        }
    }
}
