//! Entry and exit paths of an effect slot.
//!
//! ```text
//! absent ──apply──▶ pending (checks, roll) ──▶ active ──exit──▶ absent
//!                          │                     ▲  │
//!                          └── outcome ≠ Started │  └── refresh / stack
//! ```
//!
//! Exit vacates the slot before it does anything else, so nested calls made
//! by end triggers always observe the effect as absent.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::effect::{
    EffectFlags, EffectInstance, EffectKind, EndAction, ExitReason, StackPolicy, TimerHandle,
};
use crate::env::{AppliedDelta, CombatHost, EffectChange, StatusObserver, compute_seed};
use crate::types::EntityId;

use super::StatusEngine;
use super::request::{ApplyFlags, ApplyOutcome, ApplyRequest, ClearReason, SavedEffect};
use super::resist::{self, Defender};
use super::timer::TimerTarget;

impl<H: CombatHost, O: StatusObserver> StatusEngine<H, O> {
    /// Starts, refreshes or stacks an effect.
    ///
    /// Gameplay failures come back as an [`ApplyOutcome`]; use
    /// [`ApplyOutcome::is_applied`] for a plain yes/no.
    pub fn apply(&mut self, target: EntityId, request: ApplyRequest) -> ApplyOutcome {
        if !self.enter() {
            tracing::warn!(
                entity = %target,
                kind = %request.kind,
                depth = self.depth,
                "reentry depth exceeded; apply skipped"
            );
            return ApplyOutcome::DepthExceeded;
        }
        let outcome = self.apply_inner(target, request);
        self.leave();
        outcome
    }

    /// Positional convenience over [`apply`](Self::apply).
    pub fn start(
        &mut self,
        target: EntityId,
        kind: EffectKind,
        source: Option<EntityId>,
        params: [i32; 4],
        duration: Option<u64>,
        chance: u32,
    ) -> bool {
        let mut request = ApplyRequest::new(kind).params(params).chance(chance);
        request.source = source;
        request.duration = duration;
        self.apply(target, request).is_applied()
    }

    /// Ends an active effect. Returns false, changing nothing, if it is absent.
    pub fn force_exit(&mut self, target: EntityId, kind: EffectKind) -> bool {
        self.exit(target, kind, ExitReason::Cancelled)
    }

    /// Removes every effect selected by `reason`. Returns how many ended.
    pub fn clear(&mut self, target: EntityId, reason: ClearReason) -> usize {
        let Some(entity) = self.entities.get(&target) else {
            return 0;
        };

        let registry = Arc::clone(&self.registry);
        let logout = self.config.logout;
        let selected: Vec<EffectKind> = entity
            .status
            .iter()
            .filter(|instance| {
                let flags = registry.get(instance.kind).flags;
                match reason {
                    ClearReason::Death => !flags.contains(EffectFlags::NO_CLEAR_ON_DEATH),
                    ClearReason::Logout => {
                        flags.contains(EffectFlags::NO_SAVE)
                            || (flags.contains(EffectFlags::NO_SAVE_INFINITE)
                                && instance.is_infinite())
                            || (logout.clear_debuffs && flags.contains(EffectFlags::DEBUFF))
                            || (logout.clear_buffs && flags.contains(EffectFlags::BUFF))
                    }
                    ClearReason::Dispel => {
                        flags.contains(EffectFlags::BUFF)
                            && !flags.intersects(EffectFlags::NO_DISPEL | EffectFlags::NO_CLEAR)
                    }
                    ClearReason::Cure => {
                        flags.contains(EffectFlags::DEBUFF)
                            && !flags.intersects(EffectFlags::NO_DISPEL | EffectFlags::NO_CLEAR)
                    }
                    ClearReason::All => !flags.contains(EffectFlags::NO_CLEAR),
                }
            })
            .map(|instance| instance.kind)
            .collect();

        if !self.enter() {
            tracing::warn!(entity = %target, %reason, "reentry depth exceeded; clear skipped");
            return 0;
        }
        let exit_reason = match reason {
            ClearReason::Death => ExitReason::Death,
            _ => ExitReason::Cleared,
        };
        let ended = selected
            .into_iter()
            .filter(|kind| self.exit_inner(target, *kind, exit_reason))
            .count();

        tracing::debug!(entity = %target, %reason, ended, "effects cleared");
        self.leave();
        ended
    }

    /// Death notification from the host.
    pub fn handle_death(&mut self, target: EntityId) -> usize {
        self.clear(target, ClearReason::Death)
    }

    /// Damage notification; ends effects that break on damage.
    pub fn on_damaged(&mut self, target: EntityId) -> usize {
        let Some(entity) = self.entities.get(&target) else {
            return 0;
        };
        let registry = Arc::clone(&self.registry);
        let fragile: Vec<EffectKind> = entity
            .status
            .iter()
            .map(|instance| instance.kind)
            .filter(|kind| registry.get(*kind).flags.contains(EffectFlags::REMOVE_ON_DAMAGE))
            .collect();

        fragile
            .into_iter()
            .filter(|kind| self.exit(target, *kind, ExitReason::Interrupted))
            .count()
    }

    /// Routes a resource change through the host, then reacts to damage and
    /// death.
    pub fn apply_delta(&mut self, target: EntityId, hp: i32, sp: i32) -> Option<AppliedDelta> {
        let entity = self.entities.get_mut(&target)?;
        let applied = self.host.apply_delta(target, &mut entity.pool, hp, sp);
        if applied.hp < 0 {
            self.on_damaged(target);
        }
        if applied.killed {
            self.handle_death(target);
        }
        Some(applied)
    }

    /// Effects to hand to the persistence collaborator.
    pub fn saved_effects(&self, target: EntityId) -> Vec<SavedEffect> {
        let Some(entity) = self.entities.get(&target) else {
            return Vec::new();
        };
        entity
            .status
            .iter()
            .filter(|instance| {
                let flags = self.registry.get(instance.kind).flags;
                !flags.contains(EffectFlags::NO_SAVE)
                    && !(flags.contains(EffectFlags::NO_SAVE_INFINITE) && instance.is_infinite())
            })
            .map(|instance| SavedEffect {
                kind: instance.kind,
                params: instance.params,
                remaining: instance.remaining_at(self.now),
            })
            .collect()
    }

    /// Re-applies saved effects verbatim. Returns how many were restored.
    pub fn restore(&mut self, target: EntityId, effects: &[SavedEffect]) -> usize {
        effects
            .iter()
            .filter(|saved| {
                let mut request = ApplyRequest::new(saved.kind)
                    .params(saved.params)
                    .flags(ApplyFlags::LOADED | ApplyFlags::NO_ICON);
                request.duration = saved.remaining;
                self.apply(target, request).is_applied()
            })
            .count()
    }

    // ===== internals =====

    /// Exit wrapped in the depth guard.
    pub(super) fn exit(&mut self, target: EntityId, kind: EffectKind, reason: ExitReason) -> bool {
        if !self.enter() {
            tracing::warn!(
                entity = %target,
                %kind,
                %reason,
                depth = self.depth,
                "reentry depth exceeded; exit skipped"
            );
            return false;
        }
        let ended = self.exit_inner(target, kind, reason);
        self.leave();
        ended
    }

    fn apply_inner(&mut self, target: EntityId, request: ApplyRequest) -> ApplyOutcome {
        let kind = request.kind;
        let registry = Arc::clone(&self.registry);
        let meta = registry.get(kind);
        let loaded = request.flags.contains(ApplyFlags::LOADED);

        let Some(entity) = self.entities.get(&target) else {
            return ApplyOutcome::NoTarget;
        };

        if self.host.is_dead(target, &entity.pool) && !meta.flags.contains(EffectFlags::APPLY_ON_DEAD)
        {
            return ApplyOutcome::Dead;
        }
        if !loaded && self.host.is_immune(target, kind) {
            tracing::debug!(entity = %target, %kind, "target immune");
            return ApplyOutcome::Immune;
        }
        if let Some(blocker) = meta
            .blocked_by
            .iter()
            .copied()
            .find(|other| entity.status.contains(*other))
        {
            tracing::debug!(entity = %target, %kind, %blocker, "start blocked");
            return ApplyOutcome::Blocked(blocker);
        }

        let attacker_level = request
            .source
            .and_then(|source| self.entities.get(&source))
            .map_or(entity.level(), |source| source.level());
        let resolved = resist::resolve(
            meta,
            &self.config,
            &request,
            Defender {
                battle: &entity.battle,
                level: entity.level(),
            },
            attacker_level,
        );

        if !loaded && !self.host.admit(target, &request) {
            tracing::debug!(entity = %target, %kind, "start filtered by host");
            return ApplyOutcome::Filtered;
        }

        if !loaded {
            if resolved.chance == 0 {
                tracing::debug!(entity = %target, %kind, "chance reduced to zero");
                return ApplyOutcome::Resisted;
            }
            if resolved.chance < EngineConfig::CHANCE_SCALE {
                self.nonce += 1;
                let seed = compute_seed(self.config.game_seed, self.nonce, target.0, kind as u32);
                let roll = self.rng.roll_chance(seed);
                if roll >= resolved.chance {
                    tracing::debug!(
                        entity = %target,
                        %kind,
                        roll,
                        chance = resolved.chance,
                        "resisted"
                    );
                    return ApplyOutcome::Resisted;
                }
            }
            if resolved.duration == Some(0) {
                tracing::debug!(entity = %target, %kind, "duration reduced to zero");
                return ApplyOutcome::Resisted;
            }
        }

        if let Some(existing) = self.effect(target, kind).copied() {
            return self.restack(target, existing, &request, resolved.duration);
        }

        for &other in &meta.conflicts {
            if self.exit_inner(target, other, ExitReason::Overridden) {
                tracing::debug!(entity = %target, %kind, %other, "conflicting effect overridden");
            }
        }

        // an end trigger of an overridden effect may have refilled the slot
        if self.has_effect(target, kind) {
            return ApplyOutcome::Rejected;
        }
        let Some(entity) = self.entities.get_mut(&target) else {
            return ApplyOutcome::NoTarget;
        };

        let mut params = request.params;
        if let StackPolicy::Accumulate { param, cap } = meta.stacking {
            let p = param as usize;
            params[p] = params[p].min(cap);
        }
        let instance =
            EffectInstance::new(kind, request.source, params, resolved.duration, self.now);
        entity.status.insert(instance, meta.locks);
        entity.status.refresh_conditional(&registry);
        self.arm(target, kind);
        self.mark_dirty(target, meta.categories());

        if !request.flags.contains(ApplyFlags::NO_ICON) {
            self.notify_effect(
                target,
                kind,
                EffectChange {
                    kind,
                    active: true,
                    remaining: resolved.duration,
                    params,
                    reason: None,
                },
            );
        }

        tracing::debug!(entity = %target, %kind, duration = ?resolved.duration, "effect started");
        ApplyOutcome::Started
    }

    /// Applies the stacking policy to an occupied slot.
    fn restack(
        &mut self,
        target: EntityId,
        existing: EffectInstance,
        request: &ApplyRequest,
        duration: Option<u64>,
    ) -> ApplyOutcome {
        let kind = existing.kind;
        let registry = Arc::clone(&self.registry);
        let meta = registry.get(kind);

        let (params, outcome) = match meta.stacking {
            StackPolicy::Keep => return ApplyOutcome::Rejected,
            StackPolicy::RejectUnlessHigher { param } => {
                let p = param as usize;
                if request.params[p] <= existing.params[p] {
                    tracing::debug!(entity = %target, %kind, "weaker or equal reapply rejected");
                    return ApplyOutcome::Rejected;
                }
                (request.params, ApplyOutcome::Refreshed)
            }
            StackPolicy::Replace => (request.params, ApplyOutcome::Refreshed),
            StackPolicy::Accumulate { param, cap } => {
                let p = param as usize;
                let mut params = request.params;
                params[p] = existing.params[p].saturating_add(request.params[p]).min(cap);
                (params, ApplyOutcome::Stacked)
            }
        };

        if let Some(timer) = existing.timer {
            self.timers.cancel(timer.id);
        }
        let Some(instance) = self
            .entities
            .get_mut(&target)
            .and_then(|entity| entity.status.get_mut(kind))
        else {
            return ApplyOutcome::NoTarget;
        };
        instance.params = params;
        instance.source = request.source.or(existing.source);
        instance.remaining = duration;
        instance.armed_at = self.now;
        instance.timer = None;

        self.arm(target, kind);
        self.mark_dirty(target, meta.categories());
        if !request.flags.contains(ApplyFlags::NO_ICON) {
            self.notify_effect(
                target,
                kind,
                EffectChange {
                    kind,
                    active: true,
                    remaining: duration,
                    params,
                    reason: None,
                },
            );
        }

        tracing::debug!(entity = %target, %kind, %outcome, ?params, "effect reapplied");
        outcome
    }

    /// Vacates the slot, releases its timer and locks, then runs end
    /// triggers. Returns false if the slot was empty.
    pub(super) fn exit_inner(
        &mut self,
        target: EntityId,
        kind: EffectKind,
        reason: ExitReason,
    ) -> bool {
        let registry = Arc::clone(&self.registry);
        let meta = registry.get(kind);

        let Some(entity) = self.entities.get_mut(&target) else {
            return false;
        };
        let Some(instance) = entity.status.take(kind, meta.locks) else {
            return false;
        };
        entity.status.refresh_conditional(&registry);
        if let Some(timer) = instance.timer {
            self.timers.cancel(timer.id);
        }
        self.mark_dirty(target, meta.categories());

        self.notify_effect(
            target,
            kind,
            EffectChange {
                kind,
                active: false,
                remaining: instance.remaining_at(self.now),
                params: instance.params,
                reason: Some(reason),
            },
        );
        tracing::debug!(entity = %target, %kind, %reason, "effect ended");

        for trigger in meta.on_end.iter().filter(|t| t.when.contains(reason.flag())) {
            match trigger.action {
                EndAction::Start {
                    kind: follow_up,
                    params,
                    duration,
                } => {
                    let mut request = ApplyRequest::new(follow_up)
                        .params(params)
                        .flags(ApplyFlags::NO_AVOID | ApplyFlags::NO_TICK_DEF);
                    request.duration = duration;
                    self.apply(target, request);
                }
                EndAction::End(other) => {
                    self.exit(target, other, ExitReason::Linked);
                }
                EndAction::EndLinked { param, kind: other } => {
                    match EntityId::from_param(instance.params[param as usize]) {
                        Some(partner) => {
                            self.exit(partner, other, ExitReason::Linked);
                        }
                        None => tracing::warn!(
                            entity = %target,
                            %kind,
                            param,
                            "linked partner parameter does not name an entity"
                        ),
                    }
                }
            }
        }

        true
    }

    /// Arms the timer of an occupied slot for `min(remaining, interval)`.
    pub(super) fn arm(&mut self, target: EntityId, kind: EffectKind) {
        let interval = self.registry.get(kind).periodic.map(|p| p.interval);
        let now = self.now;
        let Some(instance) = self
            .entities
            .get_mut(&target)
            .and_then(|entity| entity.status.get_mut(kind))
        else {
            return;
        };

        let span = match (interval, instance.remaining) {
            (Some(interval), Some(remaining)) => interval.min(remaining),
            (Some(interval), None) => interval,
            (None, Some(remaining)) => remaining,
            (None, None) => return,
        };
        let id = self.timers.arm(
            now + span,
            TimerTarget {
                entity: target,
                kind,
            },
        );
        instance.armed_at = now;
        instance.timer = Some(TimerHandle { id, span });
    }
}
