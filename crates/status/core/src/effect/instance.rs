use super::kind::EffectKind;
use crate::types::{EntityId, Tick};

/// Handle to the timer currently armed for an instance.
///
/// `span` is the number of ticks between arming and the scheduled fire; it is
/// subtracted from the remaining duration when the timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle {
    pub id: u64,
    pub span: u64,
}

/// One active effect on one entity.
///
/// `remaining` is measured from `armed_at`, the tick the current timer was
/// armed. `None` means the instance never expires on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectInstance {
    pub kind: EffectKind,
    pub source: Option<EntityId>,
    pub params: [i32; 4],
    pub started_at: Tick,
    pub remaining: Option<u64>,
    pub armed_at: Tick,
    pub timer: Option<TimerHandle>,
}

impl EffectInstance {
    pub fn new(
        kind: EffectKind,
        source: Option<EntityId>,
        params: [i32; 4],
        duration: Option<u64>,
        now: Tick,
    ) -> Self {
        Self {
            kind,
            source,
            params,
            started_at: now,
            remaining: duration,
            armed_at: now,
            timer: None,
        }
    }

    #[inline]
    pub fn param(&self, index: usize) -> Option<i32> {
        self.params.get(index).copied()
    }

    pub fn is_infinite(&self) -> bool {
        self.remaining.is_none()
    }

    /// Remaining duration as seen at `now`.
    pub fn remaining_at(&self, now: Tick) -> Option<u64> {
        self.remaining
            .map(|r| r.saturating_sub(now.since(self.armed_at)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_counts_down_from_arming() {
        let mut inst = EffectInstance::new(EffectKind::Stun, None, [0; 4], Some(500), Tick(100));
        assert_eq!(inst.remaining_at(Tick(100)), Some(500));
        assert_eq!(inst.remaining_at(Tick(350)), Some(250));
        assert_eq!(inst.remaining_at(Tick(900)), Some(0));

        inst.remaining = None;
        assert_eq!(inst.remaining_at(Tick(900)), None);
    }
}
