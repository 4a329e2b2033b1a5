//! Scripted scenarios: a set of spawned templates and a timeline of steps.
//!
//! ```ron
//! (
//!     name: "poison duel",
//!     spawns: [(id: 1, template: "knight"), (id: 2, template: "witch")],
//!     steps: [
//!         Apply(target: 1, kind: Poison, source: Some(2), params: (5, 0, 0, 0), duration: Some(5000)),
//!         Advance(ticks: 6000),
//!     ],
//! )
//! ```

use status_core::{ApplyFlags, ApplyRequest, ClearReason, EffectKind, EngineConfig, EntityId};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scenario {
    pub name: String,
    /// Overrides the configured game seed.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Option<u64>,
    pub spawns: Vec<ScenarioSpawn>,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioSpawn {
    pub id: u32,
    pub template: String,
}

impl ScenarioSpawn {
    pub fn entity(&self) -> EntityId {
        EntityId(self.id)
    }
}

/// One scripted action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    Apply {
        target: u32,
        kind: EffectKind,
        #[cfg_attr(feature = "serde", serde(default))]
        source: Option<u32>,
        #[cfg_attr(feature = "serde", serde(default))]
        params: [i32; 4],
        #[cfg_attr(feature = "serde", serde(default))]
        duration: Option<u64>,
        #[cfg_attr(feature = "serde", serde(default = "certain"))]
        chance: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        flags: ApplyFlags,
    },
    Exit {
        target: u32,
        kind: EffectKind,
    },
    Clear {
        target: u32,
        reason: ClearReason,
    },
    Damage {
        target: u32,
        hp: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        sp: i32,
    },
    Kill {
        target: u32,
    },
    SetLevel {
        target: u32,
        level: i32,
    },
    Advance {
        ticks: u64,
    },
}

#[cfg(feature = "serde")]
fn certain() -> u32 {
    EngineConfig::CHANCE_SCALE
}

impl Step {
    /// Entity the step acts on; `None` for clock steps.
    pub fn target(&self) -> Option<EntityId> {
        match *self {
            Self::Apply { target, .. }
            | Self::Exit { target, .. }
            | Self::Clear { target, .. }
            | Self::Damage { target, .. }
            | Self::Kill { target }
            | Self::SetLevel { target, .. } => Some(EntityId(target)),
            Self::Advance { .. } => None,
        }
    }

    /// Engine request of an `Apply` step.
    pub fn request(&self) -> Option<ApplyRequest> {
        let Self::Apply {
            kind,
            source,
            params,
            duration,
            chance,
            flags,
            ..
        } = *self
        else {
            return None;
        };
        let mut request = ApplyRequest::new(kind)
            .params(params)
            .chance(chance.min(EngineConfig::CHANCE_SCALE))
            .flags(flags);
        request.source = source.map(EntityId);
        request.duration = duration;
        Some(request)
    }
}

impl Scenario {
    /// Spawn ids that appear more than once.
    pub fn duplicate_spawns(&self) -> Vec<u32> {
        let mut seen = Vec::new();
        let mut duplicates = Vec::new();
        for spawn in &self.spawns {
            if seen.contains(&spawn.id) {
                duplicates.push(spawn.id);
            } else {
                seen.push(spawn.id);
            }
        }
        duplicates
    }

    /// Total simulated time the timeline advances.
    pub fn span(&self) -> u64 {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Advance { ticks } => *ticks,
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(target: u32) -> Step {
        Step::Apply {
            target,
            kind: EffectKind::Stun,
            source: Some(9),
            params: [1, 0, 0, 0],
            duration: Some(2000),
            chance: 20_000,
            flags: ApplyFlags::NO_AVOID,
        }
    }

    #[test]
    fn apply_step_builds_request() {
        let request = apply(1).request().unwrap();
        assert_eq!(request.kind, EffectKind::Stun);
        assert_eq!(request.source, Some(EntityId(9)));
        assert_eq!(request.duration, Some(2000));
        assert_eq!(request.chance, EngineConfig::CHANCE_SCALE);
        assert_eq!(request.flags, ApplyFlags::NO_AVOID);
        assert!(Step::Advance { ticks: 5 }.request().is_none());
    }

    #[test]
    fn span_and_duplicates() {
        let scenario = Scenario {
            name: "t".into(),
            seed: None,
            spawns: vec![
                ScenarioSpawn {
                    id: 1,
                    template: "a".into(),
                },
                ScenarioSpawn {
                    id: 1,
                    template: "b".into(),
                },
            ],
            steps: vec![
                apply(1),
                Step::Advance { ticks: 500 },
                Step::Kill { target: 1 },
                Step::Advance { ticks: 250 },
            ],
        };
        assert_eq!(scenario.span(), 750);
        assert_eq!(scenario.duplicate_spawns(), vec![1]);
        assert_eq!(scenario.steps[2].target(), Some(EntityId(1)));
    }
}
