//! Entity templates.

use status_core::{
    BaseStats, CombatHost, EngineError, EntityId, EntityKind, StatBonuses, StatusEngine,
    StatusObserver,
};

/// Named starting point for a hosted entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityTemplate {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: EntityKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: BaseStats,
    /// Bonuses of the template's worn equipment.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: StatBonuses,
}

impl EntityTemplate {
    pub fn new(name: impl Into<String>, kind: EntityKind, base: BaseStats) -> Self {
        Self {
            name: name.into(),
            kind,
            base,
            equipment: StatBonuses::new(),
        }
    }

    pub fn with_equipment(mut self, equipment: StatBonuses) -> Self {
        self.equipment = equipment;
        self
    }

    /// Spawns this template into `engine` under `id` with full pools.
    pub fn spawn_into<H: CombatHost, O: StatusObserver>(
        &self,
        engine: &mut StatusEngine<H, O>,
        id: EntityId,
    ) -> Result<(), EngineError> {
        engine.spawn(id, self.kind, self.base)?;
        if !self.equipment.is_empty() {
            engine.set_equipment_bonuses(id, self.equipment.clone())?;
            engine.refill(id)?;
        }
        Ok(())
    }
}

/// Templates indexed by name.
#[derive(Clone, Debug, Default)]
pub struct TemplateSet {
    templates: Vec<EntityTemplate>,
}

impl TemplateSet {
    pub fn new(templates: Vec<EntityTemplate>) -> Self {
        Self { templates }
    }

    pub fn get(&self, name: &str) -> Option<&EntityTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<EntityTemplate> for TemplateSet {
    fn from_iter<T: IntoIterator<Item = EntityTemplate>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use status_core::{Bonus, EffectRegistry, EngineConfig, StatId};

    use super::*;

    #[test]
    fn equipment_is_folded_and_pools_refilled() {
        let mut engine = StatusEngine::new(Arc::new(EffectRegistry::builtin()), EngineConfig::default());
        let knight = EntityTemplate::new("knight", EntityKind::Player, BaseStats::default())
            .with_equipment(StatBonuses::new().with(StatId::HpMax, Bonus::flat(50)));

        knight.spawn_into(&mut engine, EntityId(1)).unwrap();

        let entity = engine.entity(EntityId(1)).unwrap();
        assert_eq!(entity.stat(StatId::HpMax), 155);
        assert_eq!(entity.pool().hp.current, 155);
    }

    #[test]
    fn lookup_by_name() {
        let set: TemplateSet = ["a", "b"]
            .into_iter()
            .map(|name| EntityTemplate::new(name, EntityKind::Npc, BaseStats::default()))
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.get("b").is_some());
        assert!(set.get("c").is_none());
    }
}
