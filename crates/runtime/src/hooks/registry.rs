//! Hook registry for managing start filters.

use std::sync::Arc;

use status_core::{ApplyRequest, EntityId};
use tracing::debug;

use super::StartFilter;

/// Registry of start filters, kept in priority order.
#[derive(Clone, Default)]
pub struct HookRegistry {
    filters: Arc<[Arc<dyn StartFilter>]>,
}

impl HookRegistry {
    /// Creates a registry; filters are sorted by priority (lower values first).
    ///
    /// Equal priorities keep their registration order.
    pub fn new(mut filters: Vec<Arc<dyn StartFilter>>) -> Self {
        filters.sort_by_key(|f| f.priority());
        Self {
            filters: filters.into(),
        }
    }

    /// Runs the filters in order; false on the first veto.
    pub fn admit(&self, target: EntityId, request: &ApplyRequest) -> bool {
        for filter in self.filters.iter() {
            if !filter.admit(target, request) {
                debug!(
                    target: "runtime::hooks",
                    filter = filter.name(),
                    entity = %target,
                    kind = %request.kind,
                    "start vetoed"
                );
                return false;
            }
        }
        true
    }

    /// Returns the number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if no filters are registered.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns an iterator over filter names and priorities (for debugging).
    pub fn filters(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.filters.iter().map(|f| (f.name(), f.priority()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use status_core::EffectKind;

    use super::*;

    struct Recording {
        name: &'static str,
        priority: i32,
        verdict: bool,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    impl StartFilter for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn admit(&self, _target: EntityId, _request: &ApplyRequest) -> bool {
            self.seen.lock().unwrap().push(self.name);
            self.verdict
        }
    }

    fn filter(
        name: &'static str,
        priority: i32,
        verdict: bool,
        seen: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<dyn StartFilter> {
        Arc::new(Recording {
            name,
            priority,
            verdict,
            seen: Arc::clone(seen),
        })
    }

    #[test]
    fn filters_run_in_priority_order_until_veto() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = HookRegistry::new(vec![
            filter("late", 10, true, &seen),
            filter("veto", 0, false, &seen),
            filter("early", -5, true, &seen),
        ]);

        let request = ApplyRequest::new(EffectKind::Stun);
        assert!(!registry.admit(EntityId(1), &request));
        assert_eq!(*seen.lock().unwrap(), vec!["early", "veto"]);
        assert_eq!(
            registry.filters().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["early", "veto", "late"]
        );
    }

    #[test]
    fn empty_registry_admits_everything() {
        let registry = HookRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.admit(EntityId(1), &ApplyRequest::new(EffectKind::Curse)));
    }
}
