//! Struct layout plans
//!
//! For a (source type, destination type) pair, the plan lists every
//! destination field in declaration order together with where its value
//! comes from. Plans only depend on type metadata and the registry, so they
//! are resolved once per pair and cached.

use std::sync::Arc;

use dashmap::DashMap;
use objmap_reflect::Struct;

use crate::config::{ComputeFn, MapperConfig, StructTypePairKey};

/// Where one destination field gets its value
#[derive(Clone)]
pub enum FieldPlan {
    /// Copy from the source field at `source`; skipped when the source has no such field
    Copy {
        destination: usize,
        name: &'static str,
        source: Option<usize>,
    },
    /// Assign the result of a compute function called with the whole source
    Compute {
        destination: usize,
        name: &'static str,
        compute: ComputeFn,
    },
}

impl FieldPlan {
    pub fn destination(&self) -> usize {
        match self {
            FieldPlan::Copy { destination, .. } | FieldPlan::Compute { destination, .. } => {
                *destination
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldPlan::Copy { name, .. } | FieldPlan::Compute { name, .. } => name,
        }
    }
}

impl std::fmt::Debug for FieldPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldPlan::Copy {
                destination,
                name,
                source,
            } => f
                .debug_struct("Copy")
                .field("destination", destination)
                .field("name", name)
                .field("source", source)
                .finish(),
            FieldPlan::Compute {
                destination, name, ..
            } => f
                .debug_struct("Compute")
                .field("destination", destination)
                .field("name", name)
                .finish(),
        }
    }
}

/// Ordered field plans for one type pair
#[derive(Debug, Clone)]
pub struct StructPlan {
    fields: Vec<FieldPlan>,
}

impl StructPlan {
    /// Resolve the plan for mapping `source` into `destination`.
    pub fn resolve(
        config: &MapperConfig,
        key: &StructTypePairKey,
        source: &dyn Struct,
        destination: &dyn Struct,
    ) -> Self {
        let fields = destination
            .field_names()
            .iter()
            .enumerate()
            .map(|(index, &name)| match config.field_map(key, name) {
                Some(cfg) => match &cfg.compute {
                    Some(compute) => FieldPlan::Compute {
                        destination: index,
                        name,
                        compute: Arc::clone(compute),
                    },
                    None => FieldPlan::Copy {
                        destination: index,
                        name,
                        source: source.field_index(cfg.source_name()),
                    },
                },
                None => FieldPlan::Copy {
                    destination: index,
                    name,
                    source: source.field_index(name),
                },
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldPlan] {
        &self.fields
    }
}

/// Concurrent cache of resolved plans, keyed by type pair
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: DashMap<StructTypePairKey, Arc<StructPlan>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached plan for `key`, resolving and caching it on first use.
    pub fn get_or_resolve(
        &self,
        config: &MapperConfig,
        key: &StructTypePairKey,
        source: &dyn Struct,
        destination: &dyn Struct,
    ) -> Arc<StructPlan> {
        if let Some(plan) = self.plans.get(key) {
            return Arc::clone(plan.value());
        }

        let plan = Arc::new(StructPlan::resolve(config, key, source, destination));
        tracing::trace!(pair = %key, fields = plan.fields.len(), "resolved struct plan");
        self.plans.insert(*key, Arc::clone(&plan));
        plan
    }

    /// Drop every cached plan; required after the registry changes.
    pub fn clear(&self) {
        self.plans.clear();
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldMapConfig;
    use crate::BoxError;
    use objmap_reflect::{Reflect, ReflectRef};

    #[derive(Reflect, Default)]
    struct Source {
        int: i64,
        label: String,
    }

    #[derive(Reflect, Default)]
    struct Destination {
        label: String,
        count: i64,
        extra: bool,
        derived: i64,
    }

    fn view(value: &dyn Reflect) -> &dyn Struct {
        match value.reflect_ref() {
            ReflectRef::Struct(s) => s,
            _ => panic!("expected struct"),
        }
    }

    #[test]
    fn test_resolve_by_name_rename_and_compute() {
        let mut config = MapperConfig::new();
        config
            .configure::<Source, Destination>([
                FieldMapConfig::rename("count", "int"),
                FieldMapConfig::computed("derived", |_: &dyn Reflect| Ok::<_, BoxError>(1_i64)),
            ])
            .unwrap();
        let key = StructTypePairKey::of::<Source, Destination>();
        let plan = StructPlan::resolve(
            &config,
            &key,
            view(&Source::default()),
            view(&Destination::default()),
        );

        let fields = plan.fields();
        assert_eq!(fields.len(), 4);
        assert!(matches!(fields[0], FieldPlan::Copy { destination: 0, source: Some(1), .. }));
        assert!(matches!(fields[1], FieldPlan::Copy { destination: 1, source: Some(0), .. }));
        assert!(matches!(fields[2], FieldPlan::Copy { destination: 2, source: None, .. }));
        assert!(matches!(fields[3], FieldPlan::Compute { destination: 3, .. }));
        assert_eq!(fields[3].name(), "derived");
        assert_eq!(fields[1].destination(), 1);
    }

    #[test]
    fn test_cache_reuses_and_clears() {
        let config = MapperConfig::new();
        let key = StructTypePairKey::of::<Source, Destination>();
        let cache = PlanCache::new();
        let source = Source::default();
        let destination = Destination::default();

        let first = cache.get_or_resolve(&config, &key, view(&source), view(&destination));
        let second = cache.get_or_resolve(&config, &key, view(&source), view(&destination));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
