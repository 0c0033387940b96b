//! Mapper runtime
//!
//! The walker dispatches on the destination's category and recurses
//! depth-first, pre-order. There is no cycle detection: self-referential
//! graphs are not supported.

use objmap_reflect::{Array, List, Map, Reflect, ReflectMut, ReflectRef, Struct};

use crate::config::{FieldMapConfig, MapperConfig, StructTypePairKey};
use crate::path::{FieldPath, Segment};
use crate::plan::{FieldPlan, PlanCache};
use crate::profile::FieldMapProfile;
use crate::{BoxError, ConfigError, MapError, Result};

/// Copies compatible data from a source value into a destination value.
///
/// Configuration methods take `&mut self`; once the mapper is shared
/// (`&Mapper`, `Arc<Mapper>`) its registry is frozen and `map` may be called
/// from any number of threads.
#[derive(Debug, Default)]
pub struct Mapper {
    config: MapperConfig,
    plans: PlanCache,
}

impl Mapper {
    /// Create a mapper with an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper that owns `config`
    #[must_use]
    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            plans: PlanCache::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Register field overrides for mapping `S` into `D`.
    ///
    /// # Errors
    ///
    /// See [`MapperConfig::configure`].
    pub fn configure_field_maps<S: Reflect, D: Reflect>(
        &mut self,
        overrides: impl IntoIterator<Item = FieldMapConfig>,
    ) -> std::result::Result<(), ConfigError> {
        let result = self.config.configure::<S, D>(overrides);
        self.plans.clear();
        result
    }

    /// Register a declarative profile for mapping `S` into `D`.
    ///
    /// # Errors
    ///
    /// See [`MapperConfig::configure_profile`].
    pub fn configure_profile<S: Reflect, D: Reflect>(
        &mut self,
        profile: &FieldMapProfile,
    ) -> std::result::Result<(), ConfigError> {
        let result = self.config.configure_profile::<S, D>(profile);
        self.plans.clear();
        result
    }

    /// Parse and register a YAML profile for mapping `S` into `D`.
    ///
    /// # Errors
    ///
    /// See [`MapperConfig::configure_yaml`].
    pub fn configure_yaml<S: Reflect, D: Reflect>(
        &mut self,
        yaml: &str,
    ) -> std::result::Result<(), ConfigError> {
        let result = self.config.configure_yaml::<S, D>(yaml);
        self.plans.clear();
        result
    }

    /// Register a named compute function for use in profiles.
    pub fn register_compute<F, R, E>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&dyn Reflect) -> std::result::Result<R, E> + Send + Sync + 'static,
        R: Reflect,
        E: Into<BoxError>,
    {
        self.config.register_compute(name, f);
        self
    }

    /// Number of struct plans resolved and cached so far.
    #[must_use]
    pub fn cached_plans(&self) -> usize {
        self.plans.len()
    }

    /// Copy `source` into `destination`.
    ///
    /// Fields written before a failure stay written; there is no rollback.
    ///
    /// # Errors
    ///
    /// Returns the first [`MapError`] met during the walk. Errors from compute
    /// functions are returned unchanged as [`MapError::Custom`].
    pub fn map<S, D>(&self, source: &S, destination: &mut D) -> Result<()>
    where
        S: Reflect + ?Sized,
        D: Reflect + ?Sized,
    {
        let mut path = FieldPath::new();
        let result = self.map_value(source.as_reflect(), destination.as_reflect_mut(), &mut path);
        if let Err(err) = &result {
            tracing::debug!(
                source = source.type_name(),
                destination = destination.type_name(),
                error = %err,
                "map failed"
            );
        }
        result
    }

    /// Build a default `D` and copy `source` into it.
    ///
    /// # Errors
    ///
    /// See [`Mapper::map`].
    pub fn map_into<D, S>(&self, source: &S) -> Result<D>
    where
        D: Reflect + Default,
        S: Reflect + ?Sized,
    {
        let mut destination = D::default();
        self.map(source, &mut destination)?;
        Ok(destination)
    }

    fn map_value(
        &self,
        source: &dyn Reflect,
        destination: &mut dyn Reflect,
        path: &mut FieldPath,
    ) -> Result<()> {
        let Some(source) = resolve_source(source) else {
            return Ok(());
        };
        let destination_type = destination.type_name();
        let pair = StructTypePairKey::for_values(source, destination.as_reflect());

        match destination.reflect_mut() {
            ReflectMut::Scalar(slot) => {
                let assigned = match source.reflect_ref() {
                    ReflectRef::Scalar(value) => slot.set(value),
                    _ => false,
                };
                if assigned {
                    Ok(())
                } else {
                    Err(mismatch(path, destination_type, source))
                }
            }
            ReflectMut::String(slot) => match source.reflect_ref() {
                ReflectRef::String(value) => {
                    value.clone_into(slot);
                    Ok(())
                }
                _ => Err(mismatch(path, destination_type, source)),
            },
            ReflectMut::Opaque => Ok(()),
            ReflectMut::Pointer(pointer) => self.map_value(source, pointer.get_or_allocate(), path),
            ReflectMut::Interface(Some(held)) => self.map_value(source, held, path),
            ReflectMut::Interface(None) => Err(MapError::unaddressable(
                path.to_string(),
                format!("empty interface slot cannot receive {}", source.type_name()),
            )),
            ReflectMut::Array(array) => self.map_array(source, array, destination_type, path),
            ReflectMut::Sequence(list) => self.map_sequence(source, list, destination_type, path),
            ReflectMut::Map(map) => self.map_map(source, map, destination_type, path),
            ReflectMut::Struct(target) => {
                self.map_struct(source, target, &pair, destination_type, path)
            }
        }
    }

    fn map_array(
        &self,
        source: &dyn Reflect,
        array: &mut dyn Array,
        destination_type: &'static str,
        path: &mut FieldPath,
    ) -> Result<()> {
        let items = source_items(source).ok_or_else(|| mismatch(path, destination_type, source))?;
        let (capacity, required) = (array.len(), items.len());
        if required > capacity {
            return Err(MapError::InsufficientCapacity {
                path: path.to_string(),
                capacity,
                required,
            });
        }

        for index in 0..required {
            let (Some(item), Some(slot)) = (items.get(index), array.get_mut(index)) else {
                return Err(MapError::unsupported(path.to_string(), destination_type));
            };
            path.push(Segment::Index(index));
            let result = self.map_value(item, slot, path);
            path.pop();
            result?;
        }
        Ok(())
    }

    fn map_sequence(
        &self,
        source: &dyn Reflect,
        list: &mut dyn List,
        destination_type: &'static str,
        path: &mut FieldPath,
    ) -> Result<()> {
        let items = source_items(source).ok_or_else(|| mismatch(path, destination_type, source))?;

        for index in 0..items.len() {
            let Some(item) = items.get(index) else {
                return Err(MapError::unsupported(path.to_string(), source.type_name()));
            };
            let mut element = list.new_element();
            path.push(Segment::Index(list.len()));
            let result = self
                .map_value(item, &mut *element, path)
                .and_then(|()| list.push(element).map_err(|e| reflect_error(path, e)));
            path.pop();
            result?;
        }
        Ok(())
    }

    fn map_map(
        &self,
        source: &dyn Reflect,
        map: &mut dyn Map,
        destination_type: &'static str,
        path: &mut FieldPath,
    ) -> Result<()> {
        let ReflectRef::Map(entries) = source.reflect_ref() else {
            return Err(mismatch(path, destination_type, source));
        };

        for (position, (key, value)) in entries.iter().enumerate() {
            path.push(Segment::Entry(position));
            let result = self.map_entry(key, value, map, path);
            path.pop();
            result?;
        }
        Ok(())
    }

    fn map_entry(
        &self,
        key: &dyn Reflect,
        value: &dyn Reflect,
        map: &mut dyn Map,
        path: &mut FieldPath,
    ) -> Result<()> {
        let mut new_key = map.new_key();
        self.map_value(key, &mut *new_key, path)?;
        let mut new_value = map.new_value();
        self.map_value(value, &mut *new_value, path)?;
        map.insert(new_key, new_value)
            .map_err(|e| reflect_error(path, e))
    }

    fn map_struct(
        &self,
        source: &dyn Reflect,
        target: &mut dyn Struct,
        pair: &StructTypePairKey,
        destination_type: &'static str,
        path: &mut FieldPath,
    ) -> Result<()> {
        let ReflectRef::Struct(fields) = source.reflect_ref() else {
            return Err(mismatch(path, destination_type, source));
        };
        let plan = self.plans.get_or_resolve(&self.config, pair, fields, &*target);

        for field in plan.fields() {
            let name = field.name();
            match field {
                FieldPlan::Copy { source: None, .. } => {
                    tracing::trace!(pair = %pair, field = name, "no matching source field, skipped");
                }
                FieldPlan::Copy {
                    source: Some(index),
                    ..
                } => {
                    let (Some(value), Some(slot)) =
                        (fields.field_at(*index), target.field_at_mut(field.destination()))
                    else {
                        return Err(MapError::unsupported(path.to_string(), destination_type));
                    };
                    path.push(Segment::Field(name));
                    let result = self.map_value(value, slot, path);
                    path.pop();
                    result?;
                }
                FieldPlan::Compute { compute, .. } => {
                    tracing::trace!(pair = %pair, field = name, "computing field value");
                    let value = (**compute)(source).map_err(MapError::Custom)?;
                    let Some(slot) = target.field_at_mut(field.destination()) else {
                        return Err(MapError::unsupported(path.to_string(), destination_type));
                    };
                    path.push(Segment::Field(name));
                    let result = slot.assign(value).map_err(|e| reflect_error(path, e));
                    path.pop();
                    result?;
                }
            }
        }
        Ok(())
    }
}

/// Follow pointer and interface indirections; `None` when one of them is unset.
fn resolve_source(mut source: &dyn Reflect) -> Option<&dyn Reflect> {
    loop {
        match source.reflect_ref() {
            ReflectRef::Pointer(inner) | ReflectRef::Interface(inner) => source = inner?,
            _ => return Some(source),
        }
    }
}

/// Element access for array and sequence sources.
fn source_items(source: &dyn Reflect) -> Option<&dyn Array> {
    match source.reflect_ref() {
        ReflectRef::Array(items) => Some(items),
        ReflectRef::Sequence(items) => Some(items.as_array()),
        _ => None,
    }
}

fn mismatch(path: &FieldPath, expected: &str, source: &dyn Reflect) -> MapError {
    MapError::type_mismatch(path.to_string(), expected, source.type_name())
}

fn reflect_error(path: &FieldPath, err: objmap_reflect::Error) -> MapError {
    match err {
        objmap_reflect::Error::TypeMismatch { expected, found } => {
            MapError::type_mismatch(path.to_string(), expected, found)
        }
    }
}
