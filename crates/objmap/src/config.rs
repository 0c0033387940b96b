//! Field override registry
//!
//! Overrides are scoped to a (source struct type, destination struct type)
//! pair and keyed by destination field name.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use objmap_reflect::{Category, Reflect};

use crate::profile::FieldMapProfile;
use crate::{BoxError, ConfigError};

/// Produces a destination field value from the whole source struct
pub type ComputeFn =
    Arc<dyn Fn(&dyn Reflect) -> Result<Box<dyn Reflect>, BoxError> + Send + Sync + 'static>;

fn boxed_compute<F, R, E>(f: F) -> ComputeFn
where
    F: Fn(&dyn Reflect) -> Result<R, E> + Send + Sync + 'static,
    R: Reflect,
    E: Into<BoxError>,
{
    Arc::new(move |source: &dyn Reflect| -> Result<Box<dyn Reflect>, BoxError> {
        f(source)
            .map(|value| Box::new(value) as Box<dyn Reflect>)
            .map_err(Into::into)
    })
}

/// How one destination field is produced
#[derive(Clone, Default)]
pub struct FieldMapConfig {
    /// Source field to read; the destination name when `None` or empty
    pub source: Option<String>,

    /// Destination field this override applies to (required)
    pub destination: String,

    /// Computes the value from the whole source, taking precedence over `source`
    pub compute: Option<ComputeFn>,
}

impl FieldMapConfig {
    /// Override for `destination` with no rename and no compute function.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            source: None,
            destination: destination.into(),
            compute: None,
        }
    }

    /// Read `destination` from the source field named `source`.
    pub fn rename(destination: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(destination).with_source(source)
    }

    /// Produce `destination` by calling `f` with the whole source value.
    ///
    /// The returned value is assigned without further conversion, so it must
    /// have exactly the destination field's type.
    pub fn computed<F, R, E>(destination: impl Into<String>, f: F) -> Self
    where
        F: Fn(&dyn Reflect) -> Result<R, E> + Send + Sync + 'static,
        R: Reflect,
        E: Into<BoxError>,
    {
        Self::new(destination).with_compute_fn(boxed_compute(f))
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_compute_fn(mut self, compute: ComputeFn) -> Self {
        self.compute = Some(compute);
        self
    }

    /// Name of the source field read when no compute function is set.
    pub fn source_name(&self) -> &str {
        match self.source.as_deref() {
            Some(source) if !source.is_empty() => source,
            _ => &self.destination,
        }
    }
}

impl fmt::Debug for FieldMapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapConfig")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("has_compute", &self.compute.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    fn of<T: Reflect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    fn of_value(value: &dyn Reflect) -> Self {
        Self {
            id: Any::type_id(value.as_any()),
            name: value.type_name(),
        }
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Identifies a (source type, destination type) pair in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StructTypePairKey {
    source: TypeKey,
    destination: TypeKey,
}

impl StructTypePairKey {
    pub fn of<S: Reflect, D: Reflect>() -> Self {
        Self {
            source: TypeKey::of::<S>(),
            destination: TypeKey::of::<D>(),
        }
    }

    /// Key for the concrete types behind two values.
    pub fn for_values(source: &dyn Reflect, destination: &dyn Reflect) -> Self {
        Self {
            source: TypeKey::of_value(source),
            destination: TypeKey::of_value(destination),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name
    }

    pub fn destination_name(&self) -> &'static str {
        self.destination.name
    }
}

impl fmt::Display for StructTypePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source.name, self.destination.name)
    }
}

/// Registry of field overrides and named compute functions.
///
/// Built during setup and read-only afterwards: [`crate::Mapper`] needs
/// `&mut self` to change it, so a mapper shared across threads cannot be
/// reconfigured.
#[derive(Clone, Default)]
pub struct MapperConfig {
    field_maps: HashMap<StructTypePairKey, HashMap<String, FieldMapConfig>>,
    computes: HashMap<String, ComputeFn>,
}

impl MapperConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register overrides for mapping `S` into `D`.
    ///
    /// Later overrides for the same destination field replace earlier ones.
    /// Nothing is registered when any override is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotStruct`] when `S` or `D` is not a struct and
    /// [`ConfigError::DestinationRequired`] when an override has an empty
    /// destination name.
    pub fn configure<S: Reflect, D: Reflect>(
        &mut self,
        overrides: impl IntoIterator<Item = FieldMapConfig>,
    ) -> Result<(), ConfigError> {
        let key = StructTypePairKey::of::<S, D>();
        if S::static_category() != Category::Struct || D::static_category() != Category::Struct {
            return Err(ConfigError::NotStruct {
                source_type: key.source_name().to_string(),
                destination_type: key.destination_name().to_string(),
            });
        }

        let overrides: Vec<FieldMapConfig> = overrides.into_iter().collect();
        if let Some(index) = overrides.iter().position(|cfg| cfg.destination.is_empty()) {
            return Err(ConfigError::DestinationRequired { index });
        }

        let count = overrides.len();
        let fields = self.field_maps.entry(key).or_default();
        for cfg in overrides {
            fields.insert(cfg.destination.clone(), cfg);
        }

        tracing::debug!(pair = %key, overrides = count, "registered field overrides");
        Ok(())
    }

    /// Register the rules of a declarative profile for mapping `S` into `D`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCompute`] when a rule names a compute
    /// function that was not registered, plus the errors of
    /// [`MapperConfig::configure`].
    pub fn configure_profile<S: Reflect, D: Reflect>(
        &mut self,
        profile: &FieldMapProfile,
    ) -> Result<(), ConfigError> {
        let mut overrides = Vec::with_capacity(profile.fields.len());
        for rule in &profile.fields {
            let mut cfg = FieldMapConfig::new(rule.destination.clone());
            cfg.source.clone_from(&rule.source);
            if let Some(name) = &rule.compute {
                let compute = self
                    .compute(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownCompute { name: name.clone() })?;
                cfg.compute = Some(compute);
            }
            overrides.push(cfg);
        }
        self.configure::<S, D>(overrides)
    }

    /// Parse a YAML profile and register it for mapping `S` into `D`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Profile`] when the YAML cannot be parsed, plus the
    /// errors of [`MapperConfig::configure_profile`].
    pub fn configure_yaml<S: Reflect, D: Reflect>(&mut self, yaml: &str) -> Result<(), ConfigError> {
        let profile = FieldMapProfile::parse(yaml)?;
        self.configure_profile::<S, D>(&profile)
    }

    /// Register a named compute function that profiles can refer to.
    pub fn register_compute<F, R, E>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&dyn Reflect) -> Result<R, E> + Send + Sync + 'static,
        R: Reflect,
        E: Into<BoxError>,
    {
        self.register_compute_fn(name, boxed_compute(f))
    }

    pub fn register_compute_fn(&mut self, name: impl Into<String>, compute: ComputeFn) -> &mut Self {
        let name = name.into();
        tracing::debug!(name = %name, "registered compute function");
        self.computes.insert(name, compute);
        self
    }

    #[must_use]
    pub fn compute(&self, name: &str) -> Option<&ComputeFn> {
        self.computes.get(name)
    }

    /// Override registered for `destination` under `key`.
    #[must_use]
    pub fn field_map(&self, key: &StructTypePairKey, destination: &str) -> Option<&FieldMapConfig> {
        self.field_maps.get(key).and_then(|fields| fields.get(destination))
    }

    /// All overrides registered under `key`.
    #[must_use]
    pub fn field_maps(&self, key: &StructTypePairKey) -> Option<&HashMap<String, FieldMapConfig>> {
        self.field_maps.get(key)
    }

    /// Number of configured type pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.field_maps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_maps.is_empty()
    }
}

impl fmt::Debug for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.field_maps.keys().map(ToString::to_string).collect();
        let computes: Vec<&String> = self.computes.keys().collect();
        f.debug_struct("MapperConfig")
            .field("pairs", &pairs)
            .field("computes", &computes)
            .finish()
    }
}

/// Register overrides for mapping `S` into `D` on `config`.
///
/// # Errors
///
/// See [`MapperConfig::configure`].
pub fn configure_field_maps<S: Reflect, D: Reflect>(
    config: &mut MapperConfig,
    overrides: impl IntoIterator<Item = FieldMapConfig>,
) -> Result<(), ConfigError> {
    config.configure::<S, D>(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use objmap_reflect::Reflect;

    #[derive(Reflect, Default)]
    struct Source {
        int: i64,
    }

    #[derive(Reflect, Default)]
    struct Destination {
        int_field: i64,
    }

    #[test]
    fn test_rejects_non_struct_types() {
        let mut config = MapperConfig::new();
        let err = config
            .configure::<i64, Destination>([FieldMapConfig::rename("int_field", "int")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotStruct { .. }));

        let err = config
            .configure::<Source, Vec<i64>>([FieldMapConfig::rename("int_field", "int")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotStruct { .. }));
        assert!(config.is_empty());
    }

    #[test]
    fn test_rejects_missing_destination_without_partial_apply() {
        let mut config = MapperConfig::new();
        let err = config
            .configure::<Source, Destination>([
                FieldMapConfig::rename("int_field", "int"),
                FieldMapConfig::new(""),
            ])
            .unwrap_err();
        assert!(matches!(err, ConfigError::DestinationRequired { index: 1 }));
        assert!(config.is_empty());
    }

    #[test]
    fn test_later_override_replaces_earlier() {
        let mut config = MapperConfig::new();
        config
            .configure::<Source, Destination>([FieldMapConfig::rename("int_field", "first")])
            .unwrap();
        configure_field_maps::<Source, Destination>(
            &mut config,
            [FieldMapConfig::rename("int_field", "second")],
        )
        .unwrap();

        let key = StructTypePairKey::of::<Source, Destination>();
        let cfg = config.field_map(&key, "int_field").unwrap();
        assert_eq!(cfg.source_name(), "second");
        assert_eq!(config.len(), 1);
        assert_eq!(config.field_maps(&key).unwrap().len(), 1);
    }

    #[test]
    fn test_pair_key_is_directional() {
        let forward = StructTypePairKey::of::<Source, Destination>();
        let backward = StructTypePairKey::of::<Destination, Source>();
        assert_ne!(forward, backward);

        let source = Source::default();
        let destination = Destination::default();
        assert_eq!(StructTypePairKey::for_values(&source, &destination), forward);
    }

    #[test]
    fn test_empty_source_falls_back_to_destination_name() {
        let cfg = FieldMapConfig::new("int_field").with_source("");
        assert_eq!(cfg.source_name(), "int_field");
        assert_eq!(FieldMapConfig::rename("a", "b").source_name(), "b");
    }

    #[test]
    fn test_computed_boxes_typed_result() {
        let cfg = FieldMapConfig::computed("int_field", |_source: &dyn Reflect| {
            Ok::<_, BoxError>(2_i64)
        });
        let compute = cfg.compute.unwrap();
        let value = compute(&Source::default()).unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&2));
    }
}
