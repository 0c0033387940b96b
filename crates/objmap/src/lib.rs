//! # objmap
//!
//! Runtime structural value mapper.
//!
//! [`Mapper::map`] walks a source and a destination value in lockstep and
//! copies compatible data from one into the other: scalars of the exact same
//! kind, strings, pointers, interface slots, arrays, sequences, maps and
//! structs, nested to any depth. Struct fields are matched by name. A
//! [`MapperConfig`] registry can override how individual destination fields
//! are produced, either by reading a differently named source field or by
//! computing the value from the whole source struct.
//!
//! ## Example Usage
//!
//! ```rust
//! use objmap::{Mapper, Reflect};
//!
//! #[derive(Reflect, Default)]
//! #[reflect(crate = "objmap::reflect")]
//! struct UserDto {
//!     id: i64,
//!     name: String,
//! }
//!
//! #[derive(Reflect, Default, Debug, PartialEq)]
//! #[reflect(crate = "objmap::reflect")]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let dto = UserDto { id: 1, name: "John".to_string() };
//! let mut user = User::default();
//! Mapper::new().map(&dto, &mut user).unwrap();
//! assert_eq!(user, User { id: 1, name: "John".to_string() });
//! ```

pub mod config;
pub mod mapper;
pub mod path;
pub mod plan;
pub mod profile;

pub use config::{configure_field_maps, ComputeFn, FieldMapConfig, MapperConfig, StructTypePairKey};
pub use mapper::Mapper;
pub use profile::{FieldMapProfile, FieldRule, ProfileError};

/// The introspection layer, re-exported for derive users: `#[reflect(crate = "objmap::reflect")]`.
pub use objmap_reflect as reflect;
pub use objmap_reflect::{Category, DynValue, Reflect};

use thiserror::Error;

/// Boxed error produced by caller-supplied compute functions
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure classes of a map call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TypeMismatch,
    InsufficientCapacity,
    Unaddressable,
    Unsupported,
    Custom,
}

/// Errors that abort a map call
#[derive(Error, Debug)]
pub enum MapError {
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("insufficient capacity at {path}: destination holds {capacity}, source has {required}")]
    InsufficientCapacity {
        path: String,
        capacity: usize,
        required: usize,
    },

    #[error("unaddressable destination at {path}: {reason}")]
    Unaddressable { path: String, reason: String },

    #[error("unsupported type at {path}: {type_name}")]
    Unsupported { path: String, type_name: String },

    /// Error returned by a compute function, unchanged
    #[error(transparent)]
    Custom(BoxError),
}

impl MapError {
    /// Build a type-mismatch error at `path`.
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build an unaddressable-destination error at `path`.
    pub fn unaddressable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unaddressable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build an unsupported-type error at `path`.
    pub fn unsupported(path: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            path: path.into(),
            type_name: type_name.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            MapError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            MapError::InsufficientCapacity { .. } => ErrorKind::InsufficientCapacity,
            MapError::Unaddressable { .. } => ErrorKind::Unaddressable,
            MapError::Unsupported { .. } => ErrorKind::Unsupported,
            MapError::Custom(_) => ErrorKind::Custom,
        }
    }

    /// Field path the error occurred at, when it has one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            MapError::TypeMismatch { path, .. }
            | MapError::InsufficientCapacity { path, .. }
            | MapError::Unaddressable { path, .. }
            | MapError::Unsupported { path, .. } => Some(path),
            MapError::Custom(_) => None,
        }
    }

    /// The compute function's error, when this is [`MapError::Custom`].
    #[must_use]
    pub fn custom(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            MapError::Custom(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Errors raised while registering field overrides
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("source and destination types must be structs: {source_type} -> {destination_type}")]
    NotStruct {
        source_type: String,
        destination_type: String,
    },

    #[error("field override #{index} has no destination field name")]
    DestinationRequired { index: usize },

    #[error("unknown compute function '{name}'")]
    UnknownCompute { name: String },

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Crate-local result type for map calls.
pub type Result<T> = std::result::Result<T, MapError>;
