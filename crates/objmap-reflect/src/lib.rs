#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # objmap-reflect
//!
//! Runtime introspection for structural value mapping.
//!
//! Rust has no reflection, so every value the mapper walks implements
//! [`Reflect`]. The trait exposes a closed set of read and write views
//! ([`ReflectRef`], [`ReflectMut`]) over a finite category enumeration
//! ([`Category`]), which is all a recursive walker needs to copy data between
//! two unrelated type graphs.
//!
//! Structs opt in with `#[derive(Reflect)]`; std scalars, strings, `Option`,
//! `Box`, arrays, `Vec`, `VecDeque`, `HashMap` and `BTreeMap` are covered here.

/// Container views: arrays, lists, maps, pointers and structs.
pub mod containers;
/// The `DynValue` interface slot.
pub mod dynamic;
/// `Reflect` implementations for std types.
mod impls;
/// The `Reflect` trait, categories and erased views.
pub mod reflect;
/// Scalar values, mutable scalar slots and the complex pair type.
pub mod scalar;

pub use containers::{Array, List, Map, Pointer, Struct};
pub use dynamic::DynValue;
pub use objmap_derive::Reflect;
pub use reflect::{Category, Reflect, ReflectMut, ReflectRef};
pub use scalar::{Complex, Scalar, ScalarKind, ScalarMut};

use thiserror::Error;

/// Errors raised by introspection operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl Error {
    /// Build a type-mismatch error from the expected and the offered type names.
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Crate-local result type for introspection operations.
pub type Result<T> = std::result::Result<T, Error>;
