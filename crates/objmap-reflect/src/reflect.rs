//! The `Reflect` trait and the erased views the mapper dispatches on

use std::any::Any;
use std::fmt;

use crate::containers::{Array, List, Map, Pointer, Struct};
use crate::scalar::{Scalar, ScalarKind, ScalarMut};
use crate::{Error, Result};

/// Runtime classification of a value, used to select a copy strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Boolean, integer, float, complex or char of a fixed width
    Scalar(ScalarKind),

    /// Owned UTF-8 string
    String,

    /// Nullable or boxed indirection to a single value
    Pointer,

    /// Type-erased slot that may hold any concrete value
    Interface,

    /// Fixed-size array
    Array,

    /// Growable sequence
    Sequence,

    /// Associative map
    Map,

    /// Struct with named fields
    Struct,

    /// Channels, function and raw pointers; never copied
    Opaque,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Scalar(kind) => write!(f, "{kind}"),
            Category::String => f.write_str("string"),
            Category::Pointer => f.write_str("pointer"),
            Category::Interface => f.write_str("interface"),
            Category::Array => f.write_str("array"),
            Category::Sequence => f.write_str("sequence"),
            Category::Map => f.write_str("map"),
            Category::Struct => f.write_str("struct"),
            Category::Opaque => f.write_str("opaque"),
        }
    }
}

/// Read-only view of a reflected value
pub enum ReflectRef<'a> {
    Scalar(Scalar),
    String(&'a str),
    /// `None` when the pointer is unset
    Pointer(Option<&'a dyn Reflect>),
    /// `None` when the slot is empty
    Interface(Option<&'a dyn Reflect>),
    Array(&'a dyn Array),
    Sequence(&'a dyn List),
    Map(&'a dyn Map),
    Struct(&'a dyn Struct),
    Opaque,
}

impl ReflectRef<'_> {
    /// Category of the viewed value.
    pub fn category(&self) -> Category {
        match self {
            ReflectRef::Scalar(value) => Category::Scalar(value.kind()),
            ReflectRef::String(_) => Category::String,
            ReflectRef::Pointer(_) => Category::Pointer,
            ReflectRef::Interface(_) => Category::Interface,
            ReflectRef::Array(_) => Category::Array,
            ReflectRef::Sequence(_) => Category::Sequence,
            ReflectRef::Map(_) => Category::Map,
            ReflectRef::Struct(_) => Category::Struct,
            ReflectRef::Opaque => Category::Opaque,
        }
    }
}

/// Mutable view of a reflected value
pub enum ReflectMut<'a> {
    Scalar(ScalarMut<'a>),
    String(&'a mut String),
    Pointer(&'a mut dyn Pointer),
    /// `None` when the slot is empty
    Interface(Option<&'a mut dyn Reflect>),
    Array(&'a mut dyn Array),
    Sequence(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Struct(&'a mut dyn Struct),
    Opaque,
}

/// A value whose shape can be inspected and written at runtime.
///
/// Implement it with `#[derive(Reflect)]` for structs. Hand-written impls must
/// keep `reflect_ref` and `reflect_mut` in the same category and, for structs,
/// report the same field names for every instance of the type.
pub trait Reflect: Any {
    /// Fully qualified name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Category of the type, available without an instance.
    fn static_category() -> Category
    where
        Self: Sized;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    /// Read-only view of this value.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Mutable view of this value.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Replace `self` with `value`, which must be of the identical concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when `value` has a different type.
    fn assign(&mut self, value: Box<dyn Reflect>) -> Result<()>;
}

impl dyn Reflect {
    /// Category of the concrete value behind this trait object.
    pub fn category(&self) -> Category {
        self.reflect_ref().category()
    }

    /// Whether the concrete value is a `T`.
    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Unbox the concrete value as a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] when the boxed value is not a `T`.
    pub fn take<T: Reflect>(self: Box<Self>) -> Result<T> {
        let found = self.type_name();
        self.into_any()
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::type_mismatch(std::any::type_name::<T>(), found))
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.type_name())
    }
}

/// Implements the erasure boilerplate of [`Reflect`] for `Self`.
///
/// Used by the std impls in this crate; derived impls expand the same items.
#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_erasure {
    () => {
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }

        fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
            self
        }

        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        fn as_reflect_mut(&mut self) -> &mut dyn $crate::Reflect {
            self
        }

        fn assign(
            &mut self,
            value: ::std::boxed::Box<dyn $crate::Reflect>,
        ) -> $crate::Result<()> {
            *self = value.take::<Self>()?;
            Ok(())
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast_through_trait_object() {
        let value: Box<dyn Reflect> = Box::new(7_i32);
        assert!(value.is::<i32>());
        assert!(!value.is::<i64>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&7));
        assert_eq!(value.take::<i32>().unwrap(), 7);
    }

    #[test]
    fn test_take_wrong_type() {
        let value: Box<dyn Reflect> = Box::new(String::from("x"));
        let err = value.take::<u8>().unwrap_err();
        assert_eq!(
            err,
            Error::type_mismatch("u8", std::any::type_name::<String>())
        );
    }

    #[test]
    fn test_assign_same_type() {
        let mut slot = 1_u16;
        slot.assign(Box::new(9_u16)).unwrap();
        assert_eq!(slot, 9);
    }

    #[test]
    fn test_assign_rejects_other_type() {
        let mut slot = 1_u16;
        assert!(slot.assign(Box::new(9_u32)).is_err());
        assert_eq!(slot, 1);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Scalar(ScalarKind::I64).to_string(), "i64");
        assert_eq!(Category::Sequence.to_string(), "sequence");
    }
}
