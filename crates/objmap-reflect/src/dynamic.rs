//! Type-erased interface slot

use crate::{Category, Reflect, ReflectMut, ReflectRef};

/// A slot that may hold a value of any reflected type.
///
/// As a source it is transparent: the held value is read in its place. As a
/// destination it is a window onto the value it already holds; an empty slot
/// carries no type information and cannot be populated by the mapper.
#[derive(Debug, Default)]
pub struct DynValue(Option<Box<dyn Reflect>>);

impl DynValue {
    pub fn new<T: Reflect>(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&dyn Reflect> {
        self.0.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.0.as_deref_mut()
    }

    /// Typed access to the held value.
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.get().and_then(|value| value.downcast_ref::<T>())
    }

    pub fn set<T: Reflect>(&mut self, value: T) {
        self.0 = Some(Box::new(value));
    }

    pub fn take(&mut self) -> Option<Box<dyn Reflect>> {
        self.0.take()
    }
}

impl From<Box<dyn Reflect>> for DynValue {
    fn from(value: Box<dyn Reflect>) -> Self {
        Self(Some(value))
    }
}

impl Reflect for DynValue {
    fn static_category() -> Category {
        Category::Interface
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Interface(self.get())
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Interface(self.get_mut())
    }

    crate::__reflect_erasure!();
}
