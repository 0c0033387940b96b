//! Container views over reflected values

use crate::Reflect;

/// Indexed access to a fixed-size array or to the elements of a sequence
pub trait Array {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;
}

/// A growable sequence
pub trait List: Array {
    /// A fresh default-valued element of the sequence's element type.
    fn new_element(&self) -> Box<dyn Reflect>;

    /// Append an element produced by [`List::new_element`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TypeMismatch`] when `element` is not of the
    /// element type.
    fn push(&mut self, element: Box<dyn Reflect>) -> crate::Result<()>;

    fn as_array(&self) -> &dyn Array;
}

/// An associative map
pub trait Map {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in an unspecified order.
    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    /// A fresh default-valued key holder.
    fn new_key(&self) -> Box<dyn Reflect>;

    /// A fresh default-valued value holder.
    fn new_value(&self) -> Box<dyn Reflect>;

    /// Insert an entry, replacing any previous value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TypeMismatch`] when the key or value is not of
    /// the map's key or value type.
    fn insert(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> crate::Result<()>;
}

/// A single level of indirection
pub trait Pointer {
    fn is_set(&self) -> bool;

    fn get(&self) -> Option<&dyn Reflect>;

    /// The pointee, allocated with its default value first when unset.
    fn get_or_allocate(&mut self) -> &mut dyn Reflect;
}

/// A struct whose fields are addressed by declaration index or by name
pub trait Struct {
    /// Field names in declaration order; identical for every instance of a type.
    fn field_names(&self) -> &'static [&'static str];

    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn field_count(&self) -> usize {
        self.field_names().len()
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.field_names().iter().position(|field| *field == name)
    }

    fn field(&self, name: &str) -> Option<&dyn Reflect> {
        self.field_index(name).and_then(|index| self.field_at(index))
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        let index = self.field_index(name)?;
        self.field_at_mut(index)
    }
}
