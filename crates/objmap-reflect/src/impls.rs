use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::sync::mpsc::{Receiver, Sender, SyncSender};

use crate::containers::{Array, List, Map, Pointer};
use crate::scalar::{Complex, Scalar, ScalarKind, ScalarMut};
use crate::{Category, Reflect, ReflectMut, ReflectRef};

// Scalars

macro_rules! impl_scalar {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn static_category() -> Category {
                    Category::Scalar(ScalarKind::$variant)
                }

                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Scalar(Scalar::$variant(*self))
                }

                fn reflect_mut(&mut self) -> ReflectMut<'_> {
                    ReflectMut::Scalar(ScalarMut::$variant(self))
                }

                crate::__reflect_erasure!();
            }
        )*
    };
}

impl_scalar! {
    Bool => bool,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    I128 => i128,
    Isize => isize,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    U128 => u128,
    Usize => usize,
    F32 => f32,
    F64 => f64,
    C32 => Complex<f32>,
    C64 => Complex<f64>,
    Char => char,
}

impl Reflect for String {
    fn static_category() -> Category {
        Category::String
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::String(self.as_str())
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::String(self)
    }

    crate::__reflect_erasure!();
}

// Pointers

impl<T: Reflect + Default> Reflect for Option<T> {
    fn static_category() -> Category {
        Category::Pointer
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Pointer(Pointer::get(self))
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Pointer(self)
    }

    crate::__reflect_erasure!();
}

impl<T: Reflect + Default> Pointer for Option<T> {
    fn is_set(&self) -> bool {
        self.is_some()
    }

    fn get(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|value| value as &dyn Reflect)
    }

    fn get_or_allocate(&mut self) -> &mut dyn Reflect {
        self.get_or_insert_with(T::default)
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn static_category() -> Category {
        Category::Pointer
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Pointer(Pointer::get(self))
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Pointer(self)
    }

    crate::__reflect_erasure!();
}

impl<T: Reflect> Pointer for Box<T> {
    fn is_set(&self) -> bool {
        true
    }

    fn get(&self) -> Option<&dyn Reflect> {
        let inner: &T = self;
        Some(inner as &dyn Reflect)
    }

    fn get_or_allocate(&mut self) -> &mut dyn Reflect {
        let inner: &mut T = self;
        inner
    }
}

// Arrays and sequences

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn static_category() -> Category {
        Category::Array
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Array(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Array(self)
    }

    crate::__reflect_erasure!();
}

impl<T: Reflect, const N: usize> Array for [T; N] {
    fn len(&self) -> usize {
        N
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|value| value as &dyn Reflect)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|value| value as &mut dyn Reflect)
    }
}

impl<T: Reflect + Default> Reflect for Vec<T> {
    fn static_category() -> Category {
        Category::Sequence
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Sequence(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Sequence(self)
    }

    crate::__reflect_erasure!();
}

impl<T: Reflect + Default> Array for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|value| value as &dyn Reflect)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|value| value as &mut dyn Reflect)
    }
}

impl<T: Reflect + Default> List for Vec<T> {
    fn new_element(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }

    fn push(&mut self, element: Box<dyn Reflect>) -> crate::Result<()> {
        Vec::push(self, element.take::<T>()?);
        Ok(())
    }

    fn as_array(&self) -> &dyn Array {
        self
    }
}

impl<T: Reflect + Default> Reflect for VecDeque<T> {
    fn static_category() -> Category {
        Category::Sequence
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Sequence(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Sequence(self)
    }

    crate::__reflect_erasure!();
}

impl<T: Reflect + Default> Array for VecDeque<T> {
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(|value| value as &dyn Reflect)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        VecDeque::get_mut(self, index).map(|value| value as &mut dyn Reflect)
    }
}

impl<T: Reflect + Default> List for VecDeque<T> {
    fn new_element(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }

    fn push(&mut self, element: Box<dyn Reflect>) -> crate::Result<()> {
        self.push_back(element.take::<T>()?);
        Ok(())
    }

    fn as_array(&self) -> &dyn Array {
        self
    }
}

// Maps

impl<K, V, S> Reflect for HashMap<K, V, S>
where
    K: Reflect + Default + Eq + Hash,
    V: Reflect + Default,
    S: BuildHasher + 'static,
{
    fn static_category() -> Category {
        Category::Map
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Map(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Map(self)
    }

    crate::__reflect_erasure!();
}

impl<K, V, S> Map for HashMap<K, V, S>
where
    K: Reflect + Default + Eq + Hash,
    V: Reflect + Default,
    S: BuildHasher + 'static,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            HashMap::iter(self).map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)),
        )
    }

    fn new_key(&self) -> Box<dyn Reflect> {
        Box::new(K::default())
    }

    fn new_value(&self) -> Box<dyn Reflect> {
        Box::new(V::default())
    }

    fn insert(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> crate::Result<()> {
        let key = key.take::<K>()?;
        let value = value.take::<V>()?;
        HashMap::insert(self, key, value);
        Ok(())
    }
}

impl<K, V> Reflect for BTreeMap<K, V>
where
    K: Reflect + Default + Ord,
    V: Reflect + Default,
{
    fn static_category() -> Category {
        Category::Map
    }

    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Map(self)
    }

    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Map(self)
    }

    crate::__reflect_erasure!();
}

impl<K, V> Map for BTreeMap<K, V>
where
    K: Reflect + Default + Ord,
    V: Reflect + Default,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(
            BTreeMap::iter(self).map(|(key, value)| (key as &dyn Reflect, value as &dyn Reflect)),
        )
    }

    fn new_key(&self) -> Box<dyn Reflect> {
        Box::new(K::default())
    }

    fn new_value(&self) -> Box<dyn Reflect> {
        Box::new(V::default())
    }

    fn insert(&mut self, key: Box<dyn Reflect>, value: Box<dyn Reflect>) -> crate::Result<()> {
        let key = key.take::<K>()?;
        let value = value.take::<V>()?;
        BTreeMap::insert(self, key, value);
        Ok(())
    }
}

// Opaque: channels, function and raw pointers

macro_rules! opaque_body {
    () => {
        fn static_category() -> Category {
            Category::Opaque
        }

        fn reflect_ref(&self) -> ReflectRef<'_> {
            ReflectRef::Opaque
        }

        fn reflect_mut(&mut self) -> ReflectMut<'_> {
            ReflectMut::Opaque
        }

        crate::__reflect_erasure!();
    };
}

impl<R: 'static> Reflect for fn() -> R {
    opaque_body!();
}

impl<A: 'static, R: 'static> Reflect for fn(A) -> R {
    opaque_body!();
}

impl<A: 'static, B: 'static, R: 'static> Reflect for fn(A, B) -> R {
    opaque_body!();
}

impl<A: 'static, B: 'static, C: 'static, R: 'static> Reflect for fn(A, B, C) -> R {
    opaque_body!();
}

impl<T: ?Sized + 'static> Reflect for *const T {
    opaque_body!();
}

impl<T: ?Sized + 'static> Reflect for *mut T {
    opaque_body!();
}

impl<T: 'static> Reflect for Sender<T> {
    opaque_body!();
}

impl<T: 'static> Reflect for SyncSender<T> {
    opaque_body!();
}

impl<T: 'static> Reflect for Receiver<T> {
    opaque_body!();
}

impl<T: ?Sized + 'static> Reflect for PhantomData<T> {
    opaque_body!();
}
