//! Scalar values and writable scalar slots

use std::fmt;

/// Complex number stored as a real and an imaginary part
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

/// Exact primitive category and width of a scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    /// `Complex<f32>`
    C32,
    /// `Complex<f64>`
    C64,
    Char,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::I128 => "i128",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::U128 => "u128",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::C32 => "complex<f32>",
            ScalarKind::C64 => "complex<f64>",
            ScalarKind::Char => "char",
        };
        f.write_str(name)
    }
}

macro_rules! scalar_types {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        /// A scalar read out of a source value
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum Scalar {
            $($variant($ty),)*
        }

        impl Scalar {
            pub fn kind(&self) -> ScalarKind {
                match self {
                    $(Scalar::$variant(_) => ScalarKind::$variant,)*
                }
            }
        }

        /// A writable scalar slot inside a destination value
        #[derive(Debug)]
        pub enum ScalarMut<'a> {
            $($variant(&'a mut $ty),)*
        }

        impl ScalarMut<'_> {
            pub fn kind(&self) -> ScalarKind {
                match self {
                    $(ScalarMut::$variant(_) => ScalarKind::$variant,)*
                }
            }

            /// Store `value` when it has exactly the slot's kind and width.
            ///
            /// Returns `false` and leaves the slot untouched otherwise; no
            /// widening, narrowing or sign conversion is performed.
            pub fn set(self, value: Scalar) -> bool {
                match (self, value) {
                    $((ScalarMut::$variant(slot), Scalar::$variant(v)) => {
                        *slot = v;
                        true
                    })*
                    _ => false,
                }
            }
        }
    };
}

scalar_types! {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_same_kind() {
        let mut slot = 0_i64;
        assert!(ScalarMut::I64(&mut slot).set(Scalar::I64(i64::MAX)));
        assert_eq!(slot, i64::MAX);
    }

    #[test]
    fn test_set_rejects_other_width() {
        let mut slot = 3_i32;
        assert!(!ScalarMut::I32(&mut slot).set(Scalar::I64(1)));
        assert!(!ScalarMut::I32(&mut slot).set(Scalar::U32(1)));
        assert_eq!(slot, 3);
    }

    #[test]
    fn test_complex_slot() {
        let mut slot = Complex::default();
        let value = Complex::new(f32::MAX, -1.5);
        assert!(ScalarMut::C32(&mut slot).set(Scalar::C32(value)));
        assert_eq!(slot, value);
        assert!(!ScalarMut::C32(&mut slot).set(Scalar::C64(Complex::new(0.0, 0.0))));
    }
}
