//! Defines the scalar element trait implemented by tensor storages.

use crate::dtype::{DType, Scalar};
use crate::tensor::TensorData;

/// Trait binding a Rust scalar type to its dtype tag and storage variant.
///
/// Implementations project the matching `TensorData` variant into typed
/// slices so kernels can run generically over the element type without
/// reinterpreting bytes.
pub trait Element: Copy + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// The dtype tag corresponding to this element type.
    const DTYPE: DType;

    /// Returns the additive identity (or `false` for booleans).
    fn zero() -> Self;

    /// Converts an untyped scalar into this element type.
    fn from_scalar(scalar: Scalar) -> Self;

    /// Wraps an owned vector in the matching storage variant.
    fn wrap(values: Vec<Self>) -> TensorData;

    /// Borrows the storage as a typed slice, panicking on dtype mismatch.
    fn slice(data: &TensorData) -> &[Self];

    /// Mutably borrows the storage, panicking on dtype mismatch.
    fn slice_mut(data: &mut TensorData) -> &mut [Self];
}

/// Elements with well-defined accumulation, as required by `scatter_add`.
///
/// Integer accumulation wraps on overflow so the sum stays independent of
/// the order contributions arrive in.
pub trait AddElement: Element {
    fn accumulate(self, rhs: Self) -> Self;
}

macro_rules! impl_element {
    ($ty:ty, $dtype:ident, $variant:ident, $zero:expr, $from_scalar:expr) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$dtype;

            fn zero() -> Self {
                $zero
            }

            fn from_scalar(scalar: Scalar) -> Self {
                let convert: fn(Scalar) -> Self = $from_scalar;
                convert(scalar)
            }

            fn wrap(values: Vec<Self>) -> TensorData {
                TensorData::$variant(values)
            }

            fn slice(data: &TensorData) -> &[Self] {
                match data {
                    TensorData::$variant(values) => values,
                    other => panic!(
                        "tensor data is {:?}, not {:?}",
                        other.dtype(),
                        DType::$dtype
                    ),
                }
            }

            fn slice_mut(data: &mut TensorData) -> &mut [Self] {
                match data {
                    TensorData::$variant(values) => values,
                    other => panic!(
                        "tensor data is {:?}, not {:?}",
                        other.dtype(),
                        DType::$dtype
                    ),
                }
            }
        }
    };
}

impl_element!(f32, F32, F32, 0.0, |s| s.as_f64() as f32);
impl_element!(f64, F64, F64, 0.0, |s| s.as_f64());
impl_element!(i8, I8, I8, 0, |s| s.as_i64() as i8);
impl_element!(i16, I16, I16, 0, |s| s.as_i64() as i16);
impl_element!(i32, I32, I32, 0, |s| s.as_i64() as i32);
impl_element!(i64, I64, I64, 0, |s| s.as_i64());
impl_element!(u8, U8, U8, 0, |s| s.as_i64() as u8);
impl_element!(bool, Bool, Bool, false, |s| s.as_bool());

macro_rules! impl_add_element {
    (float $ty:ty) => {
        impl AddElement for $ty {
            fn accumulate(self, rhs: Self) -> Self {
                self + rhs
            }
        }
    };
    (int $ty:ty) => {
        impl AddElement for $ty {
            fn accumulate(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
        }
    };
}

impl_add_element!(float f32);
impl_add_element!(float f64);
impl_add_element!(int i8);
impl_add_element!(int i16);
impl_add_element!(int i32);
impl_add_element!(int i64);
impl_add_element!(int u8);

/// Dispatches `$body` with `$elem` aliased to the concrete element type for
/// `$dtype`. Covers every supported dtype including `Bool`.
#[macro_export]
macro_rules! with_element {
    ($dtype:expr, $elem:ident, $body:expr) => {
        match $dtype {
            $crate::DType::F32 => {
                type $elem = f32;
                $body
            }
            $crate::DType::F64 => {
                type $elem = f64;
                $body
            }
            $crate::DType::I8 => {
                type $elem = i8;
                $body
            }
            $crate::DType::I16 => {
                type $elem = i16;
                $body
            }
            $crate::DType::I32 => {
                type $elem = i32;
                $body
            }
            $crate::DType::I64 => {
                type $elem = i64;
                $body
            }
            $crate::DType::U8 => {
                type $elem = u8;
                $body
            }
            $crate::DType::Bool => {
                type $elem = bool;
                $body
            }
        }
    };
}

/// Like [`with_element!`] but only over dtypes whose elements implement
/// [`AddElement`]; `Bool` evaluates `$fallback` instead.
#[macro_export]
macro_rules! with_add_element {
    ($dtype:expr, $elem:ident, $body:expr, $fallback:expr) => {
        match $dtype {
            $crate::DType::F32 => {
                type $elem = f32;
                $body
            }
            $crate::DType::F64 => {
                type $elem = f64;
                $body
            }
            $crate::DType::I8 => {
                type $elem = i8;
                $body
            }
            $crate::DType::I16 => {
                type $elem = i16;
                $body
            }
            $crate::DType::I32 => {
                type $elem = i32;
                $body
            }
            $crate::DType::I64 => {
                type $elem = i64;
                $body
            }
            $crate::DType::U8 => {
                type $elem = u8;
                $body
            }
            $crate::DType::Bool => $fallback,
        }
    };
}
