//! Enumerates the scalar element types supported by the indexed kernels.

/// Logical dtype identifier shared between tensors and kernel dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating point following IEEE-754 semantics.
    F32,
    /// 64-bit floating point.
    F64,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer, also the required dtype for index tensors.
    I64,
    /// 8-bit unsigned integer.
    U8,
    /// Boolean, stored one element per byte.
    Bool,
}

impl DType {
    /// Returns the number of bytes required per scalar element.
    pub fn size_in_bytes(self) -> usize {
        match self {
            DType::I8 | DType::U8 | DType::Bool => 1,
            DType::I16 => 2,
            DType::F32 | DType::I32 => 4,
            DType::F64 | DType::I64 => 8,
        }
    }

    /// True for the IEEE floating-point members.
    pub fn is_floating_point(self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    /// True for the signed and unsigned integer members (excludes `Bool`).
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            DType::I8 | DType::I16 | DType::I32 | DType::I64 | DType::U8
        )
    }

    /// True when elements of this dtype support well-defined accumulation.
    pub fn supports_accumulate(self) -> bool {
        self.is_floating_point() || self.is_integral()
    }
}

/// Untyped fill value handed to `scatter_fill`, converted into the
/// destination dtype at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    F64(f64),
    I64(i64),
    Bool(bool),
}

impl Scalar {
    /// Reads the payload as `f64`, widening integers and booleans.
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::F64(v) => v,
            Scalar::I64(v) => v as f64,
            Scalar::Bool(v) => v as i64 as f64,
        }
    }

    /// Reads the payload as `i64`, truncating floats toward zero.
    pub fn as_i64(self) -> i64 {
        match self {
            Scalar::F64(v) => v as i64,
            Scalar::I64(v) => v,
            Scalar::Bool(v) => v as i64,
        }
    }

    /// Reads the payload as a boolean; numeric payloads map zero to `false`.
    pub fn as_bool(self) -> bool {
        match self {
            Scalar::F64(v) => v != 0.0,
            Scalar::I64(v) => v != 0,
            Scalar::Bool(v) => v,
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::F64(v as f64)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::I64(v as i64)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}
