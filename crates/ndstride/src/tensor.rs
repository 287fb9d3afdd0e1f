//! Host-backed strided tensor used by the indexed kernels and their tests.

use crate::dtype::DType;
use crate::element::Element;
use crate::shape::Shape;
use crate::with_element;

/// Dense per-dtype storage behind a tensor.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    Bool(Vec<bool>),
}

impl TensorData {
    /// Returns the dtype tag of the stored elements.
    pub fn dtype(&self) -> DType {
        match self {
            TensorData::F32(_) => DType::F32,
            TensorData::F64(_) => DType::F64,
            TensorData::I8(_) => DType::I8,
            TensorData::I16(_) => DType::I16,
            TensorData::I32(_) => DType::I32,
            TensorData::I64(_) => DType::I64,
            TensorData::U8(_) => DType::U8,
            TensorData::Bool(_) => DType::Bool,
        }
    }

    /// Number of stored elements (the physical buffer length).
    pub fn len(&self) -> usize {
        match self {
            TensorData::F32(v) => v.len(),
            TensorData::F64(v) => v.len(),
            TensorData::I8(v) => v.len(),
            TensorData::I16(v) => v.len(),
            TensorData::I32(v) => v.len(),
            TensorData::I64(v) => v.len(),
            TensorData::U8(v) => v.len(),
            TensorData::Bool(v) => v.len(),
        }
    }

    /// Reports whether the buffer holds zero elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocates a zero-initialized buffer of `len` elements of `dtype`.
    pub fn zeros(dtype: DType, len: usize) -> Self {
        with_element!(dtype, E, <E as Element>::wrap(vec![E::zero(); len]))
    }

    /// Grows or shrinks the buffer to `len`, zero-filling new elements.
    pub fn resize(&mut self, len: usize) {
        match self {
            TensorData::F32(v) => v.resize(len, 0.0),
            TensorData::F64(v) => v.resize(len, 0.0),
            TensorData::I8(v) => v.resize(len, 0),
            TensorData::I16(v) => v.resize(len, 0),
            TensorData::I32(v) => v.resize(len, 0),
            TensorData::I64(v) => v.resize(len, 0),
            TensorData::U8(v) => v.resize(len, 0),
            TensorData::Bool(v) => v.resize(len, false),
        }
    }
}

/// Caller-owned dense tensor with explicit element strides.
///
/// Strides are expressed in elements, not bytes. Non-contiguous layouts
/// (including ones where distinct coordinates alias the same element, e.g.
/// a zero stride) are legal; the indexed kernels detect and handle them.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    strides: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    /// Builds a contiguous tensor from typed values.
    ///
    /// Panics if the value count does not match the shape.
    pub fn from_elems<E: Element>(shape: Shape, values: Vec<E>) -> Self {
        assert_eq!(
            values.len(),
            shape.num_elements(),
            "tensor data length does not match shape {:?}",
            shape.dims()
        );
        let strides = shape.contiguous_strides();
        Tensor {
            shape,
            strides,
            data: E::wrap(values),
        }
    }

    /// Returns a zero-initialized contiguous tensor.
    pub fn zeros(dtype: DType, shape: Shape) -> Self {
        let len = shape.num_elements();
        let strides = shape.contiguous_strides();
        Tensor {
            shape,
            strides,
            data: TensorData::zeros(dtype, len),
        }
    }

    /// Returns a contiguous tensor with every element set to `value`.
    pub fn filled<E: Element>(shape: Shape, value: E) -> Self {
        let len = shape.num_elements();
        Self::from_elems(shape, vec![value; len])
    }

    /// Builds a tensor over a caller-supplied buffer with explicit strides.
    ///
    /// This is how overlapped or otherwise non-contiguous layouts are
    /// constructed. Panics if the buffer does not cover the address span
    /// implied by `shape` and `strides`.
    pub fn from_parts(shape: Shape, strides: Vec<usize>, data: TensorData) -> Self {
        assert_eq!(
            strides.len(),
            shape.rank(),
            "stride count does not match rank {}",
            shape.rank()
        );
        let span = address_span(shape.dims(), &strides);
        assert!(
            data.len() >= span,
            "buffer of {} elements does not cover the strided span of {}",
            data.len(),
            span
        );
        Tensor {
            shape,
            strides,
            data,
        }
    }

    /// Provides access to the tensor shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Borrow the raw dimension slice.
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Per-dimension element strides.
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the rank (number of axes).
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Total number of logical elements.
    pub fn num_elements(&self) -> usize {
        self.shape.num_elements()
    }

    /// Returns the scalar dtype of the tensor payload.
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Borrows the underlying storage.
    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// Mutably borrows the underlying storage.
    pub fn data_mut(&mut self) -> &mut TensorData {
        &mut self.data
    }

    /// Borrows the storage as a typed slice, panicking on dtype mismatch.
    pub fn as_slice<E: Element>(&self) -> &[E] {
        E::slice(&self.data)
    }

    /// Mutably borrows the storage as a typed slice.
    pub fn as_mut_slice<E: Element>(&mut self) -> &mut [E] {
        E::slice_mut(&mut self.data)
    }

    /// True when logical order coincides with physical order.
    ///
    /// Dimensions of size one place no constraint on their stride, and
    /// tensors with at most one element are trivially contiguous.
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 1usize;
        for (&dim, &stride) in self.dims().iter().zip(self.strides.iter()).rev() {
            if dim == 0 {
                return true;
            }
            if dim == 1 {
                continue;
            }
            if stride != expected {
                return false;
            }
            expected *= dim;
        }
        true
    }

    /// Physical element offset of the `linear`-th logical element.
    pub fn offset_of(&self, linear: usize) -> usize {
        let mut remaining = linear;
        let mut offset = 0usize;
        for (&dim, &stride) in self.dims().iter().zip(self.strides.iter()).rev() {
            let coord = remaining % dim;
            remaining /= dim;
            offset += coord * stride;
        }
        offset
    }

    /// Reads every logical element in row-major order.
    pub fn to_vec<E: Element>(&self) -> Vec<E> {
        let source = self.as_slice::<E>();
        (0..self.num_elements())
            .map(|linear| source[self.offset_of(linear)])
            .collect()
    }

    /// Produces a contiguous tensor holding the same logical values.
    pub fn contiguous_copy(&self) -> Tensor {
        with_element!(self.dtype(), E, {
            Tensor::from_elems(self.shape.clone(), self.to_vec::<E>())
        })
    }

    /// Reinitializes the tensor as contiguous with the given shape.
    ///
    /// Existing element values are not preserved in any particular layout;
    /// the storage is resized and the strides reset to row-major.
    pub fn resize_to(&mut self, shape: &Shape) {
        self.data.resize(shape.num_elements());
        self.strides = shape.contiguous_strides();
        self.shape = shape.clone();
    }

    /// Copies `src`'s logical values into this tensor, elementwise, through
    /// this tensor's strides. Shapes and dtypes must match.
    pub fn assign_from(&mut self, src: &Tensor) {
        assert_eq!(self.shape, src.shape, "assign_from requires equal shapes");
        assert_eq!(
            self.dtype(),
            src.dtype(),
            "assign_from requires equal dtypes"
        );
        let total = self.num_elements();
        with_element!(self.dtype(), E, {
            for linear in 0..total {
                let offset = self.offset_of(linear);
                let value = src.as_slice::<E>()[src.offset_of(linear)];
                self.as_mut_slice::<E>()[offset] = value;
            }
        })
    }
}

/// Number of buffer elements a `(dims, strides)` layout can address:
/// one past the largest reachable offset, or zero for empty shapes.
pub(crate) fn address_span(dims: &[usize], strides: &[usize]) -> usize {
    let mut span = 1usize;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        if dim == 0 {
            return 0;
        }
        span += (dim - 1) * stride;
    }
    span
}
