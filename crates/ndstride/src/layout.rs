//! Layout predicates driving kernel selection.
//!
//! Two questions are asked of every tensor before an indexed kernel runs:
//! can two distinct coordinates alias the same element, and does every
//! reachable offset fit in 32-bit arithmetic.

use crate::tensor::Tensor;

/// True when the stride pattern permits two distinct coordinate tuples to
/// reach the same element.
///
/// Dimensions of size one are ignored. The remaining dimensions are sorted
/// by stride; the layout is alias-free exactly when each stride is at least
/// the span of all smaller-stride dimensions combined. A zero stride on a
/// dimension of size > 1 aliases trivially.
pub fn may_alias(tensor: &Tensor) -> bool {
    let mut dims: Vec<(usize, usize)> = tensor
        .dims()
        .iter()
        .zip(tensor.strides().iter())
        .filter(|(&dim, _)| dim > 1)
        .map(|(&dim, &stride)| (stride, dim))
        .collect();
    if tensor.num_elements() == 0 || dims.is_empty() {
        return false;
    }
    dims.sort_unstable();

    let mut required = 1usize;
    for (stride, dim) in dims {
        if stride < required {
            return true;
        }
        required = stride * dim;
    }
    false
}

/// True when every offset the layout can produce is representable as `u32`.
///
/// Selecting 32-bit index arithmetic is purely a performance decision; the
/// wide instantiation must produce identical results.
pub fn fits_in_u32(tensor: &Tensor) -> bool {
    if tensor.num_elements() == 0 {
        return true;
    }
    narrow_math_feasible(tensor.dims(), tensor.strides(), tensor.num_elements())
}

fn narrow_math_feasible(dims: &[usize], strides: &[usize], num_elements: usize) -> bool {
    let mut max_offset: u128 = 0;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        max_offset += (dim as u128 - 1) * stride as u128;
    }
    max_offset < u32::MAX as u128 && (num_elements as u128) < u32::MAX as u128
}
