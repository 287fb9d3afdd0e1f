//! Public surface of the indexed-access engine.
//!
//! Every operation validates first, then routes the destination through the
//! aliasing guard, then picks an address width and a rank-specialized loop,
//! and finally dispatches on the destination's element type.

use ndstride::{layout, with_add_element, with_element, AddElement, Element, Scalar, Tensor};

use crate::check::{self, Gate};
use crate::error::Result;
use crate::guard::WorkingDest;
use crate::info::{IndexWord, ViewInfo};
use crate::kernel::{gather_kernel, scatter_add_kernel, scatter_fill_kernel, scatter_kernel};

/// Expands to the rank-specialized kernel instantiation for `$rank`,
/// falling back to the generic (`-1`) loop for rank 0 or above 3.
macro_rules! by_rank {
    ($rank:expr, $kernel:ident::<$e:ty, $i:ty>($($arg:expr),* $(,)?)) => {
        match $rank {
            1 => $kernel::<$e, $i, 1>($($arg),*),
            2 => $kernel::<$e, $i, 2>($($arg),*),
            3 => $kernel::<$e, $i, 3>($($arg),*),
            _ => $kernel::<$e, $i, -1>($($arg),*),
        }
    };
}

fn narrow_feasible(tensors: &[&Tensor]) -> bool {
    tensors.iter().all(|t| layout::fits_in_u32(t))
}

/// Writes `src[c with axis component replaced by index[c]]` into `dest[c]`
/// for every coordinate `c` of the index tensor.
///
/// The destination is resized to the index tensor's shape, so an empty
/// index yields an empty result. Index values must lie in
/// `[0, src.dims()[axis])`; out-of-range entries panic.
pub fn gather<'a>(
    dest: &'a mut Tensor,
    src: &Tensor,
    axis: usize,
    index: &Tensor,
) -> Result<&'a mut Tensor> {
    check::check_gather(dest, src, axis, index)?;
    dest.resize_to(index.shape());
    if index.num_elements() == 0 {
        return Ok(dest);
    }
    let mut working = WorkingDest::acquire(dest);
    let dtype = working.tensor_mut().dtype();
    with_element!(dtype, E, {
        run_gather::<E>(working.tensor_mut(), src, axis, index)
    });
    Ok(working.finish())
}

/// Writes `src[c]` into `dest[c with axis component replaced by index[c]]`
/// for every coordinate `c` of the index tensor.
///
/// Destination positions not addressed by any index entry keep their prior
/// values. When duplicate index entries target the same position, which
/// write is retained is unspecified. An empty index is a no-op.
pub fn scatter<'a>(
    dest: &'a mut Tensor,
    axis: usize,
    index: &Tensor,
    src: &Tensor,
) -> Result<&'a mut Tensor> {
    if check::check_scatter(dest, axis, index, src)? == Gate::Skip {
        return Ok(dest);
    }
    let mut working = WorkingDest::acquire(dest);
    let dtype = working.tensor_mut().dtype();
    with_element!(dtype, E, {
        run_scatter::<E>(working.tensor_mut(), axis, index, src)
    });
    Ok(working.finish())
}

/// Scatter addressing with a single fill value: every addressed position is
/// set to `value` converted into the destination's element type.
pub fn scatter_fill<'a>(
    dest: &'a mut Tensor,
    axis: usize,
    index: &Tensor,
    value: Scalar,
) -> Result<&'a mut Tensor> {
    if check::check_scatter_fill(dest, axis, index)? == Gate::Skip {
        return Ok(dest);
    }
    let mut working = WorkingDest::acquire(dest);
    let dtype = working.tensor_mut().dtype();
    with_element!(dtype, E, {
        run_scatter_fill::<E>(working.tensor_mut(), axis, index, E::from_scalar(value))
    });
    Ok(working.finish())
}

/// Scatter addressing with accumulation: `dest[c'] += src[c]`.
///
/// Duplicate targets receive the sum of all their contributions regardless
/// of visit order. Boolean destinations are rejected with
/// [`IndexOpError::UnsupportedType`](crate::IndexOpError::UnsupportedType).
pub fn scatter_add<'a>(
    dest: &'a mut Tensor,
    axis: usize,
    index: &Tensor,
    src: &Tensor,
) -> Result<&'a mut Tensor> {
    if check::check_scatter_add(dest, axis, index, src)? == Gate::Skip {
        return Ok(dest);
    }
    let mut working = WorkingDest::acquire(dest);
    let dtype = working.tensor_mut().dtype();
    with_add_element!(
        dtype,
        E,
        run_scatter_add::<E>(working.tensor_mut(), axis, index, src),
        unreachable!("validation rejects dtypes without accumulation")
    );
    Ok(working.finish())
}

fn run_gather<E: Element>(dest: &mut Tensor, src: &Tensor, axis: usize, index: &Tensor) {
    if narrow_feasible(&[dest, src, index]) {
        gather_with::<E, u32>(dest, src, axis, index);
    } else {
        gather_with::<E, u64>(dest, src, axis, index);
    }
}

fn gather_with<E: Element, I: IndexWord>(
    dest: &mut Tensor,
    src: &Tensor,
    axis: usize,
    index: &Tensor,
) {
    let dest_info = ViewInfo::<I>::from_tensor(dest);
    let src_info = ViewInfo::<I>::from_tensor(src);
    let index_info = ViewInfo::<I>::from_tensor(index);
    let total = index.num_elements();
    let rank = index.rank();
    let index_values = index.as_slice::<i64>();
    let src_values = src.as_slice::<E>();
    let dest_values = dest.as_mut_slice::<E>();
    by_rank!(
        rank,
        gather_kernel::<E, I>(
            dest_values,
            &dest_info,
            src_values,
            &src_info,
            index_values,
            &index_info,
            axis,
            total,
        )
    );
}

fn run_scatter<E: Element>(dest: &mut Tensor, axis: usize, index: &Tensor, src: &Tensor) {
    if narrow_feasible(&[dest, src, index]) {
        scatter_with::<E, u32>(dest, axis, index, src);
    } else {
        scatter_with::<E, u64>(dest, axis, index, src);
    }
}

fn scatter_with<E: Element, I: IndexWord>(
    dest: &mut Tensor,
    axis: usize,
    index: &Tensor,
    src: &Tensor,
) {
    let dest_info = ViewInfo::<I>::from_tensor(dest);
    let src_info = ViewInfo::<I>::from_tensor(src);
    let index_info = ViewInfo::<I>::from_tensor(index);
    let total = index.num_elements();
    let rank = index.rank();
    let index_values = index.as_slice::<i64>();
    let src_values = src.as_slice::<E>();
    let dest_values = dest.as_mut_slice::<E>();
    by_rank!(
        rank,
        scatter_kernel::<E, I>(
            dest_values,
            &dest_info,
            src_values,
            &src_info,
            index_values,
            &index_info,
            axis,
            total,
        )
    );
}

fn run_scatter_fill<E: Element>(dest: &mut Tensor, axis: usize, index: &Tensor, value: E) {
    if narrow_feasible(&[dest, index]) {
        scatter_fill_with::<E, u32>(dest, axis, index, value);
    } else {
        scatter_fill_with::<E, u64>(dest, axis, index, value);
    }
}

fn scatter_fill_with<E: Element, I: IndexWord>(
    dest: &mut Tensor,
    axis: usize,
    index: &Tensor,
    value: E,
) {
    let dest_info = ViewInfo::<I>::from_tensor(dest);
    let index_info = ViewInfo::<I>::from_tensor(index);
    let total = index.num_elements();
    let rank = index.rank();
    let index_values = index.as_slice::<i64>();
    let dest_values = dest.as_mut_slice::<E>();
    by_rank!(
        rank,
        scatter_fill_kernel::<E, I>(
            dest_values,
            &dest_info,
            value,
            index_values,
            &index_info,
            axis,
            total,
        )
    );
}

fn run_scatter_add<E: AddElement>(dest: &mut Tensor, axis: usize, index: &Tensor, src: &Tensor) {
    if narrow_feasible(&[dest, src, index]) {
        scatter_add_with::<E, u32>(dest, axis, index, src);
    } else {
        scatter_add_with::<E, u64>(dest, axis, index, src);
    }
}

fn scatter_add_with<E: AddElement, I: IndexWord>(
    dest: &mut Tensor,
    axis: usize,
    index: &Tensor,
    src: &Tensor,
) {
    let dest_info = ViewInfo::<I>::from_tensor(dest);
    let src_info = ViewInfo::<I>::from_tensor(src);
    let index_info = ViewInfo::<I>::from_tensor(index);
    let total = index.num_elements();
    let rank = index.rank();
    let index_values = index.as_slice::<i64>();
    let src_values = src.as_slice::<E>();
    let dest_values = dest.as_mut_slice::<E>();
    by_rank!(
        rank,
        scatter_add_kernel::<E, I>(
            dest_values,
            &dest_info,
            src_values,
            &src_info,
            index_values,
            &index_info,
            axis,
            total,
        )
    );
}
