//! Shape validation gating every indexed operation.
//!
//! Validation is all-or-nothing: every check runs before the first element
//! is touched, so a failed call leaves the destination untouched.

use ndstride::{DType, Tensor};

use crate::error::{IndexOpError, Result};
use crate::info::MAX_RANK;

/// Outcome of validating a scatter-family descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    /// Shapes are compatible; run the kernel.
    Run,
    /// The index tensor is empty; the operation is a defined no-op.
    Skip,
}

fn check_axis(dest: &Tensor, axis: usize) -> Result<()> {
    if axis >= dest.rank() {
        return Err(IndexOpError::invalid(format!(
            "axis {} is out of bounds for rank {}",
            axis,
            dest.rank()
        )));
    }
    Ok(())
}

fn check_index_dtype(index: &Tensor) -> Result<()> {
    if index.dtype() != DType::I64 {
        return Err(IndexOpError::invalid(format!(
            "index tensor must be I64, got {:?}",
            index.dtype()
        )));
    }
    Ok(())
}

fn check_matching_dtype(dest: &Tensor, src: &Tensor) -> Result<()> {
    if dest.dtype() != src.dtype() {
        return Err(IndexOpError::invalid(format!(
            "source dtype {:?} must match destination dtype {:?}",
            src.dtype(),
            dest.dtype()
        )));
    }
    Ok(())
}

fn check_max_rank(dest: &Tensor) -> Result<()> {
    if dest.rank() > MAX_RANK {
        return Err(IndexOpError::invalid(format!(
            "rank {} exceeds the supported maximum of {}",
            dest.rank(),
            MAX_RANK
        )));
    }
    Ok(())
}

/// Validates a gather descriptor.
///
/// Runs before the destination is resized to the index shape, so every
/// check is phrased against the index and source tensors; afterwards the
/// destination's shape equals the index tensor's by construction.
pub(crate) fn check_gather(
    dest: &Tensor,
    src: &Tensor,
    axis: usize,
    index: &Tensor,
) -> Result<()> {
    check_index_dtype(index)?;
    if index.rank() != src.rank() {
        return Err(IndexOpError::invalid(format!(
            "index rank {} must match source rank {}",
            index.rank(),
            src.rank()
        )));
    }
    if axis >= index.rank() {
        return Err(IndexOpError::invalid(format!(
            "axis {} is out of bounds for rank {}",
            axis,
            index.rank()
        )));
    }
    check_matching_dtype(dest, src)?;
    for d in 0..index.rank() {
        if d == axis {
            continue;
        }
        if index.dims()[d] != src.dims()[d] {
            return Err(IndexOpError::invalid(format!(
                "index size {} does not match source size {} on dimension {}",
                index.dims()[d],
                src.dims()[d],
                d
            )));
        }
    }
    if index.rank() > MAX_RANK {
        return Err(IndexOpError::invalid(format!(
            "rank {} exceeds the supported maximum of {}",
            index.rank(),
            MAX_RANK
        )));
    }
    Ok(())
}

fn check_scatter_shapes(
    dest: &Tensor,
    axis: usize,
    index: &Tensor,
    src: Option<&Tensor>,
) -> Result<Gate> {
    check_axis(dest, axis)?;
    check_index_dtype(index)?;

    let empty = index.num_elements() == 0;
    if !empty {
        if index.rank() != dest.rank() {
            return Err(IndexOpError::invalid(format!(
                "index rank {} must match destination rank {}",
                index.rank(),
                dest.rank()
            )));
        }
        if let Some(src) = src {
            if src.rank() != dest.rank() {
                return Err(IndexOpError::invalid(format!(
                    "source rank {} must match destination rank {}",
                    src.rank(),
                    dest.rank()
                )));
            }
        }
    }
    if let Some(src) = src {
        check_matching_dtype(dest, src)?;
    }
    if empty {
        return Ok(Gate::Skip);
    }

    for d in 0..dest.rank() {
        let index_size = index.dims()[d];
        if d != axis && index_size > dest.dims()[d] {
            return Err(IndexOpError::invalid(format!(
                "index size {} exceeds destination size {} on dimension {}",
                index_size,
                dest.dims()[d],
                d
            )));
        }
        if let Some(src) = src {
            if index_size > src.dims()[d] {
                return Err(IndexOpError::invalid(format!(
                    "index size {} exceeds source size {} on dimension {}",
                    index_size,
                    src.dims()[d],
                    d
                )));
            }
        }
    }
    check_max_rank(dest)?;
    Ok(Gate::Run)
}

/// Validates a scatter (copy) descriptor.
pub(crate) fn check_scatter(
    dest: &Tensor,
    axis: usize,
    index: &Tensor,
    src: &Tensor,
) -> Result<Gate> {
    check_scatter_shapes(dest, axis, index, Some(src))
}

/// Validates a scatter_fill descriptor; no source tensor participates.
pub(crate) fn check_scatter_fill(dest: &Tensor, axis: usize, index: &Tensor) -> Result<Gate> {
    check_scatter_shapes(dest, axis, index, None)
}

/// Validates a scatter_add descriptor. The destination element type must
/// support accumulation, even when the index tensor is empty.
pub(crate) fn check_scatter_add(
    dest: &Tensor,
    axis: usize,
    index: &Tensor,
    src: &Tensor,
) -> Result<Gate> {
    if !dest.dtype().supports_accumulate() {
        return Err(IndexOpError::unsupported("scatter_add", dest.dtype()));
    }
    check_scatter_shapes(dest, axis, index, Some(src))
}
