//! Per-call layout snapshots in the selected address width.

use ndstride::Tensor;
use smallvec::SmallVec;
use std::ops::{Add, Div, Mul, Rem};

/// Maximum tensor rank accepted by the indexed operations.
pub const MAX_RANK: usize = 8;

/// Unsigned integer used for flat-offset arithmetic inside a kernel.
///
/// `u32` is selected when every participating tensor's reachable offsets
/// fit; otherwise `u64`. The two instantiations are behaviorally identical.
pub(crate) trait IndexWord:
    Copy
    + PartialEq
    + Add<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Rem<Output = Self>
{
    const ZERO: Self;

    fn from_usize(value: usize) -> Self;
    fn to_usize(self) -> usize;
}

impl IndexWord for u32 {
    const ZERO: Self = 0;

    #[inline(always)]
    fn from_usize(value: usize) -> Self {
        value as u32
    }

    #[inline(always)]
    fn to_usize(self) -> usize {
        self as usize
    }
}

impl IndexWord for u64 {
    const ZERO: Self = 0;

    #[inline(always)]
    fn from_usize(value: usize) -> Self {
        value as u64
    }

    #[inline(always)]
    fn to_usize(self) -> usize {
        self as usize
    }
}

/// Sizes and strides of one tensor, captured in the kernel's address width.
pub(crate) struct ViewInfo<I: IndexWord> {
    sizes: SmallVec<[I; MAX_RANK]>,
    strides: SmallVec<[I; MAX_RANK]>,
}

impl<I: IndexWord> ViewInfo<I> {
    pub(crate) fn from_tensor(tensor: &Tensor) -> Self {
        ViewInfo {
            sizes: tensor.dims().iter().map(|&d| I::from_usize(d)).collect(),
            strides: tensor.strides().iter().map(|&s| I::from_usize(s)).collect(),
        }
    }

    #[inline(always)]
    pub(crate) fn rank(&self) -> usize {
        self.sizes.len()
    }

    #[inline(always)]
    pub(crate) fn size(&self, dim: usize) -> I {
        self.sizes[dim]
    }

    #[inline(always)]
    pub(crate) fn stride(&self, dim: usize) -> I {
        self.strides[dim]
    }
}
