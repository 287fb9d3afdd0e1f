//! The four indexed loops, generic over element type, address width, and
//! index-tensor rank.
//!
//! `RANK` is `1`, `2`, or `3` for the unrolled instantiations and `-1` for
//! the generic one that loops over the rank at runtime. All instantiations
//! produce identical results; only the per-iteration coordinate arithmetic
//! differs.

use ndstride::{AddElement, Element};

use crate::info::{IndexWord, ViewInfo};

/// Unravels `linear` against the index tensor's sizes, accumulating flat
/// offsets into the index tensor, the tensor addressed by the full
/// coordinate, and the tensor whose axis component will be replaced by the
/// index value (its `axis` contribution is left out here).
#[inline(always)]
fn unravel3<I: IndexWord, const RANK: i32>(
    linear: I,
    index: &ViewInfo<I>,
    full: &ViewInfo<I>,
    partial: &ViewInfo<I>,
    axis: usize,
) -> (I, I, I) {
    let rank = if RANK < 0 { index.rank() } else { RANK as usize };
    let mut remaining = linear;
    let mut index_offset = I::ZERO;
    let mut full_offset = I::ZERO;
    let mut partial_offset = I::ZERO;
    for d in (0..rank).rev() {
        let coord = remaining % index.size(d);
        remaining = remaining / index.size(d);
        index_offset = index_offset + coord * index.stride(d);
        full_offset = full_offset + coord * full.stride(d);
        if d != axis {
            partial_offset = partial_offset + coord * partial.stride(d);
        }
    }
    (index_offset, full_offset, partial_offset)
}

/// Two-tensor variant of [`unravel3`] for kernels without a source tensor.
#[inline(always)]
fn unravel2<I: IndexWord, const RANK: i32>(
    linear: I,
    index: &ViewInfo<I>,
    partial: &ViewInfo<I>,
    axis: usize,
) -> (I, I) {
    let rank = if RANK < 0 { index.rank() } else { RANK as usize };
    let mut remaining = linear;
    let mut index_offset = I::ZERO;
    let mut partial_offset = I::ZERO;
    for d in (0..rank).rev() {
        let coord = remaining % index.size(d);
        remaining = remaining / index.size(d);
        index_offset = index_offset + coord * index.stride(d);
        if d != axis {
            partial_offset = partial_offset + coord * partial.stride(d);
        }
    }
    (index_offset, partial_offset)
}

/// `dest[c] = src[c with axis component replaced by index[c]]`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn gather_kernel<E: Element, I: IndexWord, const RANK: i32>(
    dest: &mut [E],
    dest_info: &ViewInfo<I>,
    src: &[E],
    src_info: &ViewInfo<I>,
    index: &[i64],
    index_info: &ViewInfo<I>,
    axis: usize,
    total: usize,
) {
    for linear in 0..total {
        let (index_offset, dest_offset, src_offset) = unravel3::<I, RANK>(
            I::from_usize(linear),
            index_info,
            dest_info,
            src_info,
            axis,
        );
        let picked = index[index_offset.to_usize()] as usize;
        let src_offset = src_offset + I::from_usize(picked) * src_info.stride(axis);
        dest[dest_offset.to_usize()] = src[src_offset.to_usize()];
    }
}

/// `dest[c with axis component replaced by index[c]] = src[c]`.
///
/// When several index entries target the same destination element the
/// retained value is unspecified; the serial loop happens to keep the last
/// one in index iteration order, but callers must not rely on that.
#[allow(clippy::too_many_arguments)]
pub(crate) fn scatter_kernel<E: Element, I: IndexWord, const RANK: i32>(
    dest: &mut [E],
    dest_info: &ViewInfo<I>,
    src: &[E],
    src_info: &ViewInfo<I>,
    index: &[i64],
    index_info: &ViewInfo<I>,
    axis: usize,
    total: usize,
) {
    for linear in 0..total {
        let (index_offset, src_offset, dest_offset) = unravel3::<I, RANK>(
            I::from_usize(linear),
            index_info,
            src_info,
            dest_info,
            axis,
        );
        let picked = index[index_offset.to_usize()] as usize;
        let dest_offset = dest_offset + I::from_usize(picked) * dest_info.stride(axis);
        dest[dest_offset.to_usize()] = src[src_offset.to_usize()];
    }
}

/// Scatter addressing with a constant value instead of a source tensor.
pub(crate) fn scatter_fill_kernel<E: Element, I: IndexWord, const RANK: i32>(
    dest: &mut [E],
    dest_info: &ViewInfo<I>,
    value: E,
    index: &[i64],
    index_info: &ViewInfo<I>,
    axis: usize,
    total: usize,
) {
    for linear in 0..total {
        let (index_offset, dest_offset) =
            unravel2::<I, RANK>(I::from_usize(linear), index_info, dest_info, axis);
        let picked = index[index_offset.to_usize()] as usize;
        let dest_offset = dest_offset + I::from_usize(picked) * dest_info.stride(axis);
        dest[dest_offset.to_usize()] = value;
    }
}

/// Scatter addressing with read-modify-write accumulation.
///
/// Updates are serialized, so duplicate targets sum all contributions
/// regardless of the order they are visited in.
#[allow(clippy::too_many_arguments)]
pub(crate) fn scatter_add_kernel<E: AddElement, I: IndexWord, const RANK: i32>(
    dest: &mut [E],
    dest_info: &ViewInfo<I>,
    src: &[E],
    src_info: &ViewInfo<I>,
    index: &[i64],
    index_info: &ViewInfo<I>,
    axis: usize,
    total: usize,
) {
    for linear in 0..total {
        let (index_offset, src_offset, dest_offset) = unravel3::<I, RANK>(
            I::from_usize(linear),
            index_info,
            src_info,
            dest_info,
            axis,
        );
        let picked = index[index_offset.to_usize()] as usize;
        let dest_offset = (dest_offset + I::from_usize(picked) * dest_info.stride(axis)).to_usize();
        dest[dest_offset] = dest[dest_offset].accumulate(src[src_offset.to_usize()]);
    }
}
