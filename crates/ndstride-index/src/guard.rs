//! Aliasing guard for destinations whose layout can self-overlap.
//!
//! A scatter into an overlapped destination would make the kernel's writes
//! visible through other coordinates mid-run. When the layout permits that,
//! the guard snapshots the destination into a contiguous scratch tensor
//! (content-preserving, since untouched positions must keep their prior
//! values), lets the kernel run against the scratch, and copies the result
//! back afterwards. Alias-free destinations are used directly.

use ndstride::{layout, Tensor};

/// The destination a kernel actually writes to for one call.
pub(crate) struct WorkingDest<'a> {
    original: &'a mut Tensor,
    scratch: Option<Tensor>,
}

impl<'a> WorkingDest<'a> {
    /// Snapshots `dest` into contiguous scratch storage when its stride
    /// pattern permits aliasing; otherwise borrows it directly.
    pub(crate) fn acquire(dest: &'a mut Tensor) -> Self {
        let scratch = layout::may_alias(dest).then(|| dest.contiguous_copy());
        WorkingDest {
            original: dest,
            scratch,
        }
    }

    /// The tensor the kernel should write through.
    pub(crate) fn tensor_mut(&mut self) -> &mut Tensor {
        match &mut self.scratch {
            Some(scratch) => scratch,
            None => self.original,
        }
    }

    /// Completes the call: copies scratch contents back into the original
    /// destination if one was taken, and releases the borrow.
    pub(crate) fn finish(self) -> &'a mut Tensor {
        let WorkingDest { original, scratch } = self;
        if let Some(scratch) = scratch {
            original.assign_from(&scratch);
        }
        original
    }
}
