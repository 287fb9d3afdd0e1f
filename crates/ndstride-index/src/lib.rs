//! Indexed read/write kernels over strided tensors.
//!
//! Four operations are exposed: [`gather`], [`scatter`], [`scatter_fill`],
//! and [`scatter_add`]. Each validates shapes up front, routes writes
//! through an aliasing guard when the destination layout can self-overlap,
//! and then dispatches a loop specialized on element type, address width
//! (32 vs 64-bit offset arithmetic), and index-tensor rank (1/2/3 unrolled,
//! generic otherwise).

mod check;
mod guard;
mod info;
mod kernel;

pub mod error;
pub mod ops;

pub use error::{IndexOpError, Result};
pub use info::MAX_RANK;
pub use ops::{gather, scatter, scatter_add, scatter_fill};
