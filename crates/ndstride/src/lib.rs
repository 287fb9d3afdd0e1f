//! Strided host tensors for the indexed-access kernels.
//!
//! The crate provides the array/view surface those kernels consume: a closed
//! set of scalar dtypes, a per-dtype storage enum, a tensor carrying explicit
//! element strides, and the two layout predicates (address aliasing, 32-bit
//! offset feasibility) that drive kernel selection.

pub mod dtype;
pub mod element;
pub mod layout;
pub mod shape;
pub mod tensor;

pub use dtype::{DType, Scalar};
pub use element::{AddElement, Element};
pub use shape::Shape;
pub use tensor::{Tensor, TensorData};
