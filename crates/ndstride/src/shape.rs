//! Lightweight wrapper for tensor shapes and dimension bookkeeping.

/// Stores the logical dimensions of a tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Constructs a new shape from the provided dimensions.
    ///
    /// Panics if `dims` is empty, ensuring every tensor has at least one
    /// axis. A zero-sized axis (e.g. `[0]`) is the way to express an empty
    /// tensor.
    pub fn new<D: Into<Vec<usize>>>(dims: D) -> Self {
        let dims = dims.into();
        assert!(!dims.is_empty(), "shape must have at least one dimension");
        Shape { dims }
    }

    /// Borrow the raw dimension slice for downstream calculations.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the rank (number of axes) of the shape.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Computes the total number of elements implied by the shape.
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Row-major (innermost-last) element strides for this shape.
    pub fn contiguous_strides(&self) -> Vec<usize> {
        let mut strides = vec![0; self.dims.len()];
        let mut acc = 1usize;
        for (i, dim) in self.dims.iter().enumerate().rev() {
            strides[i] = acc;
            acc *= *dim;
        }
        strides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_strides_are_row_major() {
        let shape = Shape::new(vec![2, 3, 4]);
        assert_eq!(shape.contiguous_strides(), vec![12, 4, 1]);
        assert_eq!(shape.num_elements(), 24);
    }

    #[test]
    fn zero_sized_axis_yields_empty_tensor() {
        let shape = Shape::new(vec![3, 0, 2]);
        assert_eq!(shape.num_elements(), 0);
        assert_eq!(shape.rank(), 3);
    }
}
