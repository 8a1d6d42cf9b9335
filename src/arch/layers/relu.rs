use ndarray::{Array2, ArrayView2};

use crate::{MlErr, Result};

/// Rectified linear unit, `max(0, x)` applied elementwise.
///
/// An input of exactly `0.0` is treated as non-positive: it outputs `0.0` and lets no gradient
/// through.
#[derive(Clone, Debug)]
pub struct Relu {
    dim: usize,
    x: Array2<f32>,
}

impl Relu {
    /// Creates a new `Relu` layer.
    ///
    /// # Arguments
    /// * `dim` - The amount of features it receives and outputs.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            x: Array2::zeros((0, dim)),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn forward(&mut self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        if x.ncols() != self.dim {
            return Err(MlErr::SizeMismatch {
                what: "relu input features",
                got: x.ncols(),
                expected: self.dim,
            });
        }

        self.x = x.to_owned();

        // NaN goes through untouched.
        Ok(x.mapv(|x| if x < 0.0 { 0.0 } else { x }))
    }

    pub fn backward(&mut self, d: ArrayView2<f32>) -> Result<Array2<f32>> {
        if d.dim() != self.x.dim() {
            return Err(MlErr::ShapeMismatch {
                what: "relu output delta",
                got: d.dim(),
                expected: self.x.dim(),
            });
        }

        let mut d = d.to_owned();
        d.zip_mut_with(&self.x, |d, &x| *d = if x > 0.0 { *d } else { 0.0 });

        Ok(d)
    }
}
