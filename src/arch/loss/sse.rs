use ndarray::{Array2, ArrayView2};

use super::LossFn;
use crate::{MlErr, Result};

/// Sum of squared errors loss function.
///
/// The squared differences are summed over every element of the batch, they are never averaged,
/// so the scale of the loss grows with the batch size.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sse;

impl Sse {
    /// Returns a new `Sse`.
    pub fn new() -> Self {
        Self
    }

    fn check_shapes(y_pred: &ArrayView2<f32>, y: &ArrayView2<f32>) -> Result<()> {
        if y_pred.dim() != y.dim() {
            return Err(MlErr::ShapeMismatch {
                what: "prediction and target",
                got: y_pred.dim(),
                expected: y.dim(),
            });
        }

        Ok(())
    }
}

impl LossFn for Sse {
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32> {
        Self::check_shapes(&y_pred, &y)?;
        Ok((&y_pred - &y).mapv(|x| x.powi(2)).sum())
    }

    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>> {
        Self::check_shapes(&y_pred, &y)?;
        Ok((&y_pred - &y) * 2.0)
    }
}
