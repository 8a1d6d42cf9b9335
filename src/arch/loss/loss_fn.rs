use ndarray::{Array2, ArrayView2};

use crate::Result;

pub trait LossFn {
    /// Computes the scalar loss of a prediction.
    fn loss(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<f32>;

    /// Computes the gradient of the loss with respect to the prediction.
    fn loss_prime(&self, y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Array2<f32>>;
}
