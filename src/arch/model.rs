use ndarray::{Array2, ArrayView2};

use crate::{Result, param_manager::ParamManager};

/// A differentiable model whose parameters live outside of it, in a `ParamManager`.
pub trait Model {
    /// Returns the amount of parameters in the model.
    fn size(&self) -> usize;

    /// Returns the amount of parameters of each layer, in forward order.
    fn layer_sizes(&self) -> Vec<usize>;

    /// Makes a forward pass through the model, caching what the backward pass needs.
    ///
    /// # Arguments
    /// * `param_manager` - The manager of parameters.
    /// * `x` - The input batch, one sample per row.
    ///
    /// # Returns
    /// The prediction for the given input or an error if occurred.
    fn forward(&mut self, param_manager: &ParamManager, x: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Propagates the gradient of the loss with respect to the last forward pass' output back
    /// through the model, writing the gradient of every parameter into `param_manager`.
    ///
    /// # Arguments
    /// * `param_manager` - The manager of parameters.
    /// * `d` - The gradient of the loss with respect to the model's output.
    fn backward(&mut self, param_manager: &mut ParamManager, d: Array2<f32>) -> Result<()>;
}
