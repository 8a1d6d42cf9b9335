use ndarray::{Array2, ArrayView2};

use super::{Model, layers::Layer};
use crate::{MlErr, Result, param_manager::ParamManager};

/// A sequential model: information flows forward when computing an output and backward when
/// computing the *deltas* of its layers.
#[derive(Clone, Debug)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    /// Creates a new `Sequential`.
    ///
    /// # Arguments
    /// * `layers` - The layers the sequential is composed of.
    ///
    /// # Returns
    /// A new `Sequential` instance, or an error if a layer's output features don't match the next
    /// layer's input features.
    pub fn new<I>(layers: I) -> Result<Self>
    where
        I: IntoIterator<Item = Layer>,
    {
        let layers: Vec<Layer> = layers.into_iter().collect();

        for pair in layers.windows(2) {
            if pair[0].dim_out() != pair[1].dim_in() {
                return Err(MlErr::SizeMismatch {
                    what: "chained layer features",
                    got: pair[1].dim_in(),
                    expected: pair[0].dim_out(),
                });
            }
        }

        Ok(Self { layers })
    }

    /// Builds the `Linear → ReLU → Linear` network.
    ///
    /// # Arguments
    /// * `d_in` - The amount of input features.
    /// * `hidden` - The width of the hidden layer.
    /// * `d_out` - The amount of output features.
    pub fn two_layer(d_in: usize, hidden: usize, d_out: usize) -> Self {
        Self {
            layers: vec![
                Layer::dense((d_in, hidden)),
                Layer::relu(hidden),
                Layer::dense((hidden, d_out)),
            ],
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns the amount of features the model receives.
    pub fn dim_in(&self) -> Option<usize> {
        self.layers.first().map(Layer::dim_in)
    }

    /// Returns the amount of features the model outputs.
    pub fn dim_out(&self) -> Option<usize> {
        self.layers.last().map(Layer::dim_out)
    }
}

impl Model for Sequential {
    fn size(&self) -> usize {
        self.layers.iter().map(|layer| layer.size()).sum()
    }

    fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(|layer| layer.size()).collect()
    }

    fn forward(&mut self, param_manager: &ParamManager, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let nlayers = self.layers.len();
        let mut front = param_manager.front();
        let mut x = x.to_owned();

        for (i, layer) in self.layers.iter_mut().enumerate() {
            let params = front.next().ok_or_else(|| MlErr::SizeMismatch {
                what: "layers",
                got: i,
                expected: nlayers,
            })?;

            x = layer.forward(params, x.view())?;
        }

        Ok(x)
    }

    fn backward(&mut self, param_manager: &mut ParamManager, mut d: Array2<f32>) -> Result<()> {
        let nlayers = self.layers.len();
        let mut back = param_manager.back();

        for (i, layer) in self.layers.iter_mut().rev().enumerate() {
            let (params, grad) = back.next().ok_or_else(|| MlErr::SizeMismatch {
                what: "layers",
                got: i,
                expected: nlayers,
            })?;

            d = layer.backward(params, grad, d.view())?;
        }

        Ok(())
    }
}
