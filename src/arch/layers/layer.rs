use ndarray::{Array2, ArrayView2};

use super::{Dense, Relu};
use crate::Result;

#[derive(Clone, Debug)]
pub enum Layer {
    Dense(Dense),
    Relu(Relu),
}

impl Layer {
    pub fn dense(dim: (usize, usize)) -> Self {
        Self::Dense(Dense::new(dim))
    }

    pub fn relu(dim: usize) -> Self {
        Self::Relu(Relu::new(dim))
    }

    /// Returns the amount of parameters of the layer.
    pub fn size(&self) -> usize {
        match self {
            Self::Dense(l) => l.size(),
            Self::Relu(_) => 0,
        }
    }

    /// Returns the amount of features the layer receives.
    pub fn dim_in(&self) -> usize {
        match self {
            Self::Dense(l) => l.dim().0,
            Self::Relu(l) => l.dim(),
        }
    }

    /// Returns the amount of features the layer outputs.
    pub fn dim_out(&self) -> usize {
        match self {
            Self::Dense(l) => l.dim().1,
            Self::Relu(l) => l.dim(),
        }
    }

    pub fn forward(&mut self, params: &[f32], x: ArrayView2<f32>) -> Result<Array2<f32>> {
        match self {
            Self::Dense(l) => l.forward(params, x),
            Self::Relu(l) => l.forward(x),
        }
    }

    pub fn backward(
        &mut self,
        params: &[f32],
        grad: &mut [f32],
        d: ArrayView2<f32>,
    ) -> Result<Array2<f32>> {
        match self {
            Self::Dense(l) => l.backward(params, grad, d),
            Self::Relu(l) => l.backward(d),
        }
    }
}
