use std::mem;

use crate::{MlErr, Result, optimization::Optimizer};

/// The manager of the model's parameters.
///
/// Holds the trainable values and their gradient in two independent flat buffers, and slices them
/// into each layer's chunk when traversing the model's layers forwards and backwards.
#[derive(Debug, Clone)]
pub struct ParamManager {
    params: Vec<f32>,
    grad: Vec<f32>,
    layer_sizes: Vec<usize>,
}

impl ParamManager {
    /// Creates a new `ParamManager`.
    ///
    /// # Arguments
    /// * `params` - The initial values of every parameter of the model.
    /// * `layer_sizes` - The amount of parameters each layer takes, in forward order.
    ///
    /// # Returns
    /// A new `ParamManager` instance or an error if the sizes don't add up to the amount of
    /// parameters.
    pub fn new(params: Vec<f32>, layer_sizes: Vec<usize>) -> Result<Self> {
        let expected: usize = layer_sizes.iter().sum();

        if params.len() != expected {
            return Err(MlErr::SizeMismatch {
                what: "parameters",
                got: params.len(),
                expected,
            });
        }

        Ok(Self {
            grad: vec![0.0; params.len()],
            params,
            layer_sizes,
        })
    }

    pub fn params(&self) -> &[f32] {
        &self.params
    }

    pub fn grad(&self) -> &[f32] {
        &self.grad
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    /// Creates a new `FrontIter` parameter iterator.
    ///
    /// The returned iterator iterates the model's layers forward.
    pub fn front(&self) -> FrontIter<'_> {
        FrontIter {
            params: &self.params,
            layer_sizes: &self.layer_sizes,
        }
    }

    /// Creates a new `BackIter` parameter iterator.
    ///
    /// The returned iterator iterates the model's layers backwards.
    pub fn back(&mut self) -> BackIter<'_> {
        BackIter {
            params: &self.params,
            grad: &mut self.grad,
            layer_sizes: &self.layer_sizes,
        }
    }

    /// Applies the gradient onto the parameters of the model.
    ///
    /// # Arguments
    /// * `optimizer` - The optimizer dictating the update rule.
    pub fn optimize<O: Optimizer>(&mut self, optimizer: &mut O) -> Result<()> {
        optimizer.update_params(&mut self.params, &self.grad)
    }

    /// Zeros out the gradient.
    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }
}

/// A model's layer iterator.
///
/// This iterator yields each layer's parameters from the front.
pub struct FrontIter<'pm> {
    params: &'pm [f32],
    layer_sizes: &'pm [usize],
}

impl<'pm> Iterator for FrontIter<'pm> {
    type Item = &'pm [f32];

    fn next(&mut self) -> Option<Self::Item> {
        let (&size, rest) = self.layer_sizes.split_first()?;
        self.layer_sizes = rest;

        let (head, tail) = self.params.split_at(size);
        self.params = tail;
        Some(head)
    }
}

/// A model's layer iterator.
///
/// This iterator yields each layer's parameters and gradient from the back.
pub struct BackIter<'pm> {
    params: &'pm [f32],
    grad: &'pm mut [f32],
    layer_sizes: &'pm [usize],
}

impl<'pm> Iterator for BackIter<'pm> {
    type Item = (&'pm [f32], &'pm mut [f32]);

    fn next(&mut self) -> Option<Self::Item> {
        let (&size, rest) = self.layer_sizes.split_last()?;
        self.layer_sizes = rest;

        let mid = self.params.len() - size;
        let (params_head, params_tail) = self.params.split_at(mid);
        self.params = params_head;

        let grad = mem::take(&mut self.grad);
        let (grad_head, grad_tail) = grad.split_at_mut(mid);
        self.grad = grad_head;

        Some((params_tail, grad_tail))
    }
}
