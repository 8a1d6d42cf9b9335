use std::num::NonZeroUsize;

use log::{debug, info};
use ndarray::{Array2, ArrayView2};

use crate::{
    Result,
    arch::{Model, loss::LossFn},
    optimization::Optimizer,
    param_manager::ParamManager,
};

/// A model trainer. Contains the relevant components needed for training a model, including the
/// model itself.
///
/// Every iteration processes the whole batch: forward pass, loss, zeroing of the gradient,
/// backward pass and parameter update. Training stops after a fixed amount of iterations, the loss
/// is never checked for convergence nor for divergence.
pub struct ModelTrainer<M, O, L>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
{
    model: M,
    optimizer: O,
    loss_fn: L,

    iterations: usize,
    report_every: NonZeroUsize,
}

impl<M, O, L> ModelTrainer<M, O, L>
where
    M: Model,
    O: Optimizer,
    L: LossFn,
{
    /// Returns a new `ModelTrainer`.
    ///
    /// # Arguments
    /// * `model` - The model that will be trained.
    /// * `optimizer` - The optimizer used to update the parameters on each iteration.
    /// * `loss_fn` - The loss function used to measure the difference between a model's output and the expected one.
    /// * `iterations` - The amount of iterations to run per `train` call.
    /// * `report_every` - The period, in iterations, of the progress logs.
    pub fn new(
        model: M,
        optimizer: O,
        loss_fn: L,
        iterations: usize,
        report_every: NonZeroUsize,
    ) -> Self {
        Self {
            model,
            optimizer,
            loss_fn,
            iterations,
            report_every,
        }
    }

    /// Runs a single training iteration over the whole batch.
    ///
    /// # Arguments
    /// * `param_manager` - The manager of parameters for this training.
    /// * `x` - The input batch.
    /// * `y` - The expected output batch.
    ///
    /// # Returns
    /// The loss of the batch before the parameters were updated.
    pub fn step(
        &mut self,
        param_manager: &mut ParamManager,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
    ) -> Result<f32> {
        let y_pred = self.model.forward(param_manager, x)?;
        let loss = self.loss_fn.loss(y_pred.view(), y)?;

        param_manager.zero_grad();
        let d = self.loss_fn.loss_prime(y_pred.view(), y)?;
        self.model.backward(param_manager, d)?;

        param_manager.optimize(&mut self.optimizer)?;
        Ok(loss)
    }

    /// Performs `iterations` training iterations of its model over the given batch.
    ///
    /// # Arguments
    /// * `param_manager` - The manager of parameters for this training.
    /// * `x` - The input batch.
    /// * `y` - The expected output batch.
    ///
    /// # Returns
    /// The loss of every iteration, each computed before that iteration's update.
    pub fn train(
        &mut self,
        param_manager: &mut ParamManager,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
    ) -> Result<Vec<f32>> {
        debug!(
            "training for {} iterations over x: {:?}, y: {:?}",
            self.iterations,
            x.dim(),
            y.dim()
        );

        let mut losses = Vec::with_capacity(self.iterations);

        for t in 0..self.iterations {
            let loss = self.step(param_manager, x, y)?;

            if (t + 1) % self.report_every == 0 {
                info!(iteration = t, loss = loss; "iteration {t}: loss={loss}");
            }

            losses.push(loss);
        }

        Ok(losses)
    }

    /// Computes the model's prediction without touching the gradient.
    pub fn predict(&mut self, param_manager: &ParamManager, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        self.model.forward(param_manager, x)
    }

    /// Computes the loss of the model's prediction for `x` against `y`.
    pub fn evaluate(
        &mut self,
        param_manager: &ParamManager,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
    ) -> Result<f32> {
        let y_pred = self.predict(param_manager, x)?;
        self.loss_fn.loss(y_pred.view(), y)
    }
}
