#![cfg(test)]

use std::num::NonZeroUsize;

use ndarray::{Array2, ArrayView2, array};

use crate::{
    arch::{
        Model, Sequential,
        loss::{LossFn, Sse},
    },
    configs::SyntheticConfig,
    initialization,
    optimization::GradientDescent,
    param_manager::ParamManager,
    pipeline,
    training::ModelTrainer,
};

const REPORT_EVERY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

fn golden_batch() -> (Array2<f32>, Array2<f32>) {
    let x = array![[1., 2.], [2., 1.], [3., 4.], [4., 3.]];
    let y = array![[1.], [2.], [3.], [4.]];
    (x, y)
}

fn golden_setup(
    learning_rate: f32,
    iterations: usize,
) -> (ModelTrainer<Sequential, GradientDescent, Sse>, ParamManager) {
    let model = Sequential::two_layer(2, 3, 1);
    let params = initialization::const_params(&model, 0.1).unwrap();
    let param_manager = ParamManager::new(params, model.layer_sizes()).unwrap();

    let optimizer = GradientDescent::new(learning_rate);
    let trainer = ModelTrainer::new(model, optimizer, Sse::new(), iterations, REPORT_EVERY);
    (trainer, param_manager)
}

fn assert_close(got: f32, expected: f32) {
    let tolerance = 1e-4 * expected.abs().max(1.0);
    assert!(
        (got - expected).abs() <= tolerance,
        "got {got}, expected {expected}"
    );
}

#[test]
fn test_golden_loss_history() {
    let (x, y) = golden_batch();
    let (mut trainer, mut param_manager) = golden_setup(0.01, 10);

    let losses = trainer.train(&mut param_manager, x.view(), y.view()).unwrap();

    let expected = [
        24.248, 14.288953, 3.6712182, 1.2261781, 1.1419439, 1.0837717, 1.0355514, 0.9905791,
        0.9475712, 0.9061246,
    ];
    assert_eq!(losses.len(), expected.len());
    for (&got, &expected) in losses.iter().zip(&expected) {
        assert_close(got, expected);
    }

    let loss = trainer.evaluate(&param_manager, x.view(), y.view()).unwrap();
    assert_close(loss, 0.8660979);
}

#[test]
fn test_prediction_shape() {
    let (x, _) = golden_batch();
    let (mut trainer, param_manager) = golden_setup(0.01, 0);

    let y_pred = trainer.predict(&param_manager, x.view()).unwrap();

    assert_eq!(y_pred.dim(), (4, 1));
    // 0.1 * (0.1 * 3 + 0.1) * 3 + 0.1 for the first sample
    assert_close(y_pred[[0, 0]], 0.22);
}

#[test]
fn test_loss_decreases_on_golden_batch() {
    let (x, y) = golden_batch();
    let (mut trainer, mut param_manager) = golden_setup(0.01, 500);

    let losses = trainer.train(&mut param_manager, x.view(), y.view()).unwrap();
    let first = losses[0];
    let last = trainer.evaluate(&param_manager, x.view(), y.view()).unwrap();

    assert!(last < first);
    assert!(last < 1e-3, "loss {last} did not converge");
}

#[test]
fn test_loss_decreases_on_synthetic_batch() {
    let config = SyntheticConfig {
        batch_size: 16,
        d_in: 8,
        hidden: 16,
        d_out: 2,
        learning_rate: 1e-4,
        iterations: 500,
        seed: Some(42),
        ..Default::default()
    };

    let losses = pipeline::run_synthetic(&config).unwrap();

    assert_eq!(losses.len(), 500);
    assert!(losses[499] < losses[0]);
}

#[test]
fn test_zero_learning_rate_leaves_params_untouched() {
    let (x, y) = golden_batch();
    let (mut trainer, mut param_manager) = golden_setup(0.0, 5);
    let before: Vec<u32> = param_manager.params().iter().map(|p| p.to_bits()).collect();

    let losses = trainer.train(&mut param_manager, x.view(), y.view()).unwrap();

    let after: Vec<u32> = param_manager.params().iter().map(|p| p.to_bits()).collect();
    assert_eq!(before, after);
    assert!(losses.iter().all(|&l| l == losses[0]));
    assert!(param_manager.grad().iter().any(|&g| g != 0.0));
}

fn loss_at(model: &mut Sequential, params: Vec<f32>, x: ArrayView2<f32>, y: ArrayView2<f32>) -> f32 {
    let param_manager = ParamManager::new(params, model.layer_sizes()).unwrap();
    let y_pred = model.forward(&param_manager, x).unwrap();
    Sse.loss(y_pred.view(), y).unwrap()
}

#[test]
fn test_gradient_matches_finite_differences() {
    // every hidden pre-activation is at least 0.1 away from zero
    #[rustfmt::skip]
    let params = vec![
        0.5, -0.3, 0.2,
        0.1, 0.4, -0.6,
        0.1, 0.2, -0.1,
        0.7, -0.5, 0.3,
        0.05,
    ];
    let x = array![[1., 2.], [3., 1.], [-1., 0.5]];
    let y = array![[1.], [0.], [2.]];

    let mut model = Sequential::two_layer(2, 3, 1);
    let mut param_manager = ParamManager::new(params.clone(), model.layer_sizes()).unwrap();

    let y_pred = model.forward(&param_manager, x.view()).unwrap();
    let d = Sse.loss_prime(y_pred.view(), y.view()).unwrap();
    param_manager.zero_grad();
    model.backward(&mut param_manager, d).unwrap();
    let grad = param_manager.grad().to_vec();

    let eps = 1e-2;
    for (i, &g) in grad.iter().enumerate() {
        let mut plus = params.clone();
        plus[i] += eps;
        let mut minus = params.clone();
        minus[i] -= eps;

        let numeric = (loss_at(&mut model, plus, x.view(), y.view())
            - loss_at(&mut model, minus, x.view(), y.view()))
            / (2.0 * eps);

        assert!(
            (numeric - g).abs() <= 1e-2 * g.abs().max(1.0),
            "parameter {i}: analytic {g}, numeric {numeric}"
        );
    }
}
