mod chained;
mod constant;
mod param_gen;
mod random;

use std::{cell::RefCell, rc::Rc};

use rand::Rng;

use crate::{
    MlErr, Result,
    arch::{Model, Sequential, layers::Layer},
};

pub use chained::ChainedParamGen;
pub use constant::ConstParamGen;
pub use param_gen::ParamGen;
pub use random::RandParamGen;

/// Draws every parameter of the model from the generator.
///
/// # Returns
/// The flat parameter vector, or an error if the generator runs out before filling it.
pub fn generate<G: ParamGen + ?Sized>(model: &Sequential, param_gen: &mut G) -> Result<Vec<f32>> {
    let expected = model.size();
    let params = param_gen.sample(expected).unwrap_or_default();

    if params.len() != expected {
        return Err(MlErr::SizeMismatch {
            what: "generated parameters",
            got: params.len(),
            expected,
        });
    }

    Ok(params)
}

/// Sets every parameter of the model to `value`.
pub fn const_params(model: &Sequential, value: f32) -> Result<Vec<f32>> {
    generate(model, &mut ConstParamGen::new(value, model.size()))
}

/// Draws the weights and biases of every dense layer from `U(-1/sqrt(fan_in), 1/sqrt(fan_in))`.
pub fn default_params<R: Rng + 'static>(model: &Sequential, rng: Rc<RefCell<R>>) -> Result<Vec<f32>> {
    let mut param_gens: Vec<Box<dyn ParamGen>> = Vec::new();

    for layer in model.layers() {
        let Layer::Dense(dense) = layer else {
            continue;
        };

        let (fan_in, fan_out) = dense.dim();
        let weights = RandParamGen::fan_in_uniform(rng.clone(), fan_in * fan_out, fan_in)?;
        let biases = RandParamGen::fan_in_uniform(rng.clone(), fan_out, fan_in)?;
        param_gens.push(Box::new(weights));
        param_gens.push(Box::new(biases));
    }

    generate(model, &mut ChainedParamGen::new(param_gens))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn const_params_fill_the_model() {
        let model = Sequential::two_layer(2, 3, 1);
        let params = const_params(&model, 0.1).unwrap();

        assert_eq!(params, vec![0.1; 13]);
    }

    #[test]
    fn default_params_respect_each_fan_in() {
        let model = Sequential::two_layer(4, 16, 1);
        let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(7)));

        let params = default_params(&model, rng).unwrap();

        assert_eq!(params.len(), model.size());
        let (first, second) = params.split_at(5 * 16);
        assert!(first.iter().all(|p| p.abs() <= 0.5));
        assert!(second.iter().all(|p| p.abs() <= 0.25));
    }

    #[test]
    fn default_params_break_symmetry() {
        let model = Sequential::two_layer(3, 4, 1);
        let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(0)));

        let params = default_params(&model, rng).unwrap();

        // the four hidden units have distinct incoming weights
        let w1 = &params[..12];
        for (i, j) in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)] {
            let col = |k: usize| [w1[k], w1[4 + k], w1[8 + k]];
            assert_ne!(col(i), col(j));
        }
    }

    #[test]
    fn exhausted_generator_fails() {
        let model = Sequential::two_layer(2, 3, 1);
        let err = generate(&model, &mut ConstParamGen::new(0.0, 5)).unwrap_err();

        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                got: 5,
                expected: 13,
                ..
            }
        ));
    }
}
