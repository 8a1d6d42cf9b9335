mod csv;
mod split;

use ndarray::{Array2, ArrayView2, Axis};
use ndarray_rand::{RandomExt, rand_distr::StandardNormal};
use rand::Rng;

use crate::{MlErr, Result};

pub use split::Split;

/// A set of samples, each row of `x` paired with the same row of `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array2<f32>,
    y: Array2<f32>,
}

impl Dataset {
    /// Creates a new `Dataset`.
    ///
    /// # Arguments
    /// * `x` - The features, one sample per row.
    /// * `y` - The targets, one sample per row.
    ///
    /// # Returns
    /// A new `Dataset` instance or an error if `x` and `y` have a different amount of rows.
    pub fn new(x: Array2<f32>, y: Array2<f32>) -> Result<Self> {
        if x.nrows() != y.nrows() {
            return Err(MlErr::SizeMismatch {
                what: "target rows",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        Ok(Self { x, y })
    }

    /// Creates a `Dataset` of standard normal features and targets.
    ///
    /// # Arguments
    /// * `len` - The amount of samples.
    /// * `x_size` - The amount of features per sample.
    /// * `y_size` - The amount of targets per sample.
    /// * `rng` - A random number generator.
    pub fn synthetic<R: Rng>(len: usize, x_size: usize, y_size: usize, rng: &mut R) -> Self {
        let x = Array2::random_using((len, x_size), StandardNormal, rng);
        let y = Array2::random_using((len, y_size), StandardNormal, rng);
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn x_size(&self) -> usize {
        self.x.ncols()
    }

    pub fn y_size(&self) -> usize {
        self.y.ncols()
    }

    pub fn x(&self) -> ArrayView2<'_, f32> {
        self.x.view()
    }

    pub fn y(&self) -> ArrayView2<'_, f32> {
        self.y.view()
    }

    /// Copies the given rows, in the given order, into a new `Dataset`.
    ///
    /// # Panics
    /// If any row index is out of bounds.
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            x: self.x.select(Axis(0), rows),
            y: self.y.select(Axis(0), rows),
        }
    }

    /// Materializes both partitions of a split.
    ///
    /// # Returns
    /// The training and testing datasets, or an error if the split was drawn for a different
    /// amount of rows.
    pub fn split(&self, split: &Split) -> Result<(Self, Self)> {
        if split.len() != self.len() {
            return Err(MlErr::SizeMismatch {
                what: "split rows",
                got: split.len(),
                expected: self.len(),
            });
        }

        Ok((self.select(split.train()), self.select(split.test())))
    }
}
