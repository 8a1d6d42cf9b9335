use rand::Rng;

/// A partition of row indices into a training and a testing subset.
///
/// Every row index below `len` appears in exactly one of the two subsets, in increasing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    train: Vec<usize>,
    test: Vec<usize>,
}

impl Split {
    /// Draws a split where each row independently joins the training subset with probability
    /// `train_fraction`, so the subset sizes are not an exact fraction of `len`.
    ///
    /// # Arguments
    /// * `len` - The amount of rows to split.
    /// * `train_fraction` - The probability of a row being used for training.
    /// * `rng` - A random number generator.
    pub fn bernoulli<R: Rng>(len: usize, train_fraction: f64, rng: &mut R) -> Self {
        let mut train = Vec::with_capacity(len);
        let mut test = Vec::new();

        for row in 0..len {
            if rng.random::<f64>() < train_fraction {
                train.push(row);
            } else {
                test.push(row);
            }
        }

        Self { train, test }
    }

    pub fn train(&self) -> &[usize] {
        &self.train
    }

    pub fn test(&self) -> &[usize] {
        &self.test
    }

    /// Returns the total amount of rows.
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn every_row_lands_in_exactly_one_partition() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let split = Split::bernoulli(100, 0.75, &mut rng);

            let mut seen = vec![0; 100];
            for &row in split.train().iter().chain(split.test()) {
                seen[row] += 1;
            }

            assert!(seen.iter().all(|&count| count == 1));
        }
    }

    #[test]
    fn degenerate_fractions() {
        let mut rng = StdRng::seed_from_u64(3);

        let split = Split::bernoulli(10, 1.0, &mut rng);
        assert_eq!(split.train().len(), 10);
        assert!(split.test().is_empty());

        let split = Split::bernoulli(10, 0.0, &mut rng);
        assert!(split.train().is_empty());
        assert_eq!(split.test().len(), 10);
    }

    #[test]
    fn same_seed_same_split() {
        let a = Split::bernoulli(50, 0.5, &mut StdRng::seed_from_u64(9));
        let b = Split::bernoulli(50, 0.5, &mut StdRng::seed_from_u64(9));

        assert_eq!(a, b);
    }
}
