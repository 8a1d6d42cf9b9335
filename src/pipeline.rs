use std::{cell::RefCell, rc::Rc};

use log::{debug, info, warn};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    MlErr, Result,
    arch::{Model, Sequential, loss::Sse},
    configs::{SyntheticConfig, VoxelConfig},
    dataset::{Dataset, Split},
    initialization,
    optimization::GradientDescent,
    param_manager::ParamManager,
    report::PredictionReport,
    training::ModelTrainer,
};

/// The result of a voxel regression run.
#[derive(Debug, Clone)]
pub struct VoxelOutcome {
    pub train_len: usize,
    pub test_len: usize,
    pub losses: Vec<f32>,
    pub report: PredictionReport,
}

/// Creates the random number generator of a run, seeded when `seed` is set.
pub fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn param_manager(model: &Sequential, rng: Rc<RefCell<StdRng>>) -> Result<ParamManager> {
    let params = initialization::default_params(model, rng)?;
    ParamManager::new(params, model.layer_sizes())
}

/// Fits a two layer network to standard normal targets from standard normal inputs.
///
/// # Returns
/// The loss of every iteration.
pub fn run_synthetic(config: &SyntheticConfig) -> Result<Vec<f32>> {
    let rng = Rc::new(RefCell::new(generate_rng(config.seed)));

    let dataset = Dataset::synthetic(
        config.batch_size,
        config.d_in,
        config.d_out,
        &mut *rng.borrow_mut(),
    );

    let model = Sequential::two_layer(config.d_in, config.hidden, config.d_out);
    let mut param_manager = param_manager(&model, rng)?;
    info!(
        "synthetic run: x: {:?}, y: {:?}, {} parameters",
        dataset.x().dim(),
        dataset.y().dim(),
        model.size()
    );

    let optimizer = GradientDescent::new(config.learning_rate);
    let mut trainer = ModelTrainer::new(
        model,
        optimizer,
        Sse::new(),
        config.iterations,
        config.report_every,
    );

    trainer.train(&mut param_manager, dataset.x(), dataset.y())
}

/// Predicts the target columns of a voxel dataset from its feature columns.
///
/// Loads the CSV at `config.path`, trains on a random partition of the rows and evaluates the
/// model on the remaining ones.
pub fn run_voxel(config: &VoxelConfig) -> Result<VoxelOutcome> {
    let rng = Rc::new(RefCell::new(generate_rng(config.seed)));

    let dataset = Dataset::from_csv(&config.path, &config.features, &config.targets)?;
    info!(
        "loaded {} rows from {}",
        dataset.len(),
        config.path.display()
    );

    let split = Split::bernoulli(dataset.len(), config.train_fraction, &mut *rng.borrow_mut());
    if split.train().is_empty() {
        return Err(MlErr::EmptySplit {
            partition: "training",
        });
    }
    if split.test().is_empty() {
        return Err(MlErr::EmptySplit {
            partition: "testing",
        });
    }

    let (train, test) = dataset.split(&split)?;
    info!(
        "x_train: {:?}, y_train: {:?}, x_test: {:?}, y_test: {:?}",
        train.x().dim(),
        train.y().dim(),
        test.x().dim(),
        test.y().dim()
    );

    let model = Sequential::two_layer(dataset.x_size(), config.hidden, dataset.y_size());
    let mut param_manager = param_manager(&model, rng)?;

    let optimizer = GradientDescent::new(config.learning_rate);
    let mut trainer = ModelTrainer::new(
        model,
        optimizer,
        Sse::new(),
        config.iterations,
        config.report_every,
    );

    let losses = trainer.train(&mut param_manager, train.x(), train.y())?;

    let y_pred = trainer.predict(&param_manager, test.x())?;
    let report = PredictionReport::new(y_pred.view(), test.y())?;

    let sse = report.sse();
    match report.pearson() {
        Some(r) => info!(sse = sse, pearson = r; "test sse={sse}, pearson r={r}"),
        None => warn!(sse = sse; "test sse={sse}, pearson r is undefined"),
    }

    if let Some(path) = &config.predictions_path {
        report.save(path)?;
        debug!("predictions written to {}", path.display());
    }

    Ok(VoxelOutcome {
        train_len: train.len(),
        test_len: test.len(),
        losses,
        report,
    })
}

#[cfg(test)]
mod tests {
    use std::{env, fs, num::NonZeroUsize, path::PathBuf, process};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("voxel_regression_{}_{name}", process::id()))
    }

    fn write_voxels(name: &str, rows: usize) -> PathBuf {
        let mut csv = String::from("\"FLAIR\",\"PD\",\"T1\"\n");
        for i in 0..rows {
            let pd = (i % 7) as f32 * 0.1;
            let t1 = (i % 5) as f32 * 0.2;
            csv.push_str(&format!("{},{pd},{t1}\n", 0.5 * pd - 0.3 * t1 + 0.1));
        }

        let path = temp_path(name);
        fs::write(&path, csv).unwrap();
        path
    }

    fn voxel_config(path: PathBuf) -> VoxelConfig {
        VoxelConfig {
            path,
            features: vec!["PD".into(), "T1".into()],
            targets: vec!["FLAIR".into()],
            hidden: 4,
            iterations: 20,
            report_every: NonZeroUsize::new(5).unwrap(),
            seed: Some(11),
            ..Default::default()
        }
    }

    #[test]
    fn seeded_rngs_agree() {
        use rand::Rng;

        let a: u64 = generate_rng(Some(3)).random();
        let b: u64 = generate_rng(Some(3)).random();
        assert_eq!(a, b);
    }

    #[test]
    fn synthetic_run_reports_every_iteration() {
        let config = SyntheticConfig {
            batch_size: 8,
            d_in: 5,
            hidden: 4,
            d_out: 2,
            iterations: 30,
            seed: Some(1),
            ..Default::default()
        };

        let losses = run_synthetic(&config).unwrap();

        assert_eq!(losses.len(), 30);
        assert!(losses.iter().all(|l| l.is_finite() && *l >= 0.0));
        assert_eq!(losses, run_synthetic(&config).unwrap());
    }

    #[test]
    fn voxel_run_partitions_every_row() {
        let path = write_voxels("partitions.csv", 40);
        let predictions = temp_path("partitions_predictions.csv");
        let config = VoxelConfig {
            predictions_path: Some(predictions.clone()),
            ..voxel_config(path.clone())
        };

        let outcome = run_voxel(&config).unwrap();

        assert_eq!(outcome.train_len + outcome.test_len, 40);
        assert_eq!(outcome.losses.len(), 20);
        assert_eq!(outcome.report.len(), outcome.test_len);

        let written = fs::read_to_string(&predictions).unwrap();
        assert_eq!(written.lines().next(), Some("predicted,actual"));
        assert_eq!(written.lines().count(), outcome.test_len + 1);

        fs::remove_file(path).unwrap();
        fs::remove_file(predictions).unwrap();
    }

    #[test]
    fn voxel_run_rejects_empty_partitions() {
        let path = write_voxels("empty_partitions.csv", 10);

        let all_test = VoxelConfig {
            train_fraction: 0.0,
            ..voxel_config(path.clone())
        };
        assert!(matches!(
            run_voxel(&all_test),
            Err(MlErr::EmptySplit {
                partition: "training"
            })
        ));

        let all_train = VoxelConfig {
            train_fraction: 1.0,
            ..voxel_config(path.clone())
        };
        assert!(matches!(
            run_voxel(&all_train),
            Err(MlErr::EmptySplit {
                partition: "testing"
            })
        ));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn voxel_run_fails_on_missing_file() {
        let config = voxel_config(temp_path("does_not_exist.csv"));
        assert!(matches!(run_voxel(&config), Err(MlErr::Io(_))));
    }
}
