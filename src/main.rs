use anyhow::Context;
use log::info;

use voxel_regression::{
    configs::RunConfig,
    pipeline::{run_synthetic, run_voxel},
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = RunConfig::from_env().context("failed to load the run config")?;

    let losses = run_synthetic(&config.synthetic).context("synthetic run failed")?;
    if let Some(loss) = losses.last() {
        info!("synthetic run finished with loss={loss}");
    }

    let outcome = run_voxel(&config.voxel).with_context(|| {
        format!("voxel run over {} failed", config.voxel.path.display())
    })?;
    info!(
        "voxel run finished: {} training rows, {} testing rows, test sse={}",
        outcome.train_len,
        outcome.test_len,
        outcome.report.sse()
    );

    Ok(())
}
