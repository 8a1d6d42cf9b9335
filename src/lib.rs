pub mod arch;
pub mod configs;
pub mod dataset;
pub mod error;
pub mod initialization;
pub mod optimization;
pub mod param_manager;
pub mod pipeline;
pub mod report;
mod test;
pub mod training;

pub use error::{MlErr, Result};
