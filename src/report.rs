use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use ndarray::{Array1, ArrayView2};

use crate::{MlErr, Result};

/// Predicted values paired with the actual ones, the points of a prediction-vs-truth scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    predicted: Array1<f32>,
    actual: Array1<f32>,
}

impl PredictionReport {
    /// Creates a new `PredictionReport`, flattening both matrices in row-major order.
    ///
    /// # Returns
    /// A new `PredictionReport` instance or an error if the shapes differ.
    pub fn new(y_pred: ArrayView2<f32>, y: ArrayView2<f32>) -> Result<Self> {
        if y_pred.dim() != y.dim() {
            return Err(MlErr::ShapeMismatch {
                what: "prediction and target",
                got: y_pred.dim(),
                expected: y.dim(),
            });
        }

        Ok(Self {
            predicted: y_pred.iter().copied().collect(),
            actual: y.iter().copied().collect(),
        })
    }

    pub fn predicted(&self) -> &Array1<f32> {
        &self.predicted
    }

    pub fn actual(&self) -> &Array1<f32> {
        &self.actual
    }

    pub fn len(&self) -> usize {
        self.predicted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicted.is_empty()
    }

    /// Sum of squared errors between the predicted and actual values.
    pub fn sse(&self) -> f32 {
        (&self.predicted - &self.actual).mapv(|e| e * e).sum()
    }

    /// Pearson correlation coefficient between the predicted and actual values.
    ///
    /// # Returns
    /// `None` if there are less than two points or either side has no variance.
    pub fn pearson(&self) -> Option<f32> {
        if self.len() < 2 {
            return None;
        }

        let p = &self.predicted - self.predicted.mean()?;
        let a = &self.actual - self.actual.mean()?;

        let cov = p.dot(&a);
        let var = p.dot(&p) * a.dot(&a);

        if var <= 0.0 {
            return None;
        }

        Some(cov / var.sqrt())
    }

    /// Writes the points as `predicted,actual` lines preceded by a header.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "predicted,actual")?;

        for (p, a) in self.predicted.iter().zip(&self.actual) {
            writeln!(writer, "{p},{a}")?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Writes the points to a CSV file, to be plotted by an external tool.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}
