use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use ndarray::ShapeError;

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, MlErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum MlErr {
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    ShapeMismatch {
        what: &'static str,
        got: (usize, usize),
        expected: (usize, usize),
    },
    MissingColumn {
        name: String,
    },
    MalformedValue {
        row: usize,
        column: String,
        value: String,
    },
    MalformedRow {
        row: usize,
        got: usize,
        expected: usize,
    },
    EmptyDataset,
    EmptySplit {
        partition: &'static str,
    },
    Distribution(String),
    Shape(ShapeError),
    Config(serde_json::Error),
    Io(io::Error),
}

impl Display for MlErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a size mismatch for {what}, got {got} and expected {expected}"
            ),
            MlErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "There's a shape mismatch for {what}, got {got:?} and expected {expected:?}"
            ),
            MlErr::MissingColumn { name } => {
                write!(f, "The column {name:?} is not present in the dataset header")
            }
            MlErr::MalformedValue { row, column, value } => write!(
                f,
                "Failed to parse {value:?} as a number at row {row}, column {column:?}"
            ),
            MlErr::MalformedRow { row, got, expected } => write!(
                f,
                "The row {row} has {got} fields but at least {expected} were expected"
            ),
            MlErr::EmptyDataset => write!(f, "The dataset has no rows"),
            MlErr::EmptySplit { partition } => {
                write!(f, "The {partition} partition of the split is empty")
            }
            MlErr::Distribution(msg) => write!(f, "invalid distribution: {msg}"),
            MlErr::Shape(e) => write!(f, "shape error: {e}"),
            MlErr::Config(e) => write!(f, "config error: {e}"),
            MlErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for MlErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MlErr::Shape(e) => Some(e),
            MlErr::Config(e) => Some(e),
            MlErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MlErr {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for MlErr {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

impl From<ShapeError> for MlErr {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}
