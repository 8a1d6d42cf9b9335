use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;
use ndarray::Array2;

use super::Dataset;
use crate::{MlErr, Result};

impl Dataset {
    /// Loads a `Dataset` from a comma separated file with a header line.
    ///
    /// # Arguments
    /// * `path` - The path of the file.
    /// * `features` - The names of the columns to use as `x`, in order.
    /// * `targets` - The names of the columns to use as `y`, in order.
    ///
    /// # Returns
    /// The dataset or an error if the file can't be read, a column is missing or a value isn't a
    /// number.
    pub fn from_csv<P, S>(path: P, features: &[S], targets: &[S]) -> Result<Self>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        debug!("loading dataset from {}", path.display());

        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file), features, targets)
    }

    /// Same as `from_csv` but reading from any buffered reader.
    pub fn from_csv_reader<B, S>(reader: B, features: &[S], targets: &[S]) -> Result<Self>
    where
        B: BufRead,
        S: AsRef<str>,
    {
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Err(MlErr::EmptyDataset),
            }
        };

        let columns: Vec<&str> = header.split(',').map(clean_field).collect();
        let x_idx = column_indices(&columns, features)?;
        let y_idx = column_indices(&columns, targets)?;
        let min_fields = x_idx.iter().chain(&y_idx).max().map_or(0, |&i| i + 1);

        let mut x_data = Vec::new();
        let mut y_data = Vec::new();
        let mut nrows = 0;

        for (i, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let row = i + 1;
            let fields: Vec<&str> = line.split(',').map(clean_field).collect();

            if fields.len() < min_fields {
                return Err(MlErr::MalformedRow {
                    row,
                    got: fields.len(),
                    expected: min_fields,
                });
            }

            for &idx in &x_idx {
                x_data.push(parse_field(&fields, idx, &columns, row)?);
            }

            for &idx in &y_idx {
                y_data.push(parse_field(&fields, idx, &columns, row)?);
            }

            nrows += 1;
        }

        if nrows == 0 {
            return Err(MlErr::EmptyDataset);
        }

        let x = Array2::from_shape_vec((nrows, x_idx.len()), x_data)?;
        let y = Array2::from_shape_vec((nrows, y_idx.len()), y_data)?;
        debug!("loaded {nrows} rows, x: {:?}, y: {:?}", x.dim(), y.dim());

        Self::new(x, y)
    }
}

fn clean_field(field: &str) -> &str {
    field.trim().trim_matches('"')
}

fn column_indices<S: AsRef<str>>(columns: &[&str], names: &[S]) -> Result<Vec<usize>> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            columns
                .iter()
                .position(|&column| column == name)
                .ok_or_else(|| MlErr::MissingColumn {
                    name: name.to_string(),
                })
        })
        .collect()
}

fn parse_field(fields: &[&str], idx: usize, columns: &[&str], row: usize) -> Result<f32> {
    let value = fields[idx];

    value.parse().map_err(|_| MlErr::MalformedValue {
        row,
        column: columns[idx].to_string(),
        value: value.to_string(),
    })
}
