//! Data loading utilities

use crate::error::{ResampleError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fs::File;
use tracing::debug;

/// CSV reader for labelled datasets
pub struct DataLoader {
    /// Field separator
    separator: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self { separator: b',' }
    }

    /// Set the field separator
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Load a CSV file; the first line must hold the column names
    pub fn load_csv(&self, path: &str) -> Result<DataFrame> {
        let file = File::open(path)
            .map_err(|e| ResampleError::DataError(format!("{}: {}", path, e)))?;

        let parse_opts = CsvParseOptions::default().with_separator(self.separator);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()?;

        debug!(path, rows = df.height(), cols = df.width(), "loaded csv");
        Ok(df)
    }

    /// Load a CSV file and split it into features and the `target` column
    pub fn load_labelled(&self, path: &str, target: &str) -> Result<LabelledData> {
        let df = self.load_csv(path)?;
        LabelledData::from_dataframe(&df, target)
    }
}

/// Feature matrix and integer labels, with the column names they came from
#[derive(Debug, Clone)]
pub struct LabelledData {
    pub x: Array2<f64>,
    pub y: Array1<i64>,
    pub feature_names: Vec<String>,
    pub target: String,
}

impl LabelledData {
    /// Every column except `target` becomes a feature, in file order
    pub fn from_dataframe(df: &DataFrame, target: &str) -> Result<Self> {
        let feature_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != target)
            .map(|s| s.to_string())
            .collect();

        let y = Self::label_column(df, target)?;
        let x = Self::feature_matrix(df, &feature_names)?;

        Ok(Self {
            x,
            y,
            feature_names,
            target: target.to_string(),
        })
    }

    fn label_column(df: &DataFrame, target: &str) -> Result<Array1<i64>> {
        let column = df
            .column(target)
            .map_err(|_| ResampleError::FeatureNotFound(target.to_string()))?;
        let cast = column.cast(&DataType::Int64)?;

        cast.as_materialized_series()
            .i64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.ok_or_else(|| {
                    ResampleError::DataError(format!(
                        "label column '{}' has a missing or non-integer value in row {}",
                        target, row
                    ))
                })
            })
            .collect()
    }

    /// Named columns as a row-major matrix
    fn feature_matrix(df: &DataFrame, names: &[String]) -> Result<Array2<f64>> {
        let col_data: Vec<Vec<f64>> = names
            .iter()
            .map(|name| {
                let column = df
                    .column(name)
                    .map_err(|_| ResampleError::FeatureNotFound(name.clone()))?;
                let cast = column.cast(&DataType::Float64)?;
                cast.as_materialized_series()
                    .f64()?
                    .into_iter()
                    .map(|v| {
                        v.ok_or_else(|| {
                            ResampleError::DataError(format!(
                                "feature column '{}' has missing or non-numeric values",
                                name
                            ))
                        })
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        Ok(Array2::from_shape_fn((df.height(), names.len()), |(r, c)| {
            col_data[c][r]
        }))
    }

    /// Feature columns followed by the target column
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        if self.feature_names.len() != self.x.ncols() {
            return Err(ResampleError::ShapeError {
                expected: format!("{} feature columns", self.feature_names.len()),
                actual: format!("{} columns", self.x.ncols()),
            });
        }

        let mut columns: Vec<Column> = self
            .feature_names
            .iter()
            .zip(self.x.columns())
            .map(|(name, values)| Column::new(name.as_str().into(), values.to_vec()))
            .collect();
        columns.push(Column::new(self.target.as_str().into(), self.y.to_vec()));

        Ok(DataFrame::new(columns)?)
    }

    /// Copy with `x`/`y` replaced, keeping the column names
    pub fn with_data(&self, x: Array2<f64>, y: Array1<i64>) -> Self {
        Self {
            x,
            y,
            feature_names: self.feature_names.clone(),
            target: self.target.clone(),
        }
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }
}

/// Save DataFrame to disk
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV
    pub fn save_csv(df: &mut DataFrame, path: &str) -> Result<()> {
        let mut file = File::create(path)
            .map_err(|e| ResampleError::DataError(format!("{}: {}", path, e)))?;

        CsvWriter::new(&mut file).finish(df)?;
        debug!(path, rows = df.height(), "saved csv");
        Ok(())
    }
}
