//! Named-column tabular data used as model input.

use crate::core::PredictError;
use faer::{Col, Mat};

/// A table of named `f64` columns with a common length.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Col<f64>>,
    n_rows: usize,
}

impl DataFrame {
    /// Build a data frame from `(name, values)` pairs.
    ///
    /// Fails if columns differ in length or a name is repeated.
    pub fn new<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self, PredictError> {
        let mut frame = Self::default();
        for (name, values) in columns {
            frame = frame.with_column(name, &values)?;
        }
        Ok(frame)
    }

    /// Add a column, returning the extended frame.
    pub fn with_column<S: Into<String>>(
        mut self,
        name: S,
        values: &[f64],
    ) -> Result<Self, PredictError> {
        let name = name.into();
        if self.names.iter().any(|n| *n == name) {
            return Err(PredictError::InvalidData(format!(
                "duplicate column '{}'",
                name
            )));
        }
        if !self.names.is_empty() && values.len() != self.n_rows {
            return Err(PredictError::DimensionMismatch {
                expected: self.n_rows,
                got: values.len(),
            });
        }
        self.n_rows = values.len();
        self.names.push(name);
        self.columns.push(Col::from_fn(values.len(), |i| values[i]));
        Ok(self)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.names.len()
    }

    /// Column names, in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if a column called `name` exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Col<f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|j| &self.columns[j])
    }

    /// Look up a column that the caller cannot proceed without.
    pub fn require(&self, name: &str) -> Result<&Col<f64>, PredictError> {
        self.column(name).ok_or_else(|| {
            PredictError::MissingParameter(format!("newdata has no column '{}'", name))
        })
    }

    /// Gather the named columns into an n × q matrix, in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Mat<f64>, PredictError> {
        let cols = names
            .iter()
            .map(|name| self.require(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Mat::from_fn(self.n_rows, cols.len(), |i, j| cols[j][i]))
    }
}
