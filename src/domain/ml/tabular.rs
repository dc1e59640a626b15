use crate::domain::errors::PredictionError;
use crate::domain::ml::feature_registry::feature_cell;
use crate::domain::movie::MovieFeatures;

/// One value of the tabular form.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Numeric(f64),
    Categorical(String),
}

/// Records laid out in the column order a model was trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularBatch {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl TabularBatch {
    /// Lays out `records` with one cell per entry of `columns`, in that order.
    ///
    /// A column outside the feature registry is a model/service mismatch and
    /// fails as an inference error. A numeric value that is not finite cannot
    /// be fed to the model and fails as malformed input.
    pub fn from_records(
        records: &[MovieFeatures],
        columns: &[String],
    ) -> Result<Self, PredictionError> {
        let mut rows = Vec::with_capacity(records.len());

        for (row_idx, movie) in records.iter().enumerate() {
            let mut row = Vec::with_capacity(columns.len());
            for column in columns {
                let cell = feature_cell(movie, column).ok_or_else(|| {
                    PredictionError::inference(format!(
                        "Model expects unknown column '{}'",
                        column
                    ))
                })?;
                if let Cell::Numeric(value) = cell {
                    if !value.is_finite() {
                        return Err(PredictionError::malformed(format!(
                            "movies[{}].{} is not a finite number",
                            row_idx, column
                        )));
                    }
                }
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self {
            columns: columns.to_vec(),
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
