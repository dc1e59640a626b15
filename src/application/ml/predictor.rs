use crate::domain::errors::PredictionError;
use crate::domain::ml::TabularBatch;
use crate::domain::prediction::RatingCategory;
use ndarray::Array2;

/// Interface for a loaded classification model
pub trait Classifier: Send + Sync {
    /// Column order the model was trained on
    fn feature_columns(&self) -> &[String];

    /// Trained class labels; a label index from `predict` points in here
    fn classes(&self) -> &[RatingCategory];

    /// One label index per row. The label must carry the highest
    /// probability of its `predict_proba` row.
    fn predict(&self, batch: &TabularBatch) -> Result<Vec<usize>, PredictionError>;

    /// One probability vector per row, `classes().len()` columns wide
    fn predict_proba(&self, batch: &TabularBatch) -> Result<Array2<f64>, PredictionError>;

    /// Labels and probabilities together. Override when both come out of
    /// one pass over the model.
    fn predict_scored(
        &self,
        batch: &TabularBatch,
    ) -> Result<(Vec<usize>, Array2<f64>), PredictionError> {
        Ok((self.predict(batch)?, self.predict_proba(batch)?))
    }

    /// Get model name/type
    fn name(&self) -> &str;
}
