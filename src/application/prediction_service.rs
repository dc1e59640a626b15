use crate::domain::errors::PredictionError;
use crate::domain::ml::TabularBatch;
use crate::domain::movie::{MovieFeatures, PredictRequest};
use crate::domain::prediction::{PredictResponse, PredictionResult};
use crate::infrastructure::model::ModelState;
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Maps feature records through the loaded model.
#[derive(Clone)]
pub struct PredictionService {
    state: Arc<ModelState>,
    metrics: Metrics,
}

impl PredictionService {
    pub fn new(state: Arc<ModelState>, metrics: Metrics) -> Self {
        Self { state, metrics }
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    /// One result per record, in input order. All records succeed or the
    /// whole call fails.
    pub fn predict(
        &self,
        movies: &[MovieFeatures],
    ) -> Result<Vec<PredictionResult>, PredictionError> {
        let model = self.state.model()?;
        if movies.is_empty() {
            return Err(PredictionError::malformed("'movies' list cannot be empty"));
        }

        let batch = TabularBatch::from_records(movies, model.feature_columns())?;

        let started = Instant::now();
        let (labels, proba) = model.predict_scored(&batch)?;
        self.metrics
            .observe_inference(model.name(), started.elapsed().as_secs_f64());

        if labels.len() != movies.len() || proba.nrows() != movies.len() {
            return Err(PredictionError::inference(format!(
                "Model returned {} labels and {} probability rows for {} records",
                labels.len(),
                proba.nrows(),
                movies.len()
            )));
        }
        let classes = model.classes();
        if proba.ncols() != classes.len() {
            return Err(PredictionError::inference(format!(
                "Probability vectors have {} entries for {} classes",
                proba.ncols(),
                classes.len()
            )));
        }

        let mut results = Vec::with_capacity(movies.len());
        for (row_idx, (label, row)) in labels.iter().zip(proba.rows()).enumerate() {
            let rating_category = *classes.get(*label).ok_or_else(|| {
                PredictionError::inference(format!(
                    "Record {}: label index {} outside {} trained classes",
                    row_idx,
                    label,
                    classes.len()
                ))
            })?;

            if row.iter().any(|p| !(0.0..=1.0).contains(p)) {
                return Err(PredictionError::inference(format!(
                    "Record {}: probability outside [0, 1]",
                    row_idx
                )));
            }
            let confidence = row.iter().cloned().fold(0.0, f64::max);
            if row[*label] < confidence {
                return Err(PredictionError::inference(format!(
                    "Record {}: label {} scores {} below the row maximum {}",
                    row_idx, label, row[*label], confidence
                )));
            }

            results.push(PredictionResult {
                rating_category,
                confidence,
            });
        }

        for result in &results {
            self.metrics.inc_predictions(result.rating_category.as_str());
        }
        debug!("Scored {} records with {}", results.len(), model.name());
        Ok(results)
    }

    /// Full `/predict` response: predictions plus the metadata summary.
    pub fn respond(&self, request: &PredictRequest) -> Result<PredictResponse, PredictionError> {
        let predictions = self.predict(&request.movies)?;
        let metadata = self.state.metadata();

        Ok(PredictResponse {
            predictions,
            model_name: metadata
                .map(|m| m.model_name().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            model_metrics: metadata.map(|m| m.metrics()).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::{Classifier, ForestClassifier};
    use crate::config::ModelEnvConfig;
    use crate::domain::metadata::ModelMetadata;
    use crate::domain::prediction::RatingCategory;
    use ndarray::{Array2, array};
    use serde_json::json;

    const MODEL: &str = r#"{
        "feature_columns": ["startYear", "runtimeMinutes", "numVotes", "averageRating", "runtime_category", "popularity"],
        "classes": ["Average", "Excellent", "Good", "Poor"],
        "encoders": {
            "runtime_category": {"categories": ["Short (<90m)", "Standard (90-120m)", "Long (>120m)"], "unknown_value": -1.0},
            "popularity": {"categories": ["Low", "Medium", "High"]}
        },
        "trees": [{"nodes": [
            {"feature": 3, "threshold": 5.0, "left": 1, "right": 2},
            {"value": [0.2, 0.0, 0.0, 0.8]},
            {"feature": 3, "threshold": 8.0, "left": 3, "right": 4},
            {"value": [0.3, 0.1, 0.6, 0.0]},
            {"value": [0.0, 0.9, 0.1, 0.0]}
        ]}]
    }"#;

    /// Returns whatever shapes it was built with.
    struct FixedClassifier {
        columns: Vec<String>,
        classes: Vec<RatingCategory>,
        labels: Vec<usize>,
        proba: Array2<f64>,
    }

    impl FixedClassifier {
        fn new(labels: Vec<usize>, proba: Array2<f64>) -> Self {
            Self {
                columns: vec!["averageRating".to_string()],
                classes: vec![RatingCategory::Poor, RatingCategory::Good],
                labels,
                proba,
            }
        }
    }

    impl Classifier for FixedClassifier {
        fn feature_columns(&self) -> &[String] {
            &self.columns
        }
        fn classes(&self) -> &[RatingCategory] {
            &self.classes
        }
        fn predict(&self, _batch: &TabularBatch) -> Result<Vec<usize>, PredictionError> {
            Ok(self.labels.clone())
        }
        fn predict_proba(&self, _batch: &TabularBatch) -> Result<Array2<f64>, PredictionError> {
            Ok(self.proba.clone())
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn service(
        model: Option<Arc<dyn Classifier>>,
        metadata: Option<ModelMetadata>,
    ) -> PredictionService {
        let state = ModelState::from_parts(model, metadata, &ModelEnvConfig::default());
        PredictionService::new(Arc::new(state), Metrics::new().unwrap())
    }

    fn forest_service() -> PredictionService {
        let model = ForestClassifier::from_slice(MODEL.as_bytes(), "inline").unwrap();
        let metadata = serde_json::from_value(json!({
            "model_name": "RandomForest",
            "metrics": {"accuracy": 0.72, "f1_weighted": 0.70},
            "parameters": {"n_estimators": 1}
        }))
        .unwrap();
        service(Some(Arc::new(model)), Some(metadata))
    }

    fn movie(rating: f64) -> MovieFeatures {
        MovieFeatures {
            start_year: 2020.0,
            runtime_minutes: 120.0,
            num_votes: 1000.0,
            average_rating: rating,
            runtime_category: "Standard (90-120m)".to_string(),
            popularity: "Low".to_string(),
        }
    }

    #[test]
    fn test_results_follow_input_order() {
        let svc = forest_service();
        let results = svc.predict(&[movie(9.0), movie(2.0), movie(6.5)]).unwrap();

        let categories: Vec<_> = results.iter().map(|r| r.rating_category).collect();
        assert_eq!(
            categories,
            vec![
                RatingCategory::Excellent,
                RatingCategory::Poor,
                RatingCategory::Good
            ]
        );
        assert!((results[0].confidence - 0.9).abs() < 1e-12);
        assert!((results[1].confidence - 0.8).abs() < 1e-12);
        assert!((results[2].confidence - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_identical_requests_are_idempotent() {
        let svc = forest_service();
        let movies = vec![movie(7.5), movie(4.0)];
        assert_eq!(svc.predict(&movies).unwrap(), svc.predict(&movies).unwrap());
    }

    #[test]
    fn test_respond_includes_metadata_summary() {
        let svc = forest_service();
        let response = svc
            .respond(&PredictRequest {
                movies: vec![movie(7.5)],
            })
            .unwrap();
        assert_eq!(response.predictions.len(), 1);
        assert_eq!(response.model_name, "RandomForest");
        assert_eq!(response.model_metrics["accuracy"], 0.72);
    }

    #[test]
    fn test_respond_without_metadata_uses_fallbacks() {
        let model = ForestClassifier::from_slice(MODEL.as_bytes(), "inline").unwrap();
        let svc = service(Some(Arc::new(model)), None);
        let response = svc
            .respond(&PredictRequest {
                movies: vec![movie(7.5)],
            })
            .unwrap();
        assert_eq!(response.model_name, "unknown");
        assert!(response.model_metrics.is_empty());
    }

    #[test]
    fn test_unloaded_model_is_unavailable() {
        let svc = service(None, None);
        let err = svc.predict(&[movie(7.5)]).unwrap_err();
        assert!(matches!(err, PredictionError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_empty_batch_is_malformed() {
        let svc = forest_service();
        assert!(matches!(
            svc.predict(&[]),
            Err(PredictionError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_row_count_mismatch_is_inference_failure() {
        let model = FixedClassifier::new(vec![0], array![[0.9, 0.1]]);
        let svc = service(Some(Arc::new(model)), None);
        let err = svc.predict(&[movie(1.0), movie(2.0)]).unwrap_err();
        assert!(matches!(err, PredictionError::InferenceFailure { .. }));
    }

    #[test]
    fn test_label_outside_classes_is_inference_failure() {
        let model = FixedClassifier::new(vec![5], array![[0.9, 0.1]]);
        let svc = service(Some(Arc::new(model)), None);
        let err = svc.predict(&[movie(1.0)]).unwrap_err();
        assert!(err.to_string().contains("label index 5"));
    }

    #[test]
    fn test_probability_out_of_range_is_inference_failure() {
        let model = FixedClassifier::new(vec![0], array![[1.5, -0.5]]);
        let svc = service(Some(Arc::new(model)), None);
        assert!(matches!(
            svc.predict(&[movie(1.0)]),
            Err(PredictionError::InferenceFailure { .. })
        ));
    }

    #[test]
    fn test_probability_width_mismatch_is_inference_failure() {
        let model = FixedClassifier::new(vec![0], array![[0.5, 0.3, 0.2]]);
        let svc = service(Some(Arc::new(model)), None);
        assert!(matches!(
            svc.predict(&[movie(1.0)]),
            Err(PredictionError::InferenceFailure { .. })
        ));
    }

    #[test]
    fn test_confidence_is_row_maximum() {
        let model = FixedClassifier::new(vec![1, 0], array![[0.35, 0.65], [0.5, 0.5]]);
        let svc = service(Some(Arc::new(model)), None);
        let results = svc.predict(&[movie(1.0), movie(2.0)]).unwrap();
        assert_eq!(results[0].rating_category, RatingCategory::Good);
        assert_eq!(results[0].confidence, 0.65);
        assert_eq!(results[1].rating_category, RatingCategory::Poor);
        assert_eq!(results[1].confidence, 0.5);
    }

    #[test]
    fn test_label_below_row_maximum_is_inference_failure() {
        let model = FixedClassifier::new(vec![0], array![[0.3, 0.7]]);
        let svc = service(Some(Arc::new(model)), None);
        let err = svc.predict(&[movie(1.0)]).unwrap_err();
        assert!(matches!(err, PredictionError::InferenceFailure { .. }));
        assert!(err.to_string().contains("below the row maximum"));
    }

    #[test]
    fn test_predictions_are_counted() {
        let svc = forest_service();
        svc.predict(&[movie(9.0), movie(9.5)]).unwrap();
        let output = svc.metrics.render();
        assert!(output.contains("rating_predictions_total{category=\"Excellent\"} 2"));
    }
}
