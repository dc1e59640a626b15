use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Descriptive document shipped next to the model artifact.
///
/// Kept verbatim so `/model-info` can return it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelMetadata(Map<String, Value>);

impl ModelMetadata {
    /// `model_name`, falling back to `best_model`, then "unknown".
    pub fn model_name(&self) -> &str {
        ["model_name", "best_model"]
            .iter()
            .find_map(|key| self.0.get(*key).and_then(Value::as_str))
            .unwrap_or("unknown")
    }

    pub fn metrics(&self) -> Map<String, Value> {
        self.object("metrics")
    }

    pub fn parameters(&self) -> Map<String, Value> {
        self.object("parameters")
    }

    fn object(&self, key: &str) -> Map<String, Value> {
        self.0
            .get(key)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> ModelMetadata {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_model_name_fallbacks() {
        assert_eq!(metadata(json!({"model_name": "rf"})).model_name(), "rf");
        assert_eq!(metadata(json!({"best_model": "xgb"})).model_name(), "xgb");
        assert_eq!(metadata(json!({})).model_name(), "unknown");
    }

    #[test]
    fn test_metrics_and_parameters() {
        let md = metadata(json!({
            "model_name": "rf",
            "metrics": {"accuracy": 0.71, "f1_weighted": 0.69},
            "parameters": {"n_estimators": 200}
        }));
        assert_eq!(md.metrics()["accuracy"], 0.71);
        assert_eq!(md.parameters()["n_estimators"], 200);
    }

    #[test]
    fn test_missing_or_non_object_metrics_default_to_empty() {
        assert!(metadata(json!({"metrics": [1, 2]})).metrics().is_empty());
        assert!(metadata(json!({})).parameters().is_empty());
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(serde_json::from_value::<ModelMetadata>(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_round_trips_verbatim() {
        let doc = json!({"model_name": "rf", "extra": {"nested": true}});
        let md = metadata(doc.clone());
        assert_eq!(serde_json::to_value(&md).unwrap(), doc);
    }
}
