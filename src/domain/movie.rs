use serde::{Deserialize, Serialize};

/// Features for a single movie.
///
/// Every field is required. `runtime_category` and `popularity` are an
/// unvalidated passthrough: any string is accepted here and the loaded
/// artifact's encoder decides what an unfamiliar value means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieFeatures {
    /// Release year
    #[serde(rename = "startYear")]
    pub start_year: f64,
    /// Runtime in minutes
    #[serde(rename = "runtimeMinutes")]
    pub runtime_minutes: f64,
    /// Number of votes
    #[serde(rename = "numVotes")]
    pub num_votes: f64,
    /// Average rating (0-10)
    #[serde(rename = "averageRating")]
    pub average_rating: f64,
    /// Runtime bucket, e.g. "Standard (90-120m)"
    pub runtime_category: String,
    /// Popularity bucket, e.g. "Low"
    pub popularity: String,
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub movies: Vec<MovieFeatures>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{
            "startYear": 2020.0,
            "runtimeMinutes": 120.0,
            "numVotes": 1000.0,
            "averageRating": 7.5,
            "runtime_category": "Standard (90-120m)",
            "popularity": "Low"
        }"#;
        let movie: MovieFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(movie.start_year, 2020.0);
        assert_eq!(movie.average_rating, 7.5);
        assert_eq!(movie.runtime_category, "Standard (90-120m)");
    }

    #[test]
    fn test_integers_are_accepted_as_numbers() {
        let json = r#"{"startYear": 1999, "runtimeMinutes": 95, "numVotes": 12,
            "averageRating": 6, "runtime_category": "x", "popularity": "y"}"#;
        let movie: MovieFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(movie.num_votes, 12.0);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{"startYear": 2020.0, "runtimeMinutes": 120.0, "numVotes": 1000.0,
            "runtime_category": "Standard (90-120m)", "popularity": "Low"}"#;
        let err = serde_json::from_str::<MovieFeatures>(json).unwrap_err();
        assert!(err.to_string().contains("averageRating"));
    }

    #[test]
    fn test_non_numeric_value_is_rejected() {
        let json = r#"{"startYear": "2020", "runtimeMinutes": 120.0, "numVotes": 1000.0,
            "averageRating": 7.5, "runtime_category": "a", "popularity": "b"}"#;
        assert!(serde_json::from_str::<MovieFeatures>(json).is_err());
    }

    #[test]
    fn test_unknown_category_strings_pass_through() {
        let json = r#"{"movies": [{"startYear": 2020.0, "runtimeMinutes": 120.0,
            "numVotes": 1000.0, "averageRating": 7.5,
            "runtime_category": "Epic (>300m)", "popularity": "Viral"}]}"#;
        let request: PredictRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.movies[0].popularity, "Viral");
    }
}
