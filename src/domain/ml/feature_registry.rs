use crate::domain::ml::tabular::Cell;
use crate::domain::movie::MovieFeatures;

/// Column names a model may be trained on, as they appear on the wire.
/// The order a given model expects comes from its artifact, not from here.
pub const FEATURE_NAMES: &[&str] = &[
    "startYear",
    "runtimeMinutes",
    "numVotes",
    "averageRating",
    "runtime_category",
    "popularity",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

/// Kind of a known column, `None` for names outside the registry.
pub fn feature_kind(name: &str) -> Option<FeatureKind> {
    match name {
        "startYear" | "runtimeMinutes" | "numVotes" | "averageRating" => {
            Some(FeatureKind::Numeric)
        }
        "runtime_category" | "popularity" => Some(FeatureKind::Categorical),
        _ => None,
    }
}

/// Reads one named column out of a record.
pub fn feature_cell(movie: &MovieFeatures, name: &str) -> Option<Cell> {
    let cell = match name {
        "startYear" => Cell::Numeric(movie.start_year),
        "runtimeMinutes" => Cell::Numeric(movie.runtime_minutes),
        "numVotes" => Cell::Numeric(movie.num_votes),
        "averageRating" => Cell::Numeric(movie.average_rating),
        "runtime_category" => Cell::Categorical(movie.runtime_category.clone()),
        "popularity" => Cell::Categorical(movie.popularity.clone()),
        _ => return None,
    };
    Some(cell)
}
