// Classifier interface and the tree-ensemble implementation
pub mod ml;

// Records -> model -> labelled results
pub mod prediction_service;

pub use prediction_service::PredictionService;
