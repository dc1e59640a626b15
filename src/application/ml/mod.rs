pub mod forest;
pub mod predictor;

pub use forest::ForestClassifier;
pub use predictor::Classifier;
