// Movie feature records and request schema
pub mod movie;

// Rating categories and prediction results
pub mod prediction;

// Static model metadata document
pub mod metadata;

// Tabular form and feature column registry
pub mod ml;

// Domain-specific error types
pub mod errors;
