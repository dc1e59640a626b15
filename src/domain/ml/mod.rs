pub mod feature_registry;
pub mod tabular;

pub use feature_registry::{FEATURE_NAMES, FeatureKind};
pub use tabular::{Cell, TabularBatch};
