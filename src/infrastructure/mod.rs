pub mod model;
pub mod observability;

pub use model::ModelState;
pub use observability::Metrics;
