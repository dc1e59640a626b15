//! Model artifact and metadata loading.

pub mod loader;

pub use loader::{ModelState, file_exists, load_metadata, load_model};
