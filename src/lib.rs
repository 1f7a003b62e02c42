// Library interface for planrs modules
// This allows integration tests to access the core functionality

pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod logging;
pub mod models;
pub mod render;
pub mod steps;
pub mod storage;

// Re-export commonly used types for convenience
pub use models::*;
pub use catalog::{SearchHit, SearchQuery, Vocabulary, DEFAULT_LIMIT};
pub use error::{PlanRsError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use storage::{FsStore, WorkoutStore};
