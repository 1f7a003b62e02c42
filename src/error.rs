//! Unified error hierarchy for planrs
//!
//! Every failure is request-scoped and deterministic: the same input always
//! fails the same way, so nothing here is retried internally. Errors carry
//! the offending value plus, where relevant, the valid-options set, so the
//! caller can self-correct without consulting documentation.

use thiserror::Error;

use crate::models::{Category, Metric};

/// Top-level error type for all planrs operations
#[derive(Debug, Error)]
pub enum PlanRsError {
    /// Catalog query errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Workout document loading errors
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Interval tree construction errors
    #[error("Step error: {0}")]
    Step(#[from] StepError),

    /// IO errors from the backing store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Errors raised while resolving a catalog query
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Category outside the closed set
    #[error("Invalid category '{value}'. Valid options are: Bike, Run, Swim")]
    InvalidCategory { value: String },

    /// Metric outside the closed set
    #[error("Invalid metric '{value}'. Valid options are: HR, Power, Pace, Meters")]
    InvalidMetric { value: String },

    /// Sub-category that matches no token in the category's vocabulary
    #[error("Unknown sub-category '{value}' for {category}. Available sub-categories: {}", valid.join(", "))]
    UnknownSubCategory {
        value: String,
        category: Category,
        valid: Vec<String>,
    },

    /// The (category, metric) pair has no backing collection
    #[error("No workout collection found for {category} with {metric} metric")]
    MissingDirectory { category: Category, metric: Metric },
}

/// Errors raised while loading one workout document
#[derive(Debug, Error)]
pub enum LoadError {
    /// Empty or whitespace filename argument
    #[error("A workout filename is required")]
    MissingFilename,

    /// No match even after the extension-tolerant retry
    #[error("Workout '{filename}' not found in the {category} ({metric}) collection")]
    WorkoutNotFound {
        filename: String,
        category: Category,
        metric: Metric,
    },

    /// Present but unreadable, distinct from missing
    #[error("Workout '{filename}' could not be parsed: {reason}")]
    CorruptWorkoutData { filename: String, reason: String },
}

/// Errors raised while building the interval tree
#[derive(Debug, Error)]
pub enum StepError {
    /// Node matches neither the leaf nor the repeat-group shape
    #[error("Malformed step at position {position}: {reason}")]
    MalformedStep { position: String, reason: String },

    /// Repeat count that is zero, negative, or beyond the supported range
    #[error("Invalid repeat count {count} at position {position}: must be a positive integer in range")]
    InvalidRepeatCount { position: String, count: i64 },
}

/// Result type alias for planrs operations
pub type Result<T> = std::result::Result<T, PlanRsError>;

impl PlanRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PlanRsError::Catalog(_) => ErrorSeverity::Warning,
            PlanRsError::Load(LoadError::WorkoutNotFound { .. }) => ErrorSeverity::Warning,
            PlanRsError::Load(LoadError::MissingFilename) => ErrorSeverity::Warning,
            PlanRsError::Load(LoadError::CorruptWorkoutData { .. }) => ErrorSeverity::Error,
            PlanRsError::Step(_) => ErrorSeverity::Error,
            PlanRsError::Io(_) => ErrorSeverity::Error,
            PlanRsError::Configuration(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    ///
    /// This is the text handed to the invocation collaborator; internal
    /// faults never cross the operation boundary unconverted.
    pub fn user_message(&self) -> String {
        match self {
            PlanRsError::Catalog(err) => format!("Error: {}", err),
            PlanRsError::Load(err) => format!("Error: {}", err),
            PlanRsError::Step(err) => format!("Error: {}", err),
            PlanRsError::Io(err) => {
                format!("Error accessing the workout collection: {}", err)
            }
            PlanRsError::Configuration(reason) => {
                format!("Configuration problem: {}", reason)
            }
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the request but not the process
    Error,
    /// Bad input the caller can correct and retry
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
