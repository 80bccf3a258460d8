use coursepath_catalog::CourseId;
use thiserror::Error;

/// Errors raised by the recommendation engine.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Matching threshold outside `[0, 1]`.
    #[error("Threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    /// A recommendation horizon of zero courses.
    #[error("Recommendation horizon k must be at least 1")]
    InvalidHorizon,

    /// A course id that is not in the catalog.
    #[error("Course {0} is not in the catalog")]
    UnknownCourse(CourseId),

    /// An environment step after the episode ended.
    #[error("Episode already finished after {0} recommendations")]
    EpisodeFinished(usize),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
