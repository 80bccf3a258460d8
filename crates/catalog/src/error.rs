//! Errors raised while building a catalog.

use thiserror::Error;

/// Errors that can occur while canonicalizing raw records into a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CatalogError {
    /// A record references a skill the taxonomy does not define.
    #[error("Skill '{skill}' referenced by '{record}' is not in the catalog")]
    SkillNotFound {
        /// The raw skill identifier (or numeric id for canonical input).
        skill: String,
        /// The learner, job or course holding the reference.
        record: String,
    },

    /// Consistency repair removed every course.
    #[error("No course left in the catalog after consistency repair")]
    EmptyCatalog,

    /// The taxonomy lists the same leaf skill twice.
    #[error("Skill '{0}' appears more than once in the taxonomy")]
    DuplicateSkill(String),

    /// Two learners, jobs or courses share an id.
    #[error("Duplicate {kind} id '{id}'")]
    DuplicateRecord {
        /// Which collection holds the duplicate ("learner", "job", "course").
        kind: &'static str,
        /// The repeated id.
        id: String,
    },

    /// The mastery map defines no positive level.
    #[error("Mastery map has no positive level")]
    EmptyMasteryMap,

    /// A mastery label maps to a negative level other than the unknown sentinel.
    #[error("Mastery label '{label}' maps to invalid level {value}")]
    InvalidMasteryLevel {
        /// The offending label.
        label: String,
        /// The level it maps to.
        value: i32,
    },

    /// Subsampling asked for more records than were loaded.
    #[error("Cannot sample {requested} {kind} out of {available}")]
    SampleTooLarge {
        /// Which collection was sampled ("learners", "jobs", "courses").
        kind: &'static str,
        /// Requested sample size.
        requested: usize,
        /// Number of records available.
        available: usize,
    },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
