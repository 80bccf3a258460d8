//! Skill catalog and indexer for course recommendation.
//!
//! This crate turns raw learner, job and course records into a canonical,
//! read-only catalog:
//! - A dense skill namespace built from a taxonomy (leaf or group granularity)
//! - Mastery labels translated to ordinal levels, duplicates averaged
//! - Course consistency repair (a course never requires what it teaches)
//! - An inverted index from skills to the jobs requiring them
//! - Seeded, reproducible subsampling
//!
//! # Example
//!
//! ```rust
//! use coursepath_catalog::{Catalog, Course, Job, SkillProfile};
//!
//! let jobs = vec![Job::new("analyst", SkillProfile::from([(0, 2)]))];
//! let courses = vec![Course::new(
//!     "intro",
//!     SkillProfile::new(),
//!     SkillProfile::from([(0, 3)]),
//! )];
//!
//! let catalog = Catalog::from_parts(1, 3, jobs, courses).unwrap();
//! assert_eq!(catalog.courses().len(), 1);
//! assert_eq!(catalog.job_index().demand(0.into()), 1);
//! ```

#![deny(unsafe_code)]

mod builder;
pub mod error;
pub mod index;
pub mod raw;
mod sample;
pub mod skills;
pub mod types;

pub use builder::{Catalog, CatalogBuilder, CatalogConfig, Dataset};
pub use error::{CatalogError, Result};
pub use index::InvertedIndex;
pub use raw::{
    MasteryMap, RawCourse, RawDataset, RawJob, RawLearner, SkillAnnotation, UnknownDefaults,
    UNKNOWN_MASTERY,
};
pub use sample::SampleConfig;
pub use skills::{SkillGranularity, SkillIndex, TaxonomyEntry};
pub use types::{AppliedCourse, Course, CourseId, Job, JobId, Learner, Level, SkillId, SkillProfile};
