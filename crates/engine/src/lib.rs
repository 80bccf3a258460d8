//! Matching and course-sequence recommendation over a skill catalog.
//!
//! Scores are pure functions of skill profiles ([`matching`]); a [`Market`]
//! fixes the catalog and threshold so the recommenders can ask how many jobs a
//! profile opens. Two policies implement [`Recommender`]:
//!
//! - [`Greedy`]: take the course that opens the most jobs right now, `k` times
//! - [`Optimal`]: search every sequence of up to `k` courses
//!
//! [`run`] applies a policy to a set of learners and produces a
//! [`RecommendationReport`]; [`CourseEnv`] exposes the same dynamics step by
//! step for externally trained policies.
//!
//! # Example
//!
//! ```rust
//! use coursepath_catalog::{Catalog, Course, CourseId, Job, SkillProfile};
//! use coursepath_engine::{Market, Policy};
//!
//! let jobs = vec![Job::new("analyst", SkillProfile::from([(0, 2)]))];
//! let courses = vec![Course::new("intro", SkillProfile::new(), SkillProfile::from([(0, 3)]))];
//! let catalog = Catalog::from_parts(1, 3, jobs, courses).unwrap();
//!
//! let market = Market::new(&catalog, 0.5).unwrap();
//! let mut learner = SkillProfile::from([(0, 1)]);
//! let sequence = Policy::Optimal.recommender(market).recommend(&mut learner, 1);
//!
//! assert_eq!(sequence, vec![CourseId(0)]);
//! assert_eq!(market.nb_applicable_jobs(&learner), 1);
//! ```

#![deny(unsafe_code)]

pub mod env;
pub mod error;
pub mod market;
pub mod matching;
pub mod recommend;
pub mod runner;

pub use env::{CourseEnv, Step, INVALID_ACTION_REWARD};
pub use error::{EngineError, Result};
pub use market::{Market, MarketScore};
pub use recommend::{Greedy, Optimal, Policy, Recommender};
pub use runner::{run, RecommendationReport};
