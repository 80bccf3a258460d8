//! Job-market queries over a catalog at a fixed matching threshold.

use coursepath_catalog::{
    Catalog, Course, CourseId, InvertedIndex, Job, JobId, Learner, SkillProfile,
};

use crate::error::{EngineError, Result};
use crate::matching::{is_enrollable, learner_job_matching};

/// Number of jobs a learner can apply to at `threshold`.
///
/// Only jobs sharing at least one skill with the learner are scored: any
/// other job matches at `0` and so can only count when `threshold` is `0`,
/// in which case every job is applicable.
pub fn nb_applicable_jobs(
    learner: &SkillProfile,
    jobs: &[Job],
    index: &InvertedIndex,
    threshold: f64,
) -> usize {
    let candidates = index.candidates(learner.skills());
    let mut applicable = candidates
        .iter()
        .filter_map(|id| jobs.get(id.0))
        .filter(|job| learner_job_matching(learner, job) >= threshold)
        .count();
    if threshold <= 0.0 {
        applicable += (0..jobs.len())
            .filter(|&position| !candidates.contains(&JobId(position)))
            .count();
    }
    applicable
}

/// Brute-force [`nb_applicable_jobs`] scanning every job.
pub fn nb_applicable_jobs_scan(learner: &SkillProfile, jobs: &[Job], threshold: f64) -> usize {
    jobs.iter()
        .filter(|job| learner_job_matching(learner, job) >= threshold)
        .count()
}

/// Sum over possessed skills of the number of jobs requiring each one.
pub fn learner_attractiveness(learner: &SkillProfile, index: &InvertedIndex) -> usize {
    learner.skills().map(|skill| index.demand(skill)).sum()
}

/// Objective optimized by the recommenders, compared lexicographically:
/// applicable jobs first, attractiveness as the tie-breaker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct MarketScore {
    pub applicable_jobs: usize,
    pub attractiveness: usize,
}

/// A catalog viewed at one matching threshold.
#[derive(Debug, Clone, Copy)]
pub struct Market<'a> {
    catalog: &'a Catalog,
    threshold: f64,
}

impl<'a> Market<'a> {
    /// Fails when `threshold` is outside `[0, 1]`.
    pub fn new(catalog: &'a Catalog, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(EngineError::InvalidThreshold(threshold));
        }
        Ok(Self { catalog, threshold })
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Course by id, failing on ids outside the catalog.
    pub fn course(&self, id: CourseId) -> Result<&'a Course> {
        self.catalog.course(id).ok_or(EngineError::UnknownCourse(id))
    }

    pub fn is_enrollable(&self, learner: &SkillProfile, course: &Course) -> bool {
        is_enrollable(learner, course, self.threshold)
    }

    /// Courses the learner may enroll in, in catalog order.
    pub fn enrollable_courses(&self, learner: &SkillProfile) -> Vec<(CourseId, &'a Course)> {
        self.catalog
            .iter_courses()
            .filter(|(_, course)| self.is_enrollable(learner, course))
            .collect()
    }

    pub fn nb_applicable_jobs(&self, learner: &SkillProfile) -> usize {
        nb_applicable_jobs(
            learner,
            self.catalog.jobs(),
            self.catalog.job_index(),
            self.threshold,
        )
    }

    pub fn attractiveness(&self, learner: &SkillProfile) -> usize {
        learner_attractiveness(learner, self.catalog.job_index())
    }

    pub fn score(&self, learner: &SkillProfile) -> MarketScore {
        MarketScore {
            applicable_jobs: self.nb_applicable_jobs(learner),
            attractiveness: self.attractiveness(learner),
        }
    }

    /// Mean attractiveness over `learners`, `0` for none.
    pub fn avg_learner_attractiveness(&self, learners: &[Learner]) -> f64 {
        mean(learners.iter().map(|l| self.attractiveness(&l.skills)))
    }

    /// Mean applicable-job count over `learners`, `0` for none.
    pub fn avg_applicable_jobs(&self, learners: &[Learner]) -> f64 {
        mean(learners.iter().map(|l| self.nb_applicable_jobs(&l.skills)))
    }
}

fn mean(values: impl ExactSizeIterator<Item = usize>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    values.sum::<usize>() as f64 / count as f64
}
