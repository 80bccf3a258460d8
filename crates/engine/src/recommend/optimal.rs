//! Exhaustive depth-k search over course sequences.
//!
//! The search walks every ordered sequence of enrollable courses on a single
//! learner profile, applying a course before descending and undoing it on the
//! way back up, so siblings never see each other's tentative skills. The
//! objective is only evaluated at leaves: after `k` courses, or earlier when
//! no course is enrollable anymore.
//!
//! Cost grows as the product of the branching factors at each depth. This is
//! a baseline for comparing policies, not a production-scale search.

use coursepath_catalog::{CourseId, SkillProfile};

use super::{Policy, Recommender};
use crate::market::{Market, MarketScore};

/// Best-so-far sequence threaded through the search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Winning course sequence, empty when nothing beat the zero baseline.
    pub sequence: Vec<CourseId>,
    /// Score reached after taking `sequence`.
    pub score: MarketScore,
    /// Number of leaves evaluated.
    pub leaves: u64,
}

/// Finds the course sequence of length up to `k` that opens the most jobs.
#[derive(Debug, Clone, Copy)]
pub struct Optimal<'a> {
    market: Market<'a>,
}

impl<'a> Optimal<'a> {
    pub fn new(market: Market<'a>) -> Self {
        Self { market }
    }

    /// Run the search from `learner` without modifying it.
    pub fn search(&self, learner: &SkillProfile, k: usize) -> SearchOutcome {
        let mut search = Search {
            market: &self.market,
            path: Vec::with_capacity(k),
            outcome: SearchOutcome::default(),
        };
        let mut scratch = learner.clone();
        search.explore(&mut scratch, k);
        search.outcome
    }
}

struct Search<'m, 'a> {
    market: &'m Market<'a>,
    path: Vec<CourseId>,
    outcome: SearchOutcome,
}

impl Search<'_, '_> {
    fn explore(&mut self, learner: &mut SkillProfile, remaining: usize) {
        if remaining == 0 {
            self.evaluate(learner);
            return;
        }

        let enrollable = self.market.enrollable_courses(learner);
        if enrollable.is_empty() {
            self.evaluate(learner);
            return;
        }

        for (id, course) in enrollable {
            let applied = learner.apply(&course.provided);
            self.path.push(id);
            self.explore(learner, remaining - 1);
            self.path.pop();
            learner.undo(applied);
        }
    }

    fn evaluate(&mut self, learner: &SkillProfile) {
        self.outcome.leaves += 1;
        let score = self.market.score(learner);
        if score > self.outcome.score {
            self.outcome.score = score;
            self.outcome.sequence.clone_from(&self.path);
        }
    }
}

impl Recommender for Optimal<'_> {
    fn policy(&self) -> Policy {
        Policy::Optimal
    }

    fn recommend(&self, learner: &mut SkillProfile, k: usize) -> Vec<CourseId> {
        let outcome = self.search(learner, k);

        tracing::trace!(
            target: "coursepath::optimal",
            leaves = outcome.leaves,
            courses = outcome.sequence.len(),
            applicable_jobs = outcome.score.applicable_jobs,
            attractiveness = outcome.score.attractiveness,
            "Search finished"
        );

        for &id in &outcome.sequence {
            if let Ok(course) = self.market.course(id) {
                let _ = learner.apply(&course.provided);
            }
        }
        outcome.sequence
    }
}
