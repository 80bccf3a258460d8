//! Single-step lookahead recommendation.

use coursepath_catalog::{CourseId, SkillProfile};

use super::{Policy, Recommender};
use crate::market::{Market, MarketScore};

/// Picks, one step at a time, the enrollable course that opens the most jobs.
#[derive(Debug, Clone, Copy)]
pub struct Greedy<'a> {
    market: Market<'a>,
}

impl<'a> Greedy<'a> {
    pub fn new(market: Market<'a>) -> Self {
        Self { market }
    }

    /// Best course to take next from `learner`, with the score it would reach.
    ///
    /// Candidates are ranked by applicable jobs, then attractiveness; on a
    /// full tie the earliest course wins. A course opening no job at all is
    /// never chosen, so `None` means no enrollable course helps.
    pub fn next_course(&self, learner: &SkillProfile) -> Option<(CourseId, MarketScore)> {
        let mut scratch = learner.clone();
        let mut best: Option<(CourseId, MarketScore)> = None;

        for (id, course) in self.market.enrollable_courses(learner) {
            let applied = scratch.apply(&course.provided);
            let score = self.market.score(&scratch);
            scratch.undo(applied);

            if score.applicable_jobs == 0 {
                continue;
            }
            if best.map_or(true, |(_, current)| score > current) {
                best = Some((id, score));
            }
        }

        best
    }
}

impl Recommender for Greedy<'_> {
    fn policy(&self) -> Policy {
        Policy::Greedy
    }

    fn recommend(&self, learner: &mut SkillProfile, k: usize) -> Vec<CourseId> {
        let mut sequence = Vec::with_capacity(k);

        for step in 0..k {
            let Some((id, score)) = self.next_course(learner) else {
                // The profile is unchanged, so later steps would find nothing either.
                tracing::trace!(
                    target: "coursepath::greedy",
                    step,
                    "No enrollable course improves the learner"
                );
                break;
            };
            let Ok(course) = self.market.course(id) else {
                break;
            };
            let _ = learner.apply(&course.provided);
            sequence.push(id);

            tracing::trace!(
                target: "coursepath::greedy",
                step,
                course = %course.id,
                applicable_jobs = score.applicable_jobs,
                attractiveness = score.attractiveness,
                "Selected course"
            );
        }

        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursepath_catalog::{Catalog, Course, Job};

    fn catalog() -> Catalog {
        let jobs = vec![
            Job::new("web", SkillProfile::from([(0, 2)])),
            Job::new("data", SkillProfile::from([(1, 2)])),
            Job::new("ml", SkillProfile::from([(1, 2), (2, 2)])),
        ];
        let courses = vec![
            Course::new("html", SkillProfile::new(), SkillProfile::from([(0, 2)])),
            Course::new("sql", SkillProfile::new(), SkillProfile::from([(1, 2)])),
            Course::new("stats", SkillProfile::from([(1, 2)]), SkillProfile::from([(2, 2)])),
        ];
        Catalog::from_parts(3, 3, jobs, courses).unwrap()
    }

    #[test]
    fn picks_course_opening_most_jobs() {
        let catalog = catalog();
        let market = Market::new(&catalog, 0.5).unwrap();
        let greedy = Greedy::new(market);

        // html opens web (1); sql opens data and half of ml (2)
        let (id, score) = greedy.next_course(&SkillProfile::new()).unwrap();
        assert_eq!(id, CourseId(1));
        assert_eq!(score.applicable_jobs, 2);
    }

    #[test]
    fn builds_sequence_and_updates_learner() {
        let catalog = catalog();
        let market = Market::new(&catalog, 1.0).unwrap();
        let greedy = Greedy::new(market);
        let mut learner = SkillProfile::new();

        let sequence = greedy.recommend(&mut learner, 3);

        // sql wins step one on attractiveness; html and stats then tie
        // exactly and the earlier course goes first
        assert_eq!(sequence, vec![CourseId(1), CourseId(0), CourseId(2)]);
        assert_eq!(learner, SkillProfile::from([(0, 2), (1, 2), (2, 2)]));
        assert_eq!(market.nb_applicable_jobs(&learner), 3);
    }

    #[test]
    fn ties_break_on_attractiveness() {
        let jobs = vec![
            Job::new("a", SkillProfile::from([(0, 1)])),
            Job::new("b", SkillProfile::from([(1, 1), (2, 3)])),
        ];
        let courses = vec![
            Course::new("narrow", SkillProfile::new(), SkillProfile::from([(0, 1)])),
            Course::new("broad", SkillProfile::new(), SkillProfile::from([(0, 1), (1, 1)])),
        ];
        let catalog = Catalog::from_parts(3, 3, jobs, courses).unwrap();
        let greedy = Greedy::new(Market::new(&catalog, 0.9).unwrap());

        let (id, score) = greedy.next_course(&SkillProfile::new()).unwrap();
        assert_eq!(id, CourseId(1));
        assert_eq!(score.applicable_jobs, 1);
        assert_eq!(score.attractiveness, 2);
    }

    #[test]
    fn stops_when_nothing_helps() {
        let jobs = vec![Job::new("far", SkillProfile::from([(2, 3)]))];
        let courses = vec![Course::new(
            "unrelated",
            SkillProfile::new(),
            SkillProfile::from([(0, 1)]),
        )];
        let catalog = Catalog::from_parts(3, 3, jobs, courses).unwrap();
        let greedy = Greedy::new(Market::new(&catalog, 0.5).unwrap());
        let mut learner = SkillProfile::new();

        assert!(greedy.recommend(&mut learner, 2).is_empty());
        assert!(learner.is_empty());
    }

    #[test]
    fn attractiveness_alone_is_not_enough() {
        let jobs = vec![Job::new("fullstack", SkillProfile::from([(0, 3), (1, 3)]))];
        let courses = vec![Course::new(
            "frontend",
            SkillProfile::new(),
            SkillProfile::from([(0, 3)]),
        )];
        let catalog = Catalog::from_parts(2, 3, jobs, courses).unwrap();
        let market = Market::new(&catalog, 0.9).unwrap();
        let greedy = Greedy::new(market);
        let mut learner = SkillProfile::new();

        // frontend makes the learner relevant to fullstack without opening it
        let mut taken = learner.clone();
        let _ = taken.apply(&catalog.courses()[0].provided);
        assert_eq!(market.score(&taken).applicable_jobs, 0);
        assert_eq!(market.score(&taken).attractiveness, 1);

        assert_eq!(greedy.next_course(&learner), None);
        assert!(greedy.recommend(&mut learner, 2).is_empty());
        assert!(learner.is_empty());
    }

    #[test]
    fn sequence_is_shorter_when_courses_run_out() {
        let catalog = catalog();
        let greedy = Greedy::new(Market::new(&catalog, 0.5).unwrap());
        let mut learner = SkillProfile::new();

        let sequence = greedy.recommend(&mut learner, 10);
        assert_eq!(sequence.len(), 3);
    }
}
