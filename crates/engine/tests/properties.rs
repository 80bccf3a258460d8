use coursepath_catalog::{Course, SkillProfile};
use coursepath_engine::market::{nb_applicable_jobs, nb_applicable_jobs_scan};
use coursepath_engine::matching::{learner_course_required_matching, learner_job_matching};
use coursepath_engine::{Greedy, Market, Optimal, Recommender};
use coursepath_test_utils::strategies::{catalog, profile};
use coursepath_test_utils::CatalogShape;
use proptest::prelude::*;

const SMALL: CatalogShape = CatalogShape {
    nb_skills: 5,
    max_level: 3,
    nb_jobs: 8,
    nb_courses: 5,
    max_skills_per_record: 2,
};

proptest! {
    #[test]
    fn apply_is_idempotent_and_monotone(
        learner in profile(6, 4, 4),
        provided in profile(6, 4, 4),
    ) {
        let once = learner.with_applied(&provided);
        let twice = once.with_applied(&provided);
        prop_assert_eq!(&once, &twice);

        for (skill, level) in learner.iter() {
            prop_assert!(once.level(skill) >= level);
        }
        for (skill, level) in provided.iter() {
            prop_assert!(once.level(skill) >= level);
        }
    }

    #[test]
    fn undo_restores_profile(learner in profile(6, 4, 4), provided in profile(6, 4, 4)) {
        let mut scratch = learner.clone();
        let applied = scratch.apply(&provided);
        scratch.undo(applied);
        prop_assert_eq!(scratch, learner);
    }

    #[test]
    fn indexed_count_matches_scan(
        catalog in catalog(SMALL),
        learner in profile(5, 3, 4),
        threshold in prop_oneof![Just(0.0), Just(1.0), 0.0f64..=1.0],
    ) {
        let indexed = nb_applicable_jobs(&learner, catalog.jobs(), catalog.job_index(), threshold);
        let scanned = nb_applicable_jobs_scan(&learner, catalog.jobs(), threshold);
        prop_assert_eq!(indexed, scanned);
    }

    #[test]
    fn job_matching_is_bounded(catalog in catalog(SMALL), learner in profile(5, 3, 5)) {
        for job in catalog.jobs().iter().filter(|job| !job.required.is_empty()) {
            let score = learner_job_matching(&learner, job);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn no_prerequisites_always_matches(learner in profile(5, 3, 5), provided in profile(5, 3, 3)) {
        let course = Course::new("open", SkillProfile::new(), provided);
        prop_assert_eq!(learner_course_required_matching(&learner, &course), 1.0);
    }

    #[test]
    fn optimal_never_loses_to_greedy(
        catalog in catalog(SMALL),
        learner in profile(5, 3, 3),
        threshold in 0.0f64..=1.0,
        k in 1usize..=3,
    ) {
        let market = Market::new(&catalog, threshold).unwrap();

        let mut greedy_learner = learner.clone();
        let greedy = Greedy::new(market).recommend(&mut greedy_learner, k);
        let mut optimal_learner = learner.clone();
        let optimal = Optimal::new(market).recommend(&mut optimal_learner, k);

        prop_assert!(greedy.len() <= k);
        prop_assert!(optimal.len() <= k);
        prop_assert!(
            market.nb_applicable_jobs(&optimal_learner) >= market.nb_applicable_jobs(&greedy_learner)
        );
    }

    #[test]
    fn recommendations_never_lower_levels(
        catalog in catalog(SMALL),
        learner in profile(5, 3, 3),
        k in 1usize..=3,
    ) {
        let market = Market::new(&catalog, 0.5).unwrap();
        let mut updated = learner.clone();
        let _ = Optimal::new(market).recommend(&mut updated, k);
        for (skill, level) in learner.iter() {
            prop_assert!(updated.level(skill) >= level);
        }
    }
}
