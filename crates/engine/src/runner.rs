//! Apply a policy to every learner and report before/after market metrics.

use std::time::{Duration, Instant};

use coursepath_catalog::Learner;
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::market::Market;
use crate::recommend::Policy;

/// Aggregate outcome of one recommendation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub policy: Policy,
    pub k: usize,
    pub threshold: f64,
    /// Mean attractiveness before any recommendation.
    pub original_attractiveness: f64,
    /// Mean applicable jobs before any recommendation.
    pub original_applicable_jobs: f64,
    /// Mean wall-clock seconds spent per learner.
    pub avg_recommendation_time: f64,
    pub new_attractiveness: f64,
    pub new_applicable_jobs: f64,
    /// Course ids recommended to each learner, keyed by learner id in input order.
    pub recommendations: IndexMap<String, Vec<String>>,
}

impl RecommendationReport {
    /// Learners that received at least one course.
    pub fn nb_recommended(&self) -> usize {
        self.recommendations
            .values()
            .filter(|courses| !courses.is_empty())
            .count()
    }
}

/// Run `policy` for every learner, updating their profiles in place.
pub fn run(
    policy: Policy,
    market: &Market<'_>,
    learners: &mut [Learner],
    k: usize,
) -> Result<RecommendationReport> {
    if k == 0 {
        return Err(EngineError::InvalidHorizon);
    }

    let original_attractiveness = market.avg_learner_attractiveness(learners);
    let original_applicable_jobs = market.avg_applicable_jobs(learners);
    tracing::info!(
        target: "coursepath::runner",
        %policy,
        k,
        threshold = market.threshold(),
        learners = learners.len(),
        attractiveness = original_attractiveness,
        applicable_jobs = original_applicable_jobs,
        "Starting recommendations"
    );

    let recommender = policy.recommender(*market);
    let mut recommendations = IndexMap::with_capacity(learners.len());
    let mut elapsed = Duration::ZERO;

    for learner in learners.iter_mut() {
        let started = Instant::now();
        let sequence = recommender.recommend(&mut learner.skills, k);
        let spent = started.elapsed();
        elapsed += spent;

        let courses: Vec<String> = sequence
            .iter()
            .filter_map(|&id| market.course(id).ok())
            .map(|course| course.id.clone())
            .collect();

        tracing::debug!(
            target: "coursepath::runner",
            learner = %learner.id,
            courses = ?courses,
            elapsed_us = spent.as_micros() as u64,
            "Recommended courses"
        );
        recommendations.insert(learner.id.clone(), courses);
    }

    let avg_recommendation_time = if learners.is_empty() {
        0.0
    } else {
        elapsed.as_secs_f64() / learners.len() as f64
    };

    let report = RecommendationReport {
        policy,
        k,
        threshold: market.threshold(),
        original_attractiveness,
        original_applicable_jobs,
        avg_recommendation_time,
        new_attractiveness: market.avg_learner_attractiveness(learners),
        new_applicable_jobs: market.avg_applicable_jobs(learners),
        recommendations,
    };

    tracing::info!(
        target: "coursepath::runner",
        %policy,
        attractiveness = report.new_attractiveness,
        applicable_jobs = report.new_applicable_jobs,
        avg_time_s = report.avg_recommendation_time,
        "Finished recommendations"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursepath_catalog::{Catalog, Course, Job, SkillProfile};

    fn catalog() -> Catalog {
        let jobs = vec![
            Job::new("dev", SkillProfile::from([(0, 2)])),
            Job::new("lead", SkillProfile::from([(0, 2), (1, 2)])),
        ];
        let courses = vec![
            Course::new("intro", SkillProfile::new(), SkillProfile::from([(0, 2)])),
            Course::new("mgmt", SkillProfile::from([(0, 2)]), SkillProfile::from([(1, 2)])),
        ];
        Catalog::from_parts(2, 3, jobs, courses).unwrap()
    }

    #[test]
    fn reports_metrics_and_sequences() {
        let catalog = catalog();
        let market = Market::new(&catalog, 1.0).unwrap();
        let mut learners = vec![
            Learner::new("novice", SkillProfile::new()),
            Learner::new("expert", SkillProfile::from([(0, 3), (1, 3)])),
        ];

        let report = run(Policy::Greedy, &market, &mut learners, 2).unwrap();

        assert_eq!(report.original_applicable_jobs, 1.0);
        assert_eq!(report.new_applicable_jobs, 2.0);
        assert_eq!(report.original_attractiveness, 1.5);
        assert_eq!(report.new_attractiveness, 3.0);
        assert_eq!(
            report.recommendations.keys().collect::<Vec<_>>(),
            vec!["novice", "expert"]
        );
        assert_eq!(report.recommendations["novice"], vec!["intro", "mgmt"]);
        assert!(report.recommendations["expert"].is_empty());
        assert_eq!(report.nb_recommended(), 1);
        assert_eq!(learners[0].skills, SkillProfile::from([(0, 2), (1, 2)]));
    }

    #[test]
    fn rejects_zero_horizon() {
        let catalog = catalog();
        let market = Market::new(&catalog, 0.5).unwrap();
        assert_eq!(
            run(Policy::Optimal, &market, &mut [], 0).unwrap_err(),
            EngineError::InvalidHorizon
        );
    }

    #[test]
    fn empty_learner_set_reports_zeros() {
        let catalog = catalog();
        let market = Market::new(&catalog, 0.5).unwrap();
        let report = run(Policy::Optimal, &market, &mut [], 1).unwrap();
        assert_eq!(report.avg_recommendation_time, 0.0);
        assert_eq!(report.original_applicable_jobs, 0.0);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn serializes_policy_label() {
        let catalog = catalog();
        let market = Market::new(&catalog, 0.5).unwrap();
        let report = run(Policy::Optimal, &market, &mut [], 1).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["policy"], "optimal");
        assert_eq!(json["k"], 1);
    }
}
