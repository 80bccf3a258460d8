//! Episodic course-recommendation environment for learned policies.
//!
//! An agent observes a learner's dense skill vector, picks a course, and is
//! rewarded with the number of applicable jobs after taking it. Choosing a
//! course the learner cannot enroll in ends the episode with a reward of
//! `-1`; otherwise the episode ends after `k` recommendations. Training the
//! agent happens elsewhere; this type only exposes the dynamics.

use coursepath_catalog::{CourseId, Level, SkillId, SkillProfile};
use rand::seq::index;
use rand::Rng;

use crate::error::{EngineError, Result};
use crate::market::Market;
use crate::matching::{learner_course_provided_matching, learner_course_required_matching};

/// Reward for choosing a course the learner cannot enroll in.
pub const INVALID_ACTION_REWARD: i64 = -1;

/// Outcome of one [`CourseEnv::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Applicable jobs after the step, or [`INVALID_ACTION_REWARD`].
    pub reward: i64,
    /// Whether the episode is over.
    pub terminated: bool,
    /// Applicable jobs for the current profile.
    pub nb_applicable_jobs: usize,
}

/// Course-recommendation environment over one market.
#[derive(Debug, Clone)]
pub struct CourseEnv<'a> {
    market: Market<'a>,
    k: usize,
    skills: SkillProfile,
    recommendations: usize,
    terminated: bool,
    skill_range: (usize, usize),
}

impl<'a> CourseEnv<'a> {
    /// Environment with episodes of at most `k` recommendations.
    pub fn new(market: Market<'a>, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(EngineError::InvalidHorizon);
        }
        let nb_skills = market.catalog().nb_skills();
        Ok(Self {
            market,
            k,
            skills: SkillProfile::new(),
            recommendations: 0,
            terminated: false,
            skill_range: (1, nb_skills.max(1)),
        })
    }

    /// Bounds on the number of skills of generated learners, usually taken
    /// from the dataset's learners.
    pub fn with_skill_range(mut self, min: usize, max: usize) -> Self {
        self.skill_range = (min.min(max), max);
        self
    }

    /// Number of actions (courses).
    pub fn nb_courses(&self) -> usize {
        self.market.catalog().courses().len()
    }

    /// Length of the observation vector.
    pub fn nb_skills(&self) -> usize {
        self.market.catalog().nb_skills()
    }

    /// Start an episode from `learner`. Returns the applicable-job count.
    pub fn reset(&mut self, learner: SkillProfile) -> usize {
        self.skills = learner;
        self.recommendations = 0;
        self.terminated = false;
        self.nb_applicable_jobs()
    }

    /// Start an episode from a generated learner.
    pub fn reset_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let learner = self.random_learner(rng);
        self.reset(learner)
    }

    /// Draw a learner with a skill count inside the configured range and
    /// levels uniform over the catalog's level scale.
    pub fn random_learner<R: Rng + ?Sized>(&self, rng: &mut R) -> SkillProfile {
        let nb_skills = self.nb_skills();
        let levels = self.market.catalog().levels();
        if nb_skills == 0 || levels.is_empty() {
            return SkillProfile::new();
        }

        let (min, max) = self.skill_range;
        let max = max.min(nb_skills);
        let count = rng.gen_range(min.min(max)..=max);

        index::sample(rng, nb_skills, count)
            .into_iter()
            .map(|position| {
                let level: Level = levels[rng.gen_range(0..levels.len())];
                (SkillId(position as u32), level)
            })
            .collect()
    }

    /// Current profile as a dense level vector.
    pub fn observation(&self) -> Vec<Level> {
        self.skills.to_dense(self.nb_skills())
    }

    /// Current profile.
    pub fn skills(&self) -> &SkillProfile {
        &self.skills
    }

    pub fn nb_applicable_jobs(&self) -> usize {
        self.market.nb_applicable_jobs(&self.skills)
    }

    /// Required and provided matchings of a course for the current profile.
    pub fn matchings(&self, course: CourseId) -> Result<(f64, f64)> {
        let course = self.market.course(course)?;
        Ok((
            learner_course_required_matching(&self.skills, course),
            learner_course_provided_matching(&self.skills, course),
        ))
    }

    pub fn is_enrollable(&self, course: CourseId) -> Result<bool> {
        let course = self.market.course(course)?;
        Ok(self.market.is_enrollable(&self.skills, course))
    }

    /// Whether the current episode is over.
    pub fn is_done(&self) -> bool {
        self.terminated
    }

    /// Take `course` for the current learner.
    pub fn step(&mut self, course: CourseId) -> Result<Step> {
        if self.terminated {
            return Err(EngineError::EpisodeFinished(self.recommendations));
        }
        let chosen = self.market.course(course)?;

        if !self.market.is_enrollable(&self.skills, chosen) {
            self.terminated = true;
            return Ok(Step {
                reward: INVALID_ACTION_REWARD,
                terminated: true,
                nb_applicable_jobs: self.nb_applicable_jobs(),
            });
        }

        let _ = self.skills.apply(&chosen.provided);
        self.recommendations += 1;
        self.terminated = self.recommendations == self.k;

        let nb_applicable_jobs = self.nb_applicable_jobs();
        Ok(Step {
            reward: nb_applicable_jobs as i64,
            terminated: self.terminated,
            nb_applicable_jobs,
        })
    }
}
