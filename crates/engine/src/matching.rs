//! Skill-level matching scores.
//!
//! All scores lie in `[0, 1]` and are pure functions of the profiles. A score
//! averages [`skill_similarity`] over every skill of the target profile; target
//! skills the learner lacks contribute `0` but still count in the denominator.

use coursepath_catalog::{Course, Job, Level, SkillProfile};

/// Similarity of a possessed level to a required level.
///
/// Saturates at `1.0` once the learner meets the requirement. `required`
/// must be positive.
pub fn skill_similarity(possessed: Level, required: Level) -> f64 {
    debug_assert!(required > 0, "similarity against a zero requirement");
    f64::from(possessed.min(required)) / f64::from(required)
}

/// Average similarity over `target`, or `None` when `target` is empty.
fn average_similarity(learner: &SkillProfile, target: &SkillProfile) -> Option<f64> {
    if target.is_empty() {
        return None;
    }
    let total: f64 = target
        .iter()
        .map(|(skill, required)| skill_similarity(learner.level(skill), required))
        .sum();
    Some(total / target.len() as f64)
}

/// How well a learner fits a job. A job requiring nothing scores `0`.
pub fn learner_job_matching(learner: &SkillProfile, job: &Job) -> f64 {
    average_similarity(learner, &job.required).unwrap_or(0.0)
}

/// How well a learner meets a course's prerequisites. No prerequisites scores `1`.
pub fn learner_course_required_matching(learner: &SkillProfile, course: &Course) -> f64 {
    average_similarity(learner, &course.required).unwrap_or(1.0)
}

/// How much of what a course teaches the learner already knows.
///
/// A course providing nothing scores `1` (nothing left to learn); the catalog
/// never holds such a course.
pub fn learner_course_provided_matching(learner: &SkillProfile, course: &Course) -> f64 {
    average_similarity(learner, &course.provided).unwrap_or(1.0)
}

/// Combined course fit: prerequisites met and still something to learn.
pub fn learner_course_matching(learner: &SkillProfile, course: &Course) -> f64 {
    learner_course_required_matching(learner, course)
        * (1.0 - learner_course_provided_matching(learner, course))
}

/// Whether a learner may enroll in a course at `threshold`.
///
/// Prerequisites must match at least `threshold` and the course must teach
/// something the learner does not fully possess yet.
pub fn is_enrollable(learner: &SkillProfile, course: &Course, threshold: f64) -> bool {
    learner_course_required_matching(learner, course) >= threshold
        && learner_course_provided_matching(learner, course) < 1.0
}
