//! Canonical entities: skills, levels, learners, jobs and courses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordinal mastery level. `0` means "not possessed" / "not required".
pub type Level = u32;

/// Index of a skill in the catalog's skill namespace `[0, nb_skills)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub u32);

impl SkillId {
    /// Returns the id as a vector index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SkillId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Position of a job in [`crate::Catalog::jobs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub usize);

/// Position of a course in [`crate::Catalog::courses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub usize);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sparse skill → level map. Zero levels are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<SkillId, Level>",
    into = "BTreeMap<SkillId, Level>"
)]
pub struct SkillProfile {
    levels: BTreeMap<SkillId, Level>,
}

impl From<BTreeMap<SkillId, Level>> for SkillProfile {
    fn from(levels: BTreeMap<SkillId, Level>) -> Self {
        levels.into_iter().collect()
    }
}

impl From<SkillProfile> for BTreeMap<SkillId, Level> {
    fn from(profile: SkillProfile) -> Self {
        profile.levels
    }
}

/// Record of the levels a course application overwrote.
///
/// Handing it back to [`SkillProfile::undo`] restores the profile exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct AppliedCourse {
    previous: Vec<(SkillId, Level)>,
}

impl AppliedCourse {
    /// Returns true when the application raised no level.
    pub fn is_noop(&self) -> bool {
        self.previous.is_empty()
    }

    /// Number of skills whose level was raised.
    pub fn raised(&self) -> usize {
        self.previous.len()
    }
}

impl SkillProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Level held for `skill`, `0` when absent.
    pub fn level(&self, skill: SkillId) -> Level {
        self.levels.get(&skill).copied().unwrap_or(0)
    }

    /// Set the level of a skill. Setting `0` removes it.
    pub fn set(&mut self, skill: SkillId, level: Level) {
        if level == 0 {
            self.levels.remove(&skill);
        } else {
            self.levels.insert(skill, level);
        }
    }

    pub fn contains(&self, skill: SkillId) -> bool {
        self.levels.contains_key(&skill)
    }

    /// Number of skills with a positive level.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate `(skill, level)` pairs in skill-id order.
    pub fn iter(&self) -> impl Iterator<Item = (SkillId, Level)> + '_ {
        self.levels.iter().map(|(&skill, &level)| (skill, level))
    }

    /// Iterate held skills in id order.
    pub fn skills(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.levels.keys().copied()
    }

    /// Largest skill id held, if any.
    pub fn max_skill(&self) -> Option<SkillId> {
        self.levels.keys().next_back().copied()
    }

    /// Raise every skill of `provided` to at least its provided level.
    ///
    /// Levels never decrease, so applying the same course twice is a no-op
    /// the second time.
    pub fn apply(&mut self, provided: &SkillProfile) -> AppliedCourse {
        let mut previous = Vec::new();
        for (skill, level) in provided.iter() {
            let current = self.level(skill);
            if level > current {
                previous.push((skill, current));
                self.levels.insert(skill, level);
            }
        }
        AppliedCourse { previous }
    }

    /// Revert an [`AppliedCourse`] produced by [`SkillProfile::apply`] on this profile.
    pub fn undo(&mut self, applied: AppliedCourse) {
        for (skill, level) in applied.previous.into_iter().rev() {
            self.set(skill, level);
        }
    }

    /// Copy of this profile with `provided` applied.
    pub fn with_applied(&self, provided: &SkillProfile) -> SkillProfile {
        let mut merged = self.clone();
        let _ = merged.apply(provided);
        merged
    }

    /// Dense level vector of length `nb_skills`. Skills outside the range are ignored.
    pub fn to_dense(&self, nb_skills: usize) -> Vec<Level> {
        let mut dense = vec![0; nb_skills];
        for (skill, level) in self.iter() {
            if let Some(slot) = dense.get_mut(skill.index()) {
                *slot = level;
            }
        }
        dense
    }
}

impl FromIterator<(SkillId, Level)> for SkillProfile {
    fn from_iter<I: IntoIterator<Item = (SkillId, Level)>>(iter: I) -> Self {
        let mut profile = SkillProfile::new();
        for (skill, level) in iter {
            profile.set(skill, level);
        }
        profile
    }
}

impl<const N: usize> From<[(u32, Level); N]> for SkillProfile {
    fn from(pairs: [(u32, Level); N]) -> Self {
        pairs
            .into_iter()
            .map(|(skill, level)| (SkillId(skill), level))
            .collect()
    }
}

/// A learner and the skills it currently possesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    /// External identifier, kept for reporting.
    pub id: String,
    /// Possessed skills.
    pub skills: SkillProfile,
}

impl Learner {
    pub fn new(id: impl Into<String>, skills: SkillProfile) -> Self {
        Self {
            id: id.into(),
            skills,
        }
    }
}

/// A job posting and the skills it requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// External identifier.
    pub id: String,
    /// Required skills.
    pub required: SkillProfile,
}

impl Job {
    pub fn new(id: impl Into<String>, required: SkillProfile) -> Self {
        Self {
            id: id.into(),
            required,
        }
    }
}

/// A course: prerequisites and the skills taught on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// External identifier.
    pub id: String,
    /// Prerequisite skills.
    pub required: SkillProfile,
    /// Skills gained on completion.
    pub provided: SkillProfile,
}

impl Course {
    pub fn new(id: impl Into<String>, required: SkillProfile, provided: SkillProfile) -> Self {
        Self {
            id: id.into(),
            required,
            provided,
        }
    }

    /// Lower every prerequisite that is not strictly below the level the
    /// course provides for the same skill. Returns the number of adjusted skills.
    ///
    /// A prerequisite lowered to `0` is dropped.
    pub fn make_consistent(&mut self) -> usize {
        let mut adjusted = 0;
        for (skill, provided) in self.provided.iter() {
            let required = self.required.level(skill);
            if required > 0 && provided <= required {
                self.required.set(skill, provided - 1);
                adjusted += 1;
            }
        }
        adjusted
    }

    /// True when the course still has something to teach.
    pub fn is_teachable(&self) -> bool {
        !self.provided.is_empty()
    }
}
