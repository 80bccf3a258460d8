//! Inverted index from skills to the jobs requiring them.

use std::collections::{BTreeSet, HashMap};

use crate::types::{Job, JobId, SkillId};

/// Skill → set of jobs requiring that skill.
///
/// Derived from the job list; rebuilt rather than mutated when jobs change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    buckets: HashMap<SkillId, BTreeSet<JobId>>,
}

impl InvertedIndex {
    /// Index every required skill of every job.
    pub fn build(jobs: &[Job]) -> Self {
        let mut buckets: HashMap<SkillId, BTreeSet<JobId>> = HashMap::new();
        for (position, job) in jobs.iter().enumerate() {
            for skill in job.required.skills() {
                buckets.entry(skill).or_default().insert(JobId(position));
            }
        }
        Self { buckets }
    }

    /// Jobs requiring `skill`, if any.
    pub fn jobs_requiring(&self, skill: SkillId) -> Option<&BTreeSet<JobId>> {
        self.buckets.get(&skill)
    }

    /// Number of jobs requiring `skill`.
    pub fn demand(&self, skill: SkillId) -> usize {
        self.buckets.get(&skill).map_or(0, BTreeSet::len)
    }

    /// Union of the buckets of `skills`: every job sharing at least one skill.
    pub fn candidates(&self, skills: impl IntoIterator<Item = SkillId>) -> BTreeSet<JobId> {
        let mut jobs = BTreeSet::new();
        for skill in skills {
            if let Some(bucket) = self.buckets.get(&skill) {
                jobs.extend(bucket.iter().copied());
            }
        }
        jobs
    }

    /// Number of indexed skills.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
