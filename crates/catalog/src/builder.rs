//! Catalog construction: canonicalization, subsampling, repair and indexing.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{CatalogError, Result};
use crate::index::InvertedIndex;
use crate::raw::{average_levels, RawDataset, UnknownDefaults};
use crate::sample::{subsample, SampleConfig};
use crate::skills::{SkillGranularity, SkillIndex};
use crate::types::{Course, CourseId, Job, Learner, Level, SkillProfile};

/// Read-only market and course catalog.
///
/// Learners are not part of the catalog: they are the only mutable entity and
/// live next to it in a [`Dataset`].
#[derive(Debug, Clone)]
pub struct Catalog {
    nb_skills: usize,
    max_level: Level,
    levels: Vec<Level>,
    jobs: Vec<Job>,
    courses: Vec<Course>,
    job_index: InvertedIndex,
}

impl Catalog {
    /// Build a catalog from canonical records.
    ///
    /// Every skill id must lie in `[0, nb_skills)`. Courses are repaired so
    /// that no prerequisite reaches the level the course provides, and courses
    /// left with nothing to teach are dropped.
    pub fn from_parts(
        nb_skills: usize,
        max_level: Level,
        jobs: Vec<Job>,
        courses: Vec<Course>,
    ) -> Result<Self> {
        for job in &jobs {
            check_range(&job.required, nb_skills, &job.id)?;
        }
        for course in &courses {
            check_range(&course.required, nb_skills, &course.id)?;
            check_range(&course.provided, nb_skills, &course.id)?;
        }

        let loaded = courses.len();
        let mut repaired = 0;
        let courses: Vec<Course> = courses
            .into_iter()
            .filter_map(|mut course| {
                repaired += course.make_consistent();
                course.is_teachable().then_some(course)
            })
            .collect();

        if courses.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        tracing::debug!(
            target: "coursepath::catalog",
            loaded,
            kept = courses.len(),
            repaired_requirements = repaired,
            "Repaired course catalog"
        );

        let job_index = InvertedIndex::build(&jobs);
        Ok(Self {
            nb_skills,
            max_level,
            levels: (1..=max_level).collect(),
            jobs,
            courses,
            job_index,
        })
    }

    /// Size of the skill namespace.
    pub fn nb_skills(&self) -> usize {
        self.nb_skills
    }

    /// Highest mastery level.
    pub fn max_level(&self) -> Level {
        self.max_level
    }

    /// Positive levels a skill may hold, ascending. Every level in
    /// `1..=max_level` unless narrowed with [`Catalog::with_levels`].
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Restrict the level scale to `levels`, e.g. the values a mastery map
    /// defines. Levels outside `1..=max_level` are ignored; an empty result
    /// keeps the current scale.
    pub fn with_levels(mut self, levels: impl IntoIterator<Item = Level>) -> Self {
        let mut scale: Vec<Level> = levels
            .into_iter()
            .filter(|level| (1..=self.max_level).contains(level))
            .collect();
        scale.sort_unstable();
        scale.dedup();
        if !scale.is_empty() {
            self.levels = scale;
        }
        self
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(id.0)
    }

    /// Iterate courses with their ids, in catalog order.
    pub fn iter_courses(&self) -> impl Iterator<Item = (CourseId, &Course)> {
        self.courses
            .iter()
            .enumerate()
            .map(|(position, course)| (CourseId(position), course))
    }

    /// Inverted index over the job list.
    pub fn job_index(&self) -> &InvertedIndex {
        &self.job_index
    }
}

/// A catalog together with the learners to recommend for.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub catalog: Catalog,
    pub learners: Vec<Learner>,
}

impl Dataset {
    /// Pair canonical learners with a catalog, validating their skill ids.
    pub fn new(catalog: Catalog, learners: Vec<Learner>) -> Result<Self> {
        for learner in &learners {
            check_range(&learner.skills, catalog.nb_skills(), &learner.id)?;
        }
        Ok(Self { catalog, learners })
    }

    /// Smallest and largest possessed-skill count among learners.
    pub fn skill_count_range(&self) -> Option<(usize, usize)> {
        let counts = self.learners.iter().map(|l| l.skills.len());
        let min = counts.clone().min()?;
        let max = counts.max()?;
        Some((min, max))
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset with {} learners, {} jobs, {} courses and {} skills.",
            self.learners.len(),
            self.catalog.jobs().len(),
            self.catalog.courses().len(),
            self.catalog.nb_skills()
        )
    }
}

/// Options controlling catalog construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Skill id granularity.
    pub granularity: SkillGranularity,
    /// Learners holding more skills than this are excluded.
    pub max_learner_skills: Option<usize>,
    /// Levels substituted for unknown mastery labels.
    pub unknown_defaults: UnknownDefaults,
    /// Seeded subsampling.
    pub sample: SampleConfig,
}

/// Builds a [`Dataset`] from raw records.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    config: CatalogConfig,
}

impl CatalogBuilder {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    /// Canonicalize, subsample, repair and index a raw dataset.
    pub fn build(&self, raw: RawDataset) -> Result<Dataset> {
        let RawDataset {
            taxonomy,
            mastery_levels,
            learners: raw_learners,
            jobs: raw_jobs,
            courses: raw_courses,
        } = raw;

        check_unique(raw_learners.iter().map(|r| r.id.as_str()), "learner")?;
        check_unique(raw_jobs.iter().map(|r| r.id.as_str()), "job")?;
        check_unique(raw_courses.iter().map(|r| r.id.as_str()), "course")?;

        mastery_levels.validate()?;
        let max_level = mastery_levels.max_level()?;
        let skills = SkillIndex::from_taxonomy(&taxonomy, self.config.granularity)?;
        let defaults = self.config.unknown_defaults;

        let mut learners = Vec::with_capacity(raw_learners.len());
        let mut oversized = 0;
        for raw in &raw_learners {
            let profile =
                average_levels(&raw.skills, &skills, &mastery_levels, defaults.learner, &raw.id)?;
            if let Some(cap) = self.config.max_learner_skills {
                if profile.len() > cap {
                    oversized += 1;
                    continue;
                }
            }
            learners.push(Learner::new(raw.id.clone(), profile));
        }
        if oversized > 0 {
            tracing::debug!(
                target: "coursepath::catalog",
                excluded = oversized,
                cap = ?self.config.max_learner_skills,
                "Excluded learners above the skill cap"
            );
        }

        let jobs = raw_jobs
            .iter()
            .map(|raw| {
                average_levels(&raw.skills, &skills, &mastery_levels, defaults.job, &raw.id)
                    .map(|required| Job::new(raw.id.clone(), required))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut courses = Vec::with_capacity(raw_courses.len());
        for raw in &raw_courses {
            if raw.provided.is_empty() {
                tracing::trace!(
                    target: "coursepath::catalog",
                    course = %raw.id,
                    "Skipping course without provided skills"
                );
                continue;
            }
            let provided =
                average_levels(&raw.provided, &skills, &mastery_levels, defaults.course, &raw.id)?;
            let required =
                average_levels(&raw.required, &skills, &mastery_levels, defaults.course, &raw.id)?;
            courses.push(Course::new(raw.id.clone(), required, provided));
        }

        let sample = &self.config.sample;
        let mut rng = StdRng::seed_from_u64(sample.seed);
        let learners = subsample(learners, sample.learners, &mut rng, "learners")?;
        let jobs = subsample(jobs, sample.jobs, &mut rng, "jobs")?;
        let courses = subsample(courses, sample.courses, &mut rng, "courses")?;

        let catalog = Catalog::from_parts(skills.len(), max_level, jobs, courses)?
            .with_levels(mastery_levels.levels());
        let dataset = Dataset::new(catalog, learners)?;

        tracing::debug!(target: "coursepath::catalog", "{dataset}");
        Ok(dataset)
    }
}

fn check_unique<'r>(ids: impl Iterator<Item = &'r str>, kind: &'static str) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateRecord {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_range(profile: &SkillProfile, nb_skills: usize, record: &str) -> Result<()> {
    match profile.max_skill() {
        Some(skill) if skill.index() >= nb_skills => Err(CatalogError::SkillNotFound {
            skill: skill.to_string(),
            record: record.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{MasteryMap, RawCourse, RawJob, RawLearner, SkillAnnotation};
    use crate::skills::TaxonomyEntry;
    use crate::types::SkillId;

    fn ann(skill: &str, mastery: &str) -> SkillAnnotation {
        SkillAnnotation::new(skill, mastery)
    }

    fn raw_dataset() -> RawDataset {
        RawDataset {
            taxonomy: vec![
                TaxonomyEntry::grouped("python", "programming"),
                TaxonomyEntry::grouped("rust", "programming"),
                TaxonomyEntry::grouped("sql", "data"),
            ],
            mastery_levels: MasteryMap::from([
                ("basic", 1),
                ("intermediate", 2),
                ("advanced", 3),
                ("unknown", -1),
            ]),
            learners: vec![
                RawLearner {
                    id: "alice".into(),
                    skills: vec![ann("python", "basic"), ann("python", "intermediate")],
                },
                RawLearner {
                    id: "bob".into(),
                    skills: vec![
                        ann("python", "basic"),
                        ann("rust", "basic"),
                        ann("sql", "unknown"),
                    ],
                },
            ],
            jobs: vec![RawJob {
                id: "data-engineer".into(),
                skills: vec![ann("python", "intermediate"), ann("sql", "unknown")],
            }],
            courses: vec![
                RawCourse {
                    id: "sql-101".into(),
                    required: vec![],
                    provided: vec![ann("sql", "intermediate")],
                },
                RawCourse {
                    id: "broken".into(),
                    required: vec![ann("rust", "advanced")],
                    provided: vec![ann("rust", "basic")],
                },
                RawCourse {
                    id: "no-outcome".into(),
                    required: vec![ann("python", "basic")],
                    provided: vec![],
                },
            ],
        }
    }

    #[test]
    fn builds_leaf_catalog() {
        let dataset = CatalogBuilder::default().build(raw_dataset()).unwrap();
        let catalog = &dataset.catalog;

        assert_eq!(catalog.nb_skills(), 3);
        assert_eq!(catalog.max_level(), 3);
        assert_eq!(dataset.learners.len(), 2);
        // 1 and 2 average to 1.5, rounded up
        assert_eq!(dataset.learners[0].skills, SkillProfile::from([(0, 2)]));
        // unknown learner level defaults to 1
        assert_eq!(dataset.learners[1].skills.level(SkillId(2)), 1);
        // unknown job level defaults to 3
        assert_eq!(catalog.jobs()[0].required, SkillProfile::from([(0, 2), (2, 3)]));
        assert_eq!(catalog.job_index().demand(SkillId(2)), 1);
    }

    #[test]
    fn repairs_and_drops_courses() {
        let dataset = CatalogBuilder::default().build(raw_dataset()).unwrap();
        let courses = dataset.catalog.courses();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].id, "sql-101");
        assert_eq!(courses[1].id, "broken");
        // advanced prerequisite lowered below the basic outcome, then removed
        assert!(courses[1].required.is_empty());
    }

    #[test]
    fn group_granularity_merges_levels() {
        let config = CatalogConfig {
            granularity: SkillGranularity::Group,
            ..Default::default()
        };
        let dataset = CatalogBuilder::new(config).build(raw_dataset()).unwrap();

        assert_eq!(dataset.catalog.nb_skills(), 2);
        // bob: python basic + rust basic -> programming 1, sql unknown -> data 1
        assert_eq!(dataset.learners[1].skills, SkillProfile::from([(0, 1), (1, 1)]));
    }

    #[test]
    fn learners_above_cap_are_excluded() {
        let config = CatalogConfig {
            max_learner_skills: Some(2),
            ..Default::default()
        };
        let dataset = CatalogBuilder::new(config).build(raw_dataset()).unwrap();

        assert_eq!(dataset.learners.len(), 1);
        assert_eq!(dataset.learners[0].id, "alice");
    }

    #[test]
    fn subsampling_is_reproducible() {
        let config = CatalogConfig {
            sample: SampleConfig {
                learners: Some(1),
                courses: Some(1),
                seed: 11,
                ..Default::default()
            },
            ..Default::default()
        };
        let first = CatalogBuilder::new(config.clone()).build(raw_dataset()).unwrap();
        let second = CatalogBuilder::new(config).build(raw_dataset()).unwrap();

        assert_eq!(first.learners, second.learners);
        assert_eq!(first.catalog.courses(), second.catalog.courses());
        assert_eq!(first.learners.len(), 1);
        assert_eq!(first.catalog.courses().len(), 1);
    }

    #[test]
    fn unknown_skill_is_fatal() {
        let mut raw = raw_dataset();
        raw.jobs[0].skills.push(ann("cobol", "basic"));

        let err = CatalogBuilder::default().build(raw).unwrap_err();
        assert!(matches!(err, CatalogError::SkillNotFound { ref skill, .. } if skill == "cobol"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut raw = raw_dataset();
        raw.learners.push(RawLearner {
            id: "alice".into(),
            skills: vec![ann("sql", "advanced")],
        });
        assert_eq!(
            CatalogBuilder::default().build(raw).unwrap_err(),
            CatalogError::DuplicateRecord {
                kind: "learner",
                id: "alice".into()
            }
        );

        let mut raw = raw_dataset();
        raw.jobs.push(raw.jobs[0].clone());
        let err = CatalogBuilder::default().build(raw).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate job id 'data-engineer'");

        // courses without outcomes still count as taken ids
        let mut raw = raw_dataset();
        raw.courses[0].id = "no-outcome".into();
        assert!(matches!(
            CatalogBuilder::default().build(raw).unwrap_err(),
            CatalogError::DuplicateRecord { kind: "course", .. }
        ));
    }

    #[test]
    fn empty_catalog_after_repair_is_fatal() {
        let mut raw = raw_dataset();
        raw.courses.retain(|c| c.id == "no-outcome");

        let err = CatalogBuilder::default().build(raw).unwrap_err();
        assert_eq!(err, CatalogError::EmptyCatalog);
    }

    #[test]
    fn from_parts_rejects_out_of_range_skill() {
        let courses = vec![Course::new("c", SkillProfile::new(), SkillProfile::from([(5, 1)]))];
        let err = Catalog::from_parts(3, 3, vec![], courses).unwrap_err();
        assert_eq!(
            err,
            CatalogError::SkillNotFound {
                skill: "5".into(),
                record: "c".into()
            }
        );
    }

    #[test]
    fn level_scale_follows_mastery_map() {
        let mut raw = raw_dataset();
        raw.mastery_levels = MasteryMap::from([
            ("basic", 1),
            ("intermediate", 1),
            ("advanced", 3),
            ("unknown", -1),
        ]);
        let dataset = CatalogBuilder::default().build(raw).unwrap();

        assert_eq!(dataset.catalog.max_level(), 3);
        assert_eq!(dataset.catalog.levels(), &[1, 3]);
    }

    #[test]
    fn from_parts_uses_contiguous_scale() {
        let courses = vec![Course::new("c", SkillProfile::new(), SkillProfile::from([(0, 1)]))];
        let catalog = Catalog::from_parts(1, 3, vec![], courses).unwrap();
        assert_eq!(catalog.levels(), &[1, 2, 3]);

        let narrowed = catalog.clone().with_levels([4, 2, 0, 2]);
        assert_eq!(narrowed.levels(), &[2]);
        assert_eq!(narrowed.with_levels([7]).levels(), &[2]);
    }

    #[test]
    fn dataset_summary() {
        let dataset = CatalogBuilder::default().build(raw_dataset()).unwrap();
        assert_eq!(
            dataset.to_string(),
            "Dataset with 2 learners, 1 jobs, 2 courses and 3 skills."
        );
        assert_eq!(dataset.skill_count_range(), Some((1, 3)));
    }
}
