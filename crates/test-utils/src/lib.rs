//! Shared test utilities for coursepath crates.
//!
//! This crate provides common catalogs, raw datasets, proptest strategies and
//! on-disk fixtures used across the coursepath workspace.

use std::path::{Path, PathBuf};

use coursepath_catalog::{
    Catalog, Course, Job, Level, MasteryMap, RawCourse, RawDataset, RawJob, RawLearner,
    SkillAnnotation, SkillId, SkillProfile, TaxonomyEntry,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One skill `A` with levels `0..=3`, a job requiring `A:2` and a course
/// providing `A:3` with no prerequisites.
pub fn scenario_catalog() -> Catalog {
    let jobs = vec![Job::new("job", SkillProfile::from([(0, 2)]))];
    let courses = vec![Course::new(
        "C1",
        SkillProfile::new(),
        SkillProfile::from([(0, 3)]),
    )];
    Catalog::from_parts(1, 3, jobs, courses).expect("scenario catalog is valid")
}

/// Learner of [`scenario_catalog`]: `A:1`.
pub fn scenario_learner() -> SkillProfile {
    SkillProfile::from([(0, 1)])
}

/// Shape of a generated catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogShape {
    pub nb_skills: usize,
    pub max_level: Level,
    pub nb_jobs: usize,
    pub nb_courses: usize,
    /// Most skills per job or course side.
    pub max_skills_per_record: usize,
}

impl Default for CatalogShape {
    fn default() -> Self {
        Self {
            nb_skills: 8,
            max_level: 3,
            nb_jobs: 12,
            nb_courses: 10,
            max_skills_per_record: 3,
        }
    }
}

/// Profile with between 1 and `max_skills` random skills.
pub fn random_profile(rng: &mut StdRng, shape: &CatalogShape, max_skills: usize) -> SkillProfile {
    let count = rng.gen_range(1..=max_skills.clamp(1, shape.nb_skills));
    (0..count)
        .map(|_| {
            let skill = SkillId(rng.gen_range(0..shape.nb_skills) as u32);
            (skill, rng.gen_range(1..=shape.max_level))
        })
        .collect()
}

/// Seeded random catalog. Every other course has prerequisites.
pub fn random_catalog(seed: u64, shape: CatalogShape) -> Catalog {
    let mut rng = StdRng::seed_from_u64(seed);
    let jobs = (0..shape.nb_jobs)
        .map(|i| {
            let required = random_profile(&mut rng, &shape, shape.max_skills_per_record);
            Job::new(format!("job-{i}"), required)
        })
        .collect();
    let courses = (0..shape.nb_courses)
        .map(|i| {
            let required = if i % 2 == 0 {
                SkillProfile::new()
            } else {
                random_profile(&mut rng, &shape, shape.max_skills_per_record)
            };
            let provided = random_profile(&mut rng, &shape, shape.max_skills_per_record);
            Course::new(format!("course-{i}"), required, provided)
        })
        .collect();
    Catalog::from_parts(shape.nb_skills, shape.max_level, jobs, courses)
        .expect("generated courses always provide a skill")
}

/// A small raw dataset exercising groups, unknown labels and repair.
///
/// Taxonomy: `python` and `sql` under `programming`, `stats` under `maths`.
/// Mastery labels: `beginner`=1, `intermediate`=2, `expert`=3, `unknown`=-1.
pub fn sample_raw_dataset() -> RawDataset {
    let ann = SkillAnnotation::new;
    RawDataset {
        taxonomy: vec![
            TaxonomyEntry::grouped("python", "programming"),
            TaxonomyEntry::grouped("sql", "programming"),
            TaxonomyEntry::grouped("stats", "maths"),
        ],
        mastery_levels: MasteryMap::from([
            ("beginner", 1),
            ("intermediate", 2),
            ("expert", 3),
            ("unknown", -1),
        ]),
        learners: vec![
            RawLearner {
                id: "alice".into(),
                skills: vec![ann("python", "beginner")],
            },
            RawLearner {
                id: "bob".into(),
                skills: vec![ann("sql", "intermediate"), ann("stats", "beginner")],
            },
            RawLearner {
                id: "carol".into(),
                skills: vec![],
            },
        ],
        jobs: vec![
            RawJob {
                id: "data-engineer".into(),
                skills: vec![ann("python", "intermediate"), ann("sql", "intermediate")],
            },
            RawJob {
                id: "analyst".into(),
                skills: vec![ann("sql", "beginner"), ann("stats", "intermediate")],
            },
        ],
        courses: vec![
            RawCourse {
                id: "python-101".into(),
                required: vec![],
                provided: vec![ann("python", "intermediate")],
            },
            RawCourse {
                id: "sql-basics".into(),
                required: vec![],
                provided: vec![ann("sql", "intermediate")],
            },
            RawCourse {
                id: "applied-stats".into(),
                required: vec![ann("sql", "beginner")],
                provided: vec![ann("stats", "unknown")],
            },
            RawCourse {
                id: "reading-group".into(),
                required: vec![ann("stats", "beginner")],
                provided: vec![],
            },
        ],
    }
}

/// Proptest strategies over canonical profiles and catalogs.
pub mod strategies {
    use super::*;
    use proptest::collection::btree_map;
    use proptest::prelude::*;

    /// Sparse profile over `nb_skills` skills with levels in `1..=max_level`.
    pub fn profile(
        nb_skills: usize,
        max_level: Level,
        max_len: usize,
    ) -> impl Strategy<Value = SkillProfile> {
        btree_map(
            (0..nb_skills as u32).prop_map(SkillId),
            1..=max_level,
            0..=max_len,
        )
        .prop_map(|levels| levels.into_iter().collect::<SkillProfile>())
    }

    /// Catalog with at least one course.
    pub fn catalog(shape: CatalogShape) -> impl Strategy<Value = Catalog> {
        let record = move || profile(shape.nb_skills, shape.max_level, shape.max_skills_per_record);
        let jobs = proptest::collection::vec(record(), 1..=shape.nb_jobs);
        let courses = proptest::collection::vec(
            (record(), profile(shape.nb_skills, shape.max_level, shape.max_skills_per_record)
                .prop_filter("course must teach something", |p| !p.is_empty())),
            1..=shape.nb_courses,
        );
        (jobs, courses).prop_map(move |(jobs, courses)| {
            let jobs = jobs
                .into_iter()
                .enumerate()
                .map(|(i, required)| Job::new(format!("job-{i}"), required))
                .collect();
            let courses = courses
                .into_iter()
                .enumerate()
                .map(|(i, (required, provided))| {
                    Course::new(format!("course-{i}"), required, provided)
                })
                .collect();
            Catalog::from_parts(shape.nb_skills, shape.max_level, jobs, courses)
                .expect("courses always provide a skill")
        })
    }
}

/// Temporary home with a dataset file, a config file and a results directory.
///
/// The tempdir is automatically cleaned up when this struct is dropped.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
    /// Path to `$HOME/.coursepath` in the temp environment
    pub config_dir: PathBuf,
    /// Where reports are written
    pub results_dir: PathBuf,
}

impl TestFixture {
    /// Creates `$HOME/.coursepath/` and `results/`.
    ///
    /// Does NOT set HOME; pass [`TestFixture::home_path`] to the child process.
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let config_dir = tempdir.path().join(".coursepath");
        let results_dir = tempdir.path().join("results");

        std::fs::create_dir_all(&config_dir)?;
        std::fs::create_dir_all(&results_dir)?;

        Ok(Self {
            tempdir,
            config_dir,
            results_dir,
        })
    }

    /// Get the path that should be set as HOME.
    pub fn home_path(&self) -> &Path {
        self.tempdir.path()
    }

    /// Write `dataset` as JSON and return its path.
    pub fn write_dataset(&self, name: &str, dataset: &RawDataset) -> std::io::Result<PathBuf> {
        let path = self.tempdir.path().join(name);
        let json = serde_json::to_string_pretty(dataset)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Write `$HOME/.coursepath/config.toml`.
    pub fn write_config(&self, content: &str) -> std::io::Result<PathBuf> {
        let path = self.config_dir.join("config.toml");
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
