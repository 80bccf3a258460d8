//! `run` and `inspect` command implementations.

use anyhow::{Context, Result};
use coursepath_catalog::Dataset;
use coursepath_engine::{run as run_policy, Market, Policy, RecommendationReport};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{DatasetSettings, RunSettings};
use crate::dataset::load_dataset;

/// File name of a report: `{policy}_nbskills_{n}_k_{k}_run_{run}.json`.
pub fn report_file_name(policy: Policy, nb_skills: usize, k: usize, run: usize) -> String {
    format!("{policy}_nbskills_{nb_skills}_k_{k}_run_{run}.json")
}

/// Runs the configured policy `runs` times and writes one report per run.
///
/// The dataset is rebuilt for each run so every run starts from the original
/// learner profiles. Returns the written report paths.
pub fn execute_run(settings: &RunSettings) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&settings.results_dir).with_context(|| {
        format!(
            "Failed to create results directory {}",
            settings.results_dir.display()
        )
    })?;

    let mut written = Vec::with_capacity(settings.runs);
    for run in 0..settings.runs {
        let mut dataset = load_dataset(&settings.dataset.dataset, &settings.dataset.catalog)?;
        println!("{dataset}");

        let market = Market::new(&dataset.catalog, settings.dataset.threshold)?;
        let report = run_policy(settings.policy, &market, &mut dataset.learners, settings.k)?;
        print_report(&report);

        let path = settings.results_dir.join(report_file_name(
            settings.policy,
            dataset.catalog.nb_skills(),
            settings.k,
            run,
        ));
        write_report(&path, &report)?;
        tracing::info!(target: "coursepath::run", run, path = %path.display(), "Wrote report");
        written.push(path);
    }
    Ok(written)
}

fn print_report(report: &RecommendationReport) {
    println!(
        "The average attractiveness of the learners is {:.2}",
        report.original_attractiveness
    );
    println!(
        "The average nb of applicable jobs per learner is {:.2}",
        report.original_applicable_jobs
    );
    println!(
        "The average recommendation time is {:.4} seconds",
        report.avg_recommendation_time
    );
    println!(
        "The new average attractiveness of the learners is {:.2}",
        report.new_attractiveness
    );
    println!(
        "The new average nb of applicable jobs per learner is {:.2}",
        report.new_applicable_jobs
    );
}

fn write_report(path: &Path, report: &RecommendationReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))
}

/// Dataset figures printed by `inspect`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub learners: usize,
    pub jobs: usize,
    pub courses: usize,
    pub skills: usize,
    pub max_level: u32,
    /// Fewest and most skills held by a learner.
    pub learner_skills: Option<(usize, usize)>,
    pub threshold: f64,
    pub avg_learner_attractiveness: f64,
    pub avg_applicable_jobs: f64,
}

impl DatasetSummary {
    pub fn new(dataset: &Dataset, threshold: f64) -> Result<Self> {
        let market = Market::new(&dataset.catalog, threshold)?;
        Ok(Self {
            learners: dataset.learners.len(),
            jobs: dataset.catalog.jobs().len(),
            courses: dataset.catalog.courses().len(),
            skills: dataset.catalog.nb_skills(),
            max_level: dataset.catalog.max_level(),
            learner_skills: dataset.skill_count_range(),
            threshold,
            avg_learner_attractiveness: market.avg_learner_attractiveness(&dataset.learners),
            avg_applicable_jobs: market.avg_applicable_jobs(&dataset.learners),
        })
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Dataset with {} learners, {} jobs, {} courses and {} skills (levels 1..={}).",
            self.learners, self.jobs, self.courses, self.skills, self.max_level
        )?;
        if let Some((min, max)) = self.learner_skills {
            writeln!(f, "Learners hold between {min} and {max} skills.")?;
        }
        writeln!(
            f,
            "The average attractiveness of the learners is {:.2}",
            self.avg_learner_attractiveness
        )?;
        write!(
            f,
            "The average nb of applicable jobs per learner is {:.2} (threshold {})",
            self.avg_applicable_jobs, self.threshold
        )
    }
}

/// Loads the dataset and summarizes it.
pub fn execute_inspect(settings: &DatasetSettings) -> Result<DatasetSummary> {
    let dataset = load_dataset(&settings.dataset, &settings.catalog)?;
    DatasetSummary::new(&dataset, settings.threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursepath_catalog::CatalogConfig;
    use coursepath_test_utils::{sample_raw_dataset, TestFixture};

    fn settings(fixture: &TestFixture, policy: Policy, runs: usize) -> RunSettings {
        let dataset = fixture
            .write_dataset("dataset.json", &sample_raw_dataset())
            .unwrap();
        RunSettings {
            dataset: DatasetSettings {
                dataset,
                threshold: 0.5,
                catalog: CatalogConfig::default(),
            },
            policy,
            k: 2,
            runs,
            results_dir: fixture.results_dir.join("nested"),
        }
    }

    #[test]
    fn report_names_follow_convention() {
        assert_eq!(
            report_file_name(Policy::Optimal, 3, 2, 0),
            "optimal_nbskills_3_k_2_run_0.json"
        );
    }

    #[test]
    fn run_writes_one_report_per_run() {
        let fixture = TestFixture::new().unwrap();
        let settings = settings(&fixture, Policy::Greedy, 2);

        let written = execute_run(&settings).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[1].ends_with("greedy_nbskills_3_k_2_run_1.json"));
        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        assert_eq!(report["policy"], "greedy");
        assert_eq!(report["k"], 2);
        assert_eq!(report["new_applicable_jobs"], 2.0);
        let learners: Vec<_> = report["recommendations"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(learners, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn runs_start_from_original_profiles() {
        let fixture = TestFixture::new().unwrap();
        let settings = settings(&fixture, Policy::Optimal, 2);

        let written = execute_run(&settings).unwrap();
        let read = |path: &PathBuf| -> serde_json::Value {
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
        };
        let first = read(&written[0]);
        let second = read(&written[1]);
        assert_eq!(first["original_applicable_jobs"], second["original_applicable_jobs"]);
        assert_eq!(first["recommendations"], second["recommendations"]);
    }

    #[test]
    fn invalid_threshold_fails_before_writing() {
        let fixture = TestFixture::new().unwrap();
        let mut settings = settings(&fixture, Policy::Greedy, 1);
        settings.dataset.threshold = 1.5;

        let err = execute_run(&settings).unwrap_err();
        assert!(err.to_string().contains("outside [0, 1]"));
        assert_eq!(std::fs::read_dir(&settings.results_dir).unwrap().count(), 0);
    }

    #[test]
    fn inspect_summarizes_dataset() {
        let fixture = TestFixture::new().unwrap();
        let settings = settings(&fixture, Policy::Greedy, 1);

        let summary = execute_inspect(&settings.dataset).unwrap();

        assert_eq!(summary.learners, 3);
        assert_eq!(summary.jobs, 2);
        assert_eq!(summary.courses, 3);
        assert_eq!(summary.skills, 3);
        assert_eq!(summary.max_level, 3);
        assert_eq!(summary.learner_skills, Some((0, 2)));
        assert!(summary.to_string().starts_with("Dataset with 3 learners"));
    }
}
