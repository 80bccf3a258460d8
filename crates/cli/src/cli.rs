use clap::{Args, Parser, Subcommand, ValueEnum};
use coursepath_catalog::SkillGranularity;
use coursepath_engine::Policy;
use std::path::PathBuf;

/// Skill id granularity.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GranularityArg {
    /// One id per taxonomy leaf.
    Leaf,
    /// One id per taxonomy group.
    Group,
}

impl From<GranularityArg> for SkillGranularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Leaf => SkillGranularity::Leaf,
            GranularityArg::Group => SkillGranularity::Group,
        }
    }
}

/// Command-line interface for the `coursepath` application.
#[derive(Debug, Parser)]
#[command(
    name = "coursepath",
    version,
    about = "Recommend course sequences that open the most jobs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available `coursepath` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Builds the catalog, runs a policy for every learner and writes one report per run.
    Run(RunArgs),
    /// Prints a dataset summary and the market averages before any recommendation.
    Inspect(DatasetArgs),
}

/// Options shared by every command that loads a dataset.
#[derive(Debug, Clone, Default, Args)]
pub struct DatasetArgs {
    /// Configuration file (default: `~/.coursepath/config.toml`).
    #[arg(long, env = "COURSEPATH_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// JSON dataset with taxonomy, mastery levels, learners, jobs and courses.
    #[arg(long, env = "COURSEPATH_DATASET", value_name = "FILE")]
    pub dataset: Option<PathBuf>,
    /// Matching threshold in [0, 1].
    #[arg(long, env = "COURSEPATH_THRESHOLD")]
    pub threshold: Option<f64>,
    /// Skill id granularity.
    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,
    /// Excludes learners holding more skills than this.
    #[arg(long, value_name = "N")]
    pub max_learner_skills: Option<usize>,
    /// Subsampling seed.
    #[arg(long, env = "COURSEPATH_SEED")]
    pub seed: Option<u64>,
}

/// Options of the `run` command.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Recommendation policy (`greedy` or `optimal`).
    #[arg(long, env = "COURSEPATH_POLICY")]
    pub policy: Option<Policy>,
    /// Number of courses to recommend per learner.
    #[arg(short, long, env = "COURSEPATH_K")]
    pub k: Option<usize>,
    /// Number of repeated runs.
    #[arg(long, env = "COURSEPATH_RUNS")]
    pub runs: Option<usize>,
    /// Directory receiving the JSON reports.
    #[arg(long, env = "COURSEPATH_RESULTS_DIR", value_name = "DIR")]
    pub results_dir: Option<PathBuf>,
}
