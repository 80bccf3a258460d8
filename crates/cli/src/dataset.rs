//! Dataset loading from JSON.

use anyhow::{Context, Result};
use coursepath_catalog::{CatalogBuilder, CatalogConfig, Dataset, RawDataset};
use std::path::Path;

/// Reads a raw dataset from a JSON file.
pub fn load_raw_dataset(path: &Path) -> Result<RawDataset> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset {}", path.display()))
}

/// Loads and canonicalizes a dataset.
pub fn load_dataset(path: &Path, config: &CatalogConfig) -> Result<Dataset> {
    let raw = load_raw_dataset(path)?;
    let dataset = CatalogBuilder::new(config.clone())
        .build(raw)
        .with_context(|| format!("Failed to build catalog from {}", path.display()))?;

    tracing::info!(
        target: "coursepath::dataset",
        path = %path.display(),
        learners = dataset.learners.len(),
        jobs = dataset.catalog.jobs().len(),
        courses = dataset.catalog.courses().len(),
        skills = dataset.catalog.nb_skills(),
        "Loaded dataset"
    );
    Ok(dataset)
}
