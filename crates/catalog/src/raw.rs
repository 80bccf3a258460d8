//! Raw, pre-canonical records as they arrive from a dataset.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{CatalogError, Result};
use crate::skills::{SkillIndex, TaxonomyEntry};
use crate::types::{Level, SkillId, SkillProfile};

/// Mastery value marking a label whose level is unknown.
pub const UNKNOWN_MASTERY: i32 = -1;

/// A skill mention with a symbolic mastery label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAnnotation {
    /// Raw taxonomy leaf identifier.
    pub skill: String,
    /// Mastery label, translated through the [`MasteryMap`].
    pub mastery: String,
}

impl SkillAnnotation {
    pub fn new(skill: impl Into<String>, mastery: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            mastery: mastery.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLearner {
    pub id: String,
    #[serde(default)]
    pub skills: Vec<SkillAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawJob {
    pub id: String,
    #[serde(default)]
    pub skills: Vec<SkillAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCourse {
    pub id: String,
    /// Prerequisites.
    #[serde(default)]
    pub required: Vec<SkillAnnotation>,
    /// Skills taught. A course without any is skipped at load time.
    #[serde(default)]
    pub provided: Vec<SkillAnnotation>,
}

/// Everything needed to build a catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDataset {
    pub taxonomy: Vec<TaxonomyEntry>,
    pub mastery_levels: MasteryMap,
    #[serde(default)]
    pub learners: Vec<RawLearner>,
    #[serde(default)]
    pub jobs: Vec<RawJob>,
    #[serde(default)]
    pub courses: Vec<RawCourse>,
}

/// Symbolic mastery label → ordinal level.
///
/// A label mapped to [`UNKNOWN_MASTERY`] stands for "level not stated"; the
/// builder substitutes the per-kind default from [`UnknownDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MasteryMap(pub HashMap<String, i32>);

impl MasteryMap {
    /// Highest positive level of the map.
    pub fn max_level(&self) -> Result<Level> {
        self.0
            .values()
            .filter(|&&v| v > 0)
            .max()
            .map(|&v| v as Level)
            .ok_or(CatalogError::EmptyMasteryMap)
    }

    /// Distinct positive levels of the map, ascending.
    pub fn levels(&self) -> Vec<Level> {
        let mut levels: Vec<Level> = self
            .0
            .values()
            .filter(|&&v| v > 0)
            .map(|&v| v as Level)
            .collect();
        levels.sort_unstable();
        levels.dedup();
        levels
    }

    /// Reject negative values other than the unknown sentinel.
    pub fn validate(&self) -> Result<()> {
        let mut labels: Vec<_> = self.0.iter().collect();
        labels.sort();
        for (label, &value) in labels {
            if value < 0 && value != UNKNOWN_MASTERY {
                return Err(CatalogError::InvalidMasteryLevel {
                    label: label.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Translate a label. `None` when the label is not in the map.
    pub fn resolve(&self, label: &str, unknown: Level) -> Option<Level> {
        self.0.get(label).map(|&value| {
            if value == UNKNOWN_MASTERY {
                unknown
            } else {
                value.max(0) as Level
            }
        })
    }
}

impl<const N: usize> From<[(&str, i32); N]> for MasteryMap {
    fn from(pairs: [(&str, i32); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(label, value)| (label.to_string(), value))
                .collect(),
        )
    }
}

/// Level substituted for an unknown mastery label, per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnknownDefaults {
    pub learner: Level,
    pub job: Level,
    pub course: Level,
}

impl Default for UnknownDefaults {
    fn default() -> Self {
        Self {
            learner: 1,
            job: 3,
            course: 2,
        }
    }
}

/// Canonicalize a list of annotations into a profile.
///
/// Annotations with a label missing from the mastery map are skipped. Repeated
/// mentions of one skill are averaged and rounded half up.
pub(crate) fn average_levels(
    annotations: &[SkillAnnotation],
    skills: &SkillIndex,
    mastery: &MasteryMap,
    unknown: Level,
    record: &str,
) -> Result<SkillProfile> {
    let mut sums: BTreeMap<SkillId, (u64, u64)> = BTreeMap::new();

    for annotation in annotations {
        let Some(level) = mastery.resolve(&annotation.mastery, unknown) else {
            tracing::debug!(
                target: "coursepath::catalog",
                record,
                label = %annotation.mastery,
                "Skipping annotation with unmapped mastery label"
            );
            continue;
        };
        let skill = skills
            .resolve(&annotation.skill)
            .ok_or_else(|| CatalogError::SkillNotFound {
                skill: annotation.skill.clone(),
                record: record.to_string(),
            })?;
        let entry = sums.entry(skill).or_insert((0, 0));
        entry.0 += u64::from(level);
        entry.1 += 1;
    }

    Ok(sums
        .into_iter()
        .map(|(skill, (sum, count))| (skill, round_half_up(sum, count)))
        .collect())
}

/// `round(sum / count)` with ties going to the higher level.
fn round_half_up(sum: u64, count: u64) -> Level {
    ((2 * sum + count) / (2 * count)) as Level
}
