//! Skill namespace built from a taxonomy.
//!
//! Raw records name skills by their taxonomy leaf identifier. The namespace
//! maps those identifiers onto dense [`SkillId`]s, either one id per leaf or
//! one id per aggregation group, so that learners, jobs and courses all share
//! the same coordinates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CatalogError, Result};
use crate::types::SkillId;

/// How raw taxonomy leaves are mapped onto skill ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillGranularity {
    /// One skill id per taxonomy leaf.
    #[default]
    Leaf,
    /// One skill id per aggregation group; leaves of a group share its id.
    Group,
}

/// One row of the skill taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    /// Unique leaf identifier referenced by raw records.
    pub id: String,
    /// Coarser aggregation label. Leaves without one form their own group.
    #[serde(default)]
    pub group: Option<String>,
}

impl TaxonomyEntry {
    pub fn leaf(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group: None,
        }
    }

    pub fn grouped(id: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group: Some(group.into()),
        }
    }
}

/// Bidirectional mapping between raw skill identifiers and [`SkillId`]s.
#[derive(Debug, Clone, Default)]
pub struct SkillIndex {
    /// Raw leaf id → skill id.
    ids: HashMap<String, SkillId>,
    /// Skill id → display name (leaf id or group label).
    names: Vec<String>,
}

/// Namespace slot a leaf is assigned to. Group labels and leaf ids never
/// share a slot, even when spelled the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GroupKey<'t> {
    Group(&'t str),
    Leaf(&'t str),
}

impl<'t> GroupKey<'t> {
    fn name(self) -> &'t str {
        match self {
            GroupKey::Group(name) | GroupKey::Leaf(name) => name,
        }
    }
}

impl SkillIndex {
    /// Assign skill ids in order of first appearance in the taxonomy.
    pub fn from_taxonomy(entries: &[TaxonomyEntry], granularity: SkillGranularity) -> Result<Self> {
        let mut index = SkillIndex::default();
        let mut groups: HashMap<GroupKey<'_>, SkillId> = HashMap::new();

        for entry in entries {
            if index.ids.contains_key(&entry.id) {
                return Err(CatalogError::DuplicateSkill(entry.id.clone()));
            }

            let key = match (granularity, entry.group.as_deref()) {
                (SkillGranularity::Group, Some(group)) => GroupKey::Group(group),
                _ => GroupKey::Leaf(entry.id.as_str()),
            };

            let skill = match groups.get(&key) {
                Some(&existing) => existing,
                None => {
                    let next = SkillId(index.names.len() as u32);
                    index.names.push(key.name().to_string());
                    groups.insert(key, next);
                    next
                }
            };

            index.ids.insert(entry.id.clone(), skill);
        }

        tracing::debug!(
            target: "coursepath::catalog",
            leaves = entries.len(),
            skills = index.names.len(),
            ?granularity,
            "Built skill namespace"
        );

        Ok(index)
    }

    /// Resolve a raw leaf identifier.
    pub fn resolve(&self, raw: &str) -> Option<SkillId> {
        self.ids.get(raw).copied()
    }

    /// Display name of a skill id.
    pub fn name(&self, skill: SkillId) -> Option<&str> {
        self.names.get(skill.index()).map(String::as_str)
    }

    /// Number of skill ids (`nb_skills`).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
