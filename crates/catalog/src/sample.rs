//! Seeded subsampling of loaded records.

use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// How many records of each kind to keep. `None` keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub learners: Option<usize>,
    pub jobs: Option<usize>,
    pub courses: Option<usize>,
    /// Seed of the generator owned by the builder.
    pub seed: u64,
}

/// Draw `size` items without replacement, keeping them in draw order.
pub(crate) fn subsample<T>(
    items: Vec<T>,
    size: Option<usize>,
    rng: &mut StdRng,
    kind: &'static str,
) -> Result<Vec<T>> {
    let Some(size) = size else {
        return Ok(items);
    };
    if size > items.len() {
        return Err(CatalogError::SampleTooLarge {
            kind,
            requested: size,
            available: items.len(),
        });
    }

    let picks = index::sample(rng, items.len(), size);
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let sampled = picks
        .into_iter()
        .filter_map(|position| slots[position].take())
        .collect::<Vec<_>>();

    tracing::debug!(
        target: "coursepath::catalog",
        kind,
        kept = sampled.len(),
        available = slots.len(),
        "Subsampled records"
    );

    Ok(sampled)
}
