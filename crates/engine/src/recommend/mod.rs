//! Course-sequence recommendation policies.

mod greedy;
mod optimal;

pub use greedy::Greedy;
pub use optimal::Optimal;

use coursepath_catalog::{CourseId, SkillProfile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::market::Market;

/// A policy producing up to `k` courses for a learner.
pub trait Recommender {
    /// Which policy this is.
    fn policy(&self) -> Policy;

    /// Recommend up to `k` courses and apply them to `learner` in order.
    ///
    /// The returned sequence may be shorter than `k` when no further course
    /// is worth taking.
    fn recommend(&self, learner: &mut SkillProfile, k: usize) -> Vec<CourseId>;
}

/// Available recommendation policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// One-step lookahead, repeated `k` times.
    #[default]
    Greedy,
    /// Exhaustive search over course sequences of length up to `k`.
    Optimal,
}

impl Policy {
    /// Returns a stable label for this policy.
    pub fn label(&self) -> &'static str {
        match self {
            Policy::Greedy => "greedy",
            Policy::Optimal => "optimal",
        }
    }

    /// Instantiate the policy over a market.
    pub fn recommender<'a>(self, market: Market<'a>) -> Box<dyn Recommender + 'a> {
        match self {
            Policy::Greedy => Box::new(Greedy::new(market)),
            Policy::Optimal => Box::new(Optimal::new(market)),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("greedy") {
            Ok(Policy::Greedy)
        } else if s.eq_ignore_ascii_case("optimal") {
            Ok(Policy::Optimal)
        } else {
            Err(format!("unknown policy '{s}' (expected 'greedy' or 'optimal')"))
        }
    }
}
