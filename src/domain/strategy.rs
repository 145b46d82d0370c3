//! Scoring strategies
//!
//! A strategy turns the per-task factors (urgency, downstream impact,
//! importance, hour estimate) into a score and a short explanation.
//!
//! | Strategy | Score |
//! |----------|-------|
//! | `smart` (default) | weighted blend of all four factors |
//! | `fastest` | `100 / (hours + 1)` |
//! | `impact` | `importance * 15` |
//! | `deadline` | `urgency * 2` |
//!
//! Tasks flagged as part of a circular dependency always score `-1`,
//! whatever the strategy.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::TaskId;

/// Score given to tasks in a circular dependency
pub const CYCLIC_SCORE: f64 = -1.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("task {0} has an hour estimate of -1, which leaves no effort to divide by")]
    ZeroEffortDenominator(TaskId),
}

/// Named weighting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Strategy {
    /// Balanced blend of urgency, importance, effort and impact
    #[default]
    Smart,
    /// Quick wins first
    Fastest,
    /// Most important first
    Impact,
    /// Closest deadline first
    Deadline,
}

impl Strategy {
    /// All strategies, default first
    pub const ALL: [Strategy; 4] = [
        Strategy::Smart,
        Strategy::Fastest,
        Strategy::Impact,
        Strategy::Deadline,
    ];

    /// Resolves a strategy name; anything unrecognized is [`Strategy::Smart`]
    pub fn from_name(name: &str) -> Self {
        match name {
            "fastest" => Strategy::Fastest,
            "impact" => Strategy::Impact,
            "deadline" => Strategy::Deadline,
            "smart" => Strategy::Smart,
            other => {
                tracing::debug!(strategy = other, "unrecognized strategy, using smart");
                Strategy::Smart
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Smart => "smart",
            Strategy::Fastest => "fastest",
            Strategy::Impact => "impact",
            Strategy::Deadline => "deadline",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Smart => "Balances urgency, importance, effort and blocked tasks",
            Strategy::Fastest => "Prefers tasks with the lowest hour estimate",
            Strategy::Impact => "Prefers tasks with the highest importance",
            Strategy::Deadline => "Prefers tasks with the closest due date",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Strategy::from_name(s))
    }
}

impl From<String> for Strategy {
    fn from(value: String) -> Self {
        Strategy::from_name(&value)
    }
}

impl From<Strategy> for String {
    fn from(strategy: Strategy) -> Self {
        strategy.as_str().to_string()
    }
}

/// Weights of the `smart` strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartWeights {
    /// Multiplier for the urgency score
    pub urgency: f64,
    /// Multiplier for `importance * 10`
    pub importance: f64,
    /// Multiplier for the effort score `max(0, 10 - hours) * 2`
    pub effort: f64,
    /// Multiplier for the impact score
    pub dependency: f64,
}

impl Default for SmartWeights {
    fn default() -> Self {
        Self {
            urgency: 1.5,
            importance: 1.2,
            effort: 0.5,
            dependency: 2.0,
        }
    }
}

/// Per-task inputs to the scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factors {
    pub importance: f64,
    pub hours: f64,
    pub urgency: i64,
    /// Impact with the per-dependent scaling already applied
    pub impact: i64,
    pub cyclic: bool,
}

/// Score and explanation for one task
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub score: f64,
    pub explanation: String,
}

// Thresholds for the smart strategy's notes
const DUE_SOON_URGENCY: i64 = 60;
const HIGH_IMPORTANCE: f64 = 8.0;
const QUICK_WIN_HOURS: f64 = 2.0;

/// Scores one task
pub fn score(
    id: &TaskId,
    factors: &Factors,
    strategy: Strategy,
    weights: &SmartWeights,
) -> Result<Scored, ScoreError> {
    if factors.cyclic {
        return Ok(Scored {
            score: CYCLIC_SCORE,
            explanation: "critical: circular dependency detected".to_string(),
        });
    }

    let (raw, notes) = match strategy {
        Strategy::Fastest => {
            let denominator = factors.hours + 1.0;
            if denominator == 0.0 {
                return Err(ScoreError::ZeroEffortDenominator(id.clone()));
            }
            (
                100.0 / denominator,
                vec![format!("fast win: only {} hours", factors.hours)],
            )
        }
        Strategy::Impact => (
            factors.importance * 15.0,
            vec![format!("importance rating {}", factors.importance)],
        ),
        Strategy::Deadline => (
            factors.urgency as f64 * 2.0,
            vec![format!("urgency score {}", factors.urgency)],
        ),
        Strategy::Smart => smart(factors, weights),
    };

    let explanation = if notes.is_empty() {
        "standard priority".to_string()
    } else {
        notes.join("; ")
    };

    Ok(Scored {
        score: round2(raw),
        explanation,
    })
}

fn smart(factors: &Factors, weights: &SmartWeights) -> (f64, Vec<String>) {
    let effort = (10.0 - factors.hours).max(0.0) * 2.0;

    let score = factors.urgency as f64 * weights.urgency
        + factors.importance * 10.0 * weights.importance
        + effort * weights.effort
        + factors.impact as f64 * weights.dependency;

    let mut notes = Vec::new();
    if factors.urgency > DUE_SOON_URGENCY {
        notes.push("due very soon".to_string());
    }
    if factors.importance >= HIGH_IMPORTANCE {
        notes.push("high importance".to_string());
    }
    if factors.hours <= QUICK_WIN_HOURS {
        notes.push("quick win".to_string());
    }
    if factors.impact > 0 {
        notes.push(format!(
            "blocks {} other tasks",
            factors.impact / super::graph::IMPACT_PER_DEPENDENT
        ));
    }

    (score, notes)
}

/// Rounds to two decimals, ties to even
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
