//! Eisenhower matrix view of analyzed tasks
//!
//! Splits an analyzed list into four quadrants by importance rating and
//! final score. Quadrants keep the order of the analyzed list.

use serde::{Deserialize, Serialize};

use super::task::AnalyzedTask;

/// Quadrant of the Eisenhower matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Urgent and important
    DoFirst,
    /// Important, not urgent
    Schedule,
    /// Urgent, not important
    Delegate,
    /// Neither
    Eliminate,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::DoFirst,
        Quadrant::Schedule,
        Quadrant::Delegate,
        Quadrant::Eliminate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::DoFirst => "Do First (urgent & important)",
            Quadrant::Schedule => "Schedule (important, not urgent)",
            Quadrant::Delegate => "Delegate (urgent, not important)",
            Quadrant::Eliminate => "Eliminate (neither)",
        }
    }
}

/// Cut-offs for the two matrix axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixThresholds {
    /// Minimum importance rating counted as important
    pub importance: f64,
    /// Score above which a task counts as urgent
    pub score: f64,
}

impl Default for MatrixThresholds {
    fn default() -> Self {
        Self {
            importance: 7.0,
            score: 50.0,
        }
    }
}

impl MatrixThresholds {
    /// Places one analyzed task
    pub fn classify(&self, task: &AnalyzedTask) -> Quadrant {
        let important = task.record.importance() >= self.importance;
        let urgent = task.score > self.score;
        match (important, urgent) {
            (true, true) => Quadrant::DoFirst,
            (true, false) => Quadrant::Schedule,
            (false, true) => Quadrant::Delegate,
            (false, false) => Quadrant::Eliminate,
        }
    }
}

/// Analyzed tasks grouped by quadrant
#[derive(Debug, Default, Serialize)]
pub struct EisenhowerMatrix<'a> {
    pub do_first: Vec<&'a AnalyzedTask>,
    pub schedule: Vec<&'a AnalyzedTask>,
    pub delegate: Vec<&'a AnalyzedTask>,
    pub eliminate: Vec<&'a AnalyzedTask>,
}

impl<'a> EisenhowerMatrix<'a> {
    pub fn build(tasks: &'a [AnalyzedTask], thresholds: &MatrixThresholds) -> Self {
        let mut matrix = Self::default();
        for task in tasks {
            match thresholds.classify(task) {
                Quadrant::DoFirst => matrix.do_first.push(task),
                Quadrant::Schedule => matrix.schedule.push(task),
                Quadrant::Delegate => matrix.delegate.push(task),
                Quadrant::Eliminate => matrix.eliminate.push(task),
            }
        }
        matrix
    }

    pub fn quadrant(&self, quadrant: Quadrant) -> &[&'a AnalyzedTask] {
        match quadrant {
            Quadrant::DoFirst => &self.do_first,
            Quadrant::Schedule => &self.schedule,
            Quadrant::Delegate => &self.delegate,
            Quadrant::Eliminate => &self.eliminate,
        }
    }

    pub fn len(&self) -> usize {
        Quadrant::ALL.iter().map(|q| self.quadrant(*q).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analyzer::analyze;
    use chrono::NaiveDate;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn tasks_land_in_expected_quadrants() {
        let tasks = vec![
            // importance 9, overdue: important and urgent
            json!({"id": "fire", "importance": 9, "due_date": "2025-01-10"}),
            // importance 8, no date: 96 + 5 = 101 > 50, still urgent by score
            json!({"id": "plan", "importance": 8}),
            // importance 2, overdue: urgent only
            json!({"id": "noise", "importance": 2, "due_date": "2025-01-01"}),
            // importance 1, far away: neither
            json!({"id": "later", "importance": 1, "estimated_hours": 20}),
        ];
        let results = analyze(&tasks, "smart", today()).unwrap();
        let matrix = EisenhowerMatrix::build(&results, &MatrixThresholds::default());

        let ids = |q: Quadrant| -> Vec<String> {
            matrix.quadrant(q).iter().map(|t| t.id().to_string()).collect()
        };
        assert_eq!(ids(Quadrant::DoFirst), vec!["fire", "plan"]);
        assert!(ids(Quadrant::Schedule).is_empty());
        assert_eq!(ids(Quadrant::Delegate), vec!["noise"]);
        assert_eq!(ids(Quadrant::Eliminate), vec!["later"]);
        assert_eq!(matrix.len(), 4);
    }

    #[test]
    fn schedule_quadrant_under_deadline_strategy() {
        let tasks = vec![json!({"id": "strategic", "importance": 10})];
        let results = analyze(&tasks, "deadline", today()).unwrap();
        let matrix = EisenhowerMatrix::build(&results, &MatrixThresholds::default());
        assert_eq!(matrix.schedule.len(), 1);
    }

    #[test]
    fn cyclic_tasks_are_never_urgent() {
        let tasks = vec![
            json!({"id": 1, "importance": 10, "dependencies": [2]}),
            json!({"id": 2, "importance": 1, "dependencies": [1]}),
        ];
        let results = analyze(&tasks, "smart", today()).unwrap();
        let thresholds = MatrixThresholds::default();
        let quadrants: Vec<_> = results.iter().map(|t| thresholds.classify(t)).collect();
        assert!(quadrants.contains(&Quadrant::Schedule));
        assert!(quadrants.contains(&Quadrant::Eliminate));
    }

    #[test]
    fn thresholds_parse_from_toml() {
        let thresholds: MatrixThresholds = toml::from_str("importance = 5.0").unwrap();
        assert_eq!(thresholds.importance, 5.0);
        assert_eq!(thresholds.score, 50.0);
    }

    #[test]
    fn empty_matrix() {
        let matrix = EisenhowerMatrix::build(&[], &MatrixThresholds::default());
        assert!(matrix.is_empty());
    }
}
