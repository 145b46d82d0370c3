//! Task analysis
//!
//! Wires the scoring pipeline together:
//!
//! 1. normalize raw records and build the id lookup
//! 2. flag circular dependencies (once per run)
//! 3. per task, in input order: urgency, downstream impact, strategy score
//! 4. stable sort by score, highest first
//!
//! Analysis is a pure function of the records, the strategy and the
//! reference date. No task is ever dropped.

use chrono::{Local, NaiveDate};
use serde_json::Value;
use thiserror::Error;

use super::graph::{DependencyGraph, ImpactIndex};
use super::strategy::{self, Factors, ScoreError, SmartWeights, Strategy};
use super::task::{normalize, AnalyzedTask, NormalizeError, TaskLookup, TaskRecord};
use super::urgency::urgency;

#[derive(Debug, Error, PartialEq)]
pub enum AnalyzeError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Score(#[from] ScoreError),
}

/// Configured analysis run
#[derive(Debug, Clone)]
pub struct Analyzer {
    strategy: Strategy,
    weights: SmartWeights,
    today: NaiveDate,
}

impl Analyzer {
    /// Creates an analyzer using today's local date as the reference date
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            weights: SmartWeights::default(),
            today: Local::now().date_naive(),
        }
    }

    /// Sets the reference date used for urgency
    pub fn with_reference_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Sets the weights used by the smart strategy
    pub fn with_weights(mut self, weights: SmartWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.today
    }

    /// Analyzes raw task records
    pub fn analyze(&self, tasks: &[Value]) -> Result<Vec<AnalyzedTask>, AnalyzeError> {
        let records = normalize(tasks)?;
        self.analyze_records(records)
    }

    /// Analyzes normalized records, returning them sorted by score
    pub fn analyze_records(
        &self,
        records: Vec<TaskRecord>,
    ) -> Result<Vec<AnalyzedTask>, AnalyzeError> {
        let lookup = TaskLookup::build(&records);
        let graph = DependencyGraph::from_records(&records, &lookup);
        let cyclic = graph.cyclic_ids();
        let impact = ImpactIndex::build(&records);

        tracing::debug!(
            tasks = records.len(),
            edges = graph.edge_count(),
            cyclic = cyclic.len(),
            strategy = %self.strategy,
            today = %self.today,
            "analyzing tasks"
        );

        let mut analyzed = Vec::with_capacity(records.len());
        for record in records {
            let factors = Factors {
                importance: record.importance(),
                hours: record.estimated_hours(),
                urgency: urgency(record.due_date.as_deref(), self.today),
                impact: impact.score(&record.id),
                cyclic: cyclic.contains(&record.id),
            };
            let scored = strategy::score(&record.id, &factors, self.strategy, &self.weights)?;

            tracing::trace!(
                id = %record.id,
                urgency = factors.urgency,
                impact = factors.impact,
                score = scored.score,
                "scored task"
            );

            analyzed.push(AnalyzedTask {
                record,
                urgency: factors.urgency,
                impact: factors.impact,
                cyclic: factors.cyclic,
                score: scored.score,
                explanation: scored.explanation,
            });
        }

        // Stable: equal scores keep input order
        analyzed.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(analyzed)
    }
}

/// Analyzes `tasks` with a strategy name and an explicit reference date
///
/// Unrecognized strategy names score with the smart strategy.
pub fn analyze(
    tasks: &[Value],
    strategy: &str,
    today: NaiveDate,
) -> Result<Vec<AnalyzedTask>, AnalyzeError> {
    Analyzer::new(Strategy::from_name(strategy))
        .with_reference_date(today)
        .analyze(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::TaskId;
    use chrono::Duration;
    use proptest::prelude::{prop_assert, prop_assert_eq, prop_oneof, proptest, Just};
    use proptest::strategy::Strategy as PropStrategy;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn ymd(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    fn ids(results: &[AnalyzedTask]) -> Vec<TaskId> {
        results.iter().map(|t| t.id().clone()).collect()
    }

    #[test]
    fn high_importance_wins() {
        let due = ymd(today() + Duration::days(30));
        let tasks = vec![
            json!({"id": 1, "importance": 10, "due_date": due, "estimated_hours": 5, "dependencies": []}),
            json!({"id": 2, "importance": 1, "due_date": due, "estimated_hours": 5, "dependencies": []}),
        ];
        let results = analyze(&tasks, "smart", today()).unwrap();
        assert_eq!(results[0].id(), &TaskId::Int(1));
    }

    #[test]
    fn past_due_beats_far_future() {
        let tasks = vec![
            json!({"id": 1, "due_date": ymd(today() + Duration::days(5 * 365)), "estimated_hours": 5}),
            json!({"id": 2, "due_date": ymd(today() - Duration::days(5 * 365)), "estimated_hours": 5}),
        ];
        let results = analyze(&tasks, "", today()).unwrap();
        assert_eq!(results[0].id(), &TaskId::Int(2));
        assert!(results[0].score > 100.0);
    }

    #[test]
    fn circular_dependency_detection() {
        let tasks = vec![
            json!({"id": 1, "dependencies": [2]}),
            json!({"id": 2, "dependencies": [1]}),
        ];
        let results = analyze(&tasks, "smart", today()).unwrap();
        for task in &results {
            assert_eq!(task.score, -1.0);
            assert!(task.explanation.contains("circular dependency"));
            assert!(task.cyclic);
        }
    }

    #[test]
    fn due_today_is_urgency_80() {
        let tasks = vec![json!({"id": 1, "due_date": ymd(today()), "estimated_hours": 5})];
        let results = analyze(&tasks, "deadline", today()).unwrap();
        assert_eq!(results[0].urgency, 80);
        assert_eq!(results[0].score, 160.0);
    }

    #[test]
    fn missing_due_date_is_urgency_0() {
        let tasks = vec![json!({"id": 1, "title": "No date"})];
        let results = analyze(&tasks, "smart", today()).unwrap();
        assert_eq!(results[0].urgency, 0);
    }

    #[test]
    fn cycle_ancestors_score_minus_one() {
        let tasks = vec![
            json!({"id": "A", "dependencies": ["B"]}),
            json!({"id": "B", "dependencies": ["C"]}),
            json!({"id": "C", "dependencies": ["D"]}),
            json!({"id": "D", "dependencies": ["C"]}),
            json!({"id": "E"}),
        ];
        let results = analyze(&tasks, "impact", today()).unwrap();
        assert_eq!(results[0].id(), &TaskId::from("E"));
        for task in &results[1..] {
            assert_eq!(task.score, -1.0, "task {}", task.id());
        }
    }

    #[test]
    fn impact_feeds_smart_score() {
        let tasks = vec![
            json!({"id": "base"}),
            json!({"id": "x", "dependencies": ["base"]}),
            json!({"id": "y", "dependencies": ["base"]}),
        ];
        let results = analyze(&tasks, "smart", today()).unwrap();
        assert_eq!(results[0].id(), &TaskId::from("base"));
        assert_eq!(results[0].impact, 20);
        assert!(results[0].explanation.contains("blocks 2 other tasks"));
    }

    #[test]
    fn missing_ids_use_positions() {
        let tasks = vec![json!({"title": "first"}), json!({"title": "second", "dependencies": [0]})];
        let results = analyze(&tasks, "smart", today()).unwrap();
        let first = results.iter().find(|t| t.record.position == 0).unwrap();
        assert_eq!(first.impact, 10);
    }

    #[test]
    fn ties_keep_input_order() {
        let tasks: Vec<_> = (0..6).map(|i| json!({"id": i})).collect();
        let results = analyze(&tasks, "smart", today()).unwrap();
        assert_eq!(ids(&results), (0..6).map(TaskId::Int).collect::<Vec<_>>());
    }

    #[test]
    fn custom_weights_change_order() {
        let tasks = vec![
            json!({"id": "important", "importance": 10}),
            json!({"id": "urgent", "due_date": ymd(today())}),
        ];
        let analyzer = Analyzer::new(Strategy::Smart)
            .with_reference_date(today())
            .with_weights(SmartWeights {
                urgency: 5.0,
                ..SmartWeights::default()
            });
        let results = analyzer.analyze(&tasks).unwrap();
        assert_eq!(results[0].id(), &TaskId::from("urgent"));
    }

    #[test]
    fn structural_errors_fail_the_run() {
        let analyzer = Analyzer::new(Strategy::Smart).with_reference_date(today());
        assert_eq!(
            analyzer.analyze(&[json!({"id": 1}), json!(42)]),
            Err(AnalyzeError::Normalize(NormalizeError::NotAMapping(1)))
        );
    }

    #[test]
    fn empty_input() {
        assert!(analyze(&[], "smart", today()).unwrap().is_empty());
    }

    #[test]
    fn zero_denominator_fails_fastest_only() {
        let tasks = vec![json!({"id": 1, "estimated_hours": -1})];
        assert!(matches!(
            analyze(&tasks, "fastest", today()),
            Err(AnalyzeError::Score(_))
        ));
        assert!(analyze(&tasks, "smart", today()).is_ok());
    }

    #[test]
    fn half_way_scores_round_to_even() {
        // 100 / 32 = 3.125
        let tasks = vec![json!({"id": 1, "estimated_hours": 31})];
        let results = analyze(&tasks, "fastest", today()).unwrap();
        assert_eq!(results[0].score, 3.12);
    }

    #[test]
    fn rounded_ties_keep_input_order() {
        // 100 / 32 rounds down to 3.12, level with 3.12 from the first task
        let tasks = vec![
            json!({"id": "a", "estimated_hours": 31.05}),
            json!({"id": "b", "estimated_hours": 31}),
        ];
        let results = analyze(&tasks, "fastest", today()).unwrap();
        assert_eq!(results[0].score, results[1].score);
        assert_eq!(ids(&results), vec![TaskId::from("a"), TaskId::from("b")]);
    }

    fn arb_task(count: usize) -> impl PropStrategy<Value = Value> {
        (
            0..count as i64,
            proptest::option::of(0.0..10.0f64),
            proptest::option::of(0.0..40.0f64),
            proptest::option::of(-60i64..400),
            proptest::collection::vec(0..count as i64 + 2, 0..3),
        )
            .prop_map(|(id, importance, hours, offset, deps)| {
                let mut task = json!({"id": id, "dependencies": deps});
                if let Some(i) = importance {
                    task["importance"] = json!(i);
                }
                if let Some(h) = hours {
                    task["estimated_hours"] = json!(h);
                }
                if let Some(days) = offset {
                    task["due_date"] = json!(ymd(today() + Duration::days(days)));
                }
                task
            })
    }

    fn arb_tasks() -> impl PropStrategy<Value = Vec<Value>> {
        proptest::collection::vec(arb_task(12), 0..12)
    }

    fn arb_strategy() -> impl PropStrategy<Value = &'static str> {
        prop_oneof![
            Just("smart"),
            Just("fastest"),
            Just("impact"),
            Just("deadline"),
            Just("unknown"),
        ]
    }

    proptest! {
        #[test]
        fn analysis_is_deterministic(tasks in arb_tasks(), strategy in arb_strategy()) {
            let first = analyze(&tasks, strategy, today()).unwrap();
            let second = analyze(&tasks, strategy, today()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn no_task_is_dropped(tasks in arb_tasks(), strategy in arb_strategy()) {
            let results = analyze(&tasks, strategy, today()).unwrap();
            prop_assert_eq!(results.len(), tasks.len());
        }

        #[test]
        fn output_is_sorted_and_stable(tasks in arb_tasks(), strategy in arb_strategy()) {
            let results = analyze(&tasks, strategy, today()).unwrap();
            for pair in results.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].record.position < pair[1].record.position);
                }
            }
        }

        #[test]
        fn cyclic_tasks_score_minus_one(tasks in arb_tasks(), strategy in arb_strategy()) {
            for task in analyze(&tasks, strategy, today()).unwrap() {
                if task.cyclic {
                    prop_assert_eq!(task.score, -1.0);
                    prop_assert!(task.explanation.contains("circular dependency"));
                }
            }
        }

        #[test]
        fn overdue_tasks_dominate(days in 1i64..2000, importance in 0.0..10.0f64, hours in 0.0..40.0f64) {
            let tasks = vec![json!({
                "id": 1,
                "importance": importance,
                "estimated_hours": hours,
                "due_date": ymd(today() - Duration::days(days)),
            })];
            for strategy in ["deadline", "smart"] {
                let results = analyze(&tasks, strategy, today()).unwrap();
                prop_assert!(results[0].urgency >= 102);
                prop_assert!(results[0].score >= 102.0);
            }
        }

        #[test]
        fn importance_is_monotonic_under_impact(low in 0.0..10.0f64, delta in 0.01..10.0f64) {
            let tasks = vec![
                json!({"id": "low", "importance": low}),
                json!({"id": "high", "importance": low + delta}),
            ];
            let results = analyze(&tasks, "impact", today()).unwrap();
            prop_assert_eq!(results[0].id(), &TaskId::from("high"));
            prop_assert!(results[0].score > results[1].score);
        }
    }
}
