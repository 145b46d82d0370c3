//! Ranking commands (analyze, matrix, cycles, strategies)

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;

use super::output::Output;
use crate::domain::{
    normalize, AnalyzedTask, Analyzer, DependencyGraph, EisenhowerMatrix, Quadrant, Strategy,
    TaskLookup,
};
use crate::storage::{Config, InputFormat, TaskInput};

/// Where to read tasks from
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Task file (JSON, JSONL or YAML); reads stdin when omitted or `-`
    pub file: Option<PathBuf>,

    /// Input format (guessed from the file extension by default)
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,
}

/// How to score tasks
#[derive(Debug, Args)]
pub struct ScoringArgs {
    /// Scoring strategy: smart, fastest, impact or deadline (unknown names use smart)
    #[arg(long, short = 's', env = "TRIAGE_STRATEGY")]
    pub strategy: Option<String>,

    /// Reference date for urgency, YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub today: Option<NaiveDate>,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    crate::domain::parse_due_date(value)
        .ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

fn load(output: &Output, input: &InputArgs) -> Result<TaskInput> {
    let source = input
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());
    output.verbose_ctx("input", &format!("Reading tasks from {}", source));

    let tasks = TaskInput::read(input.file.as_deref(), input.input_format)
        .with_context(|| format!("Failed to load tasks from {}", source))?;
    output.verbose_ctx("input", &format!("Loaded {} task records", tasks.tasks.len()));
    Ok(tasks)
}

fn analyze_input(
    output: &Output,
    config: &Config,
    input: &InputArgs,
    scoring: &ScoringArgs,
) -> Result<(Analyzer, Vec<AnalyzedTask>)> {
    let tasks = load(output, input)?;
    let strategy = config.strategy(scoring.strategy.as_deref(), tasks.strategy.as_deref());
    let today = scoring.today.unwrap_or_else(|| Local::now().date_naive());
    output.verbose_ctx(
        "analyze",
        &format!("Strategy: {}, reference date: {}", strategy, today),
    );

    let analyzer = Analyzer::new(strategy)
        .with_reference_date(today)
        .with_weights(config.project.smart);
    let results = analyzer
        .analyze(&tasks.tasks)
        .context("Failed to analyze tasks")?;
    Ok((analyzer, results))
}

/// Priority band shown next to a rank
fn band(rank: usize) -> &'static str {
    match rank {
        1 => "high",
        2 | 3 => "medium",
        _ => "low",
    }
}

fn title(task: &AnalyzedTask) -> &str {
    task.record.title.as_deref().unwrap_or("-")
}

/// Score and rank tasks
pub fn analyze(
    output: &Output,
    config: &Config,
    input: &InputArgs,
    scoring: &ScoringArgs,
) -> Result<()> {
    let (analyzer, results) = analyze_input(output, config, input, scoring)?;

    if output.is_json() {
        output.data(&results);
        return Ok(());
    }

    if results.is_empty() {
        println!("No tasks to analyze.");
        return Ok(());
    }

    println!(
        "Ranked {} task(s) (strategy: {}, today: {})",
        results.len(),
        analyzer.strategy(),
        analyzer.reference_date()
    );
    println!(
        "{:<5} {:<7} {:<12} {:>8}  {:<10}  {:>6}  {:>6}  TITLE",
        "RANK", "BAND", "ID", "SCORE", "DUE", "HOURS", "IMP"
    );
    println!("{}", "-".repeat(80));

    for (i, task) in results.iter().enumerate() {
        let rank = i + 1;
        println!(
            "{:<5} {:<7} {:<12} {:>8.2}  {:<10}  {:>6}  {:>6}  {}",
            rank,
            band(rank),
            task.id().to_string(),
            task.score,
            task.record.due_date.as_deref().unwrap_or("N/A"),
            task.record.estimated_hours(),
            format!("{}/10", task.record.importance()),
            title(task)
        );
        println!("{:<5} {}", "", task.explanation);
    }

    Ok(())
}

/// Group ranked tasks into an Eisenhower matrix
pub fn matrix(
    output: &Output,
    config: &Config,
    input: &InputArgs,
    scoring: &ScoringArgs,
) -> Result<()> {
    let (_, results) = analyze_input(output, config, input, scoring)?;
    let thresholds = &config.project.matrix;
    output.verbose_ctx(
        "matrix",
        &format!(
            "Important: importance >= {}, urgent: score > {}",
            thresholds.importance, thresholds.score
        ),
    );

    let matrix = EisenhowerMatrix::build(&results, thresholds);

    if output.is_json() {
        output.data(&matrix);
        return Ok(());
    }

    for (i, quadrant) in Quadrant::ALL.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let tasks = matrix.quadrant(*quadrant);
        println!("{} [{}]", quadrant.label(), tasks.len());
        if tasks.is_empty() {
            println!("  (none)");
        }
        for task in tasks {
            println!(
                "  {:<12} {:>8.2}  {}",
                task.id().to_string(),
                task.score,
                title(task)
            );
        }
    }

    Ok(())
}

/// List tasks flagged as part of a circular dependency
pub fn cycles(output: &Output, input: &InputArgs) -> Result<()> {
    let tasks = load(output, input)?;
    let records = normalize(&tasks.tasks).context("Failed to read task records")?;
    let lookup = TaskLookup::build(&records);
    let graph = DependencyGraph::from_records(&records, &lookup);
    let cyclic = graph.cyclic_ids();
    output.verbose_ctx(
        "cycles",
        &format!(
            "Searched {} tasks and {} dependency edges",
            graph.task_count(),
            graph.edge_count()
        ),
    );

    // Input order, one entry per id
    let flagged: Vec<_> = lookup
        .ids()
        .filter(|id| cyclic.contains(*id))
        .filter_map(|id| lookup.get(id).map(|i| &records[i]))
        .collect();

    if output.is_json() {
        let items: Vec<_> = flagged
            .iter()
            .map(|record| {
                serde_json::json!({
                    "id": record.id,
                    "title": record.title,
                    "dependencies": record.dependencies,
                })
            })
            .collect();
        output.data(&items);
    } else if flagged.is_empty() {
        println!("No circular dependencies.");
    } else {
        println!("Circular dependencies ({}):", flagged.len());
        println!("{:<12} {:<30} DEPENDS ON", "ID", "TITLE");
        println!("{}", "-".repeat(70));
        for record in flagged {
            let deps: Vec<_> = record.dependencies.iter().map(|d| d.to_string()).collect();
            println!(
                "{:<12} {:<30} {}",
                record.id.to_string(),
                record.title.as_deref().unwrap_or("-"),
                deps.join(", ")
            );
        }
    }

    Ok(())
}

/// List available strategies
pub fn strategies(output: &Output, config: &Config) -> Result<()> {
    let default = config.strategy(None, None);

    if output.is_json() {
        let items: Vec<_> = Strategy::ALL
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.as_str(),
                    "description": s.description(),
                    "default": *s == default,
                })
            })
            .collect();
        output.data(&items);
    } else {
        for s in Strategy::ALL {
            let marker = if s == default { "*" } else { " " };
            println!("{} {:<10} {}", marker, s.as_str(), s.description());
        }
    }

    Ok(())
}
