//! Main CLI application structure

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::rank::{self, InputArgs, ScoringArgs};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "triage")]
#[command(author, version, about = "Explainable priority ranking for task lists")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .triage/config.toml with default settings
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Score tasks and list them from most to least urgent
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// Group scored tasks into an Eisenhower matrix
    Matrix {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// Show tasks flagged as part of a circular dependency
    Cycles {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List the available scoring strategies
    Strategies,
}

/// Installs the stderr log subscriber
///
/// `TRIAGE_LOG` takes an env-filter directive; otherwise `--verbose`
/// enables debug events from this crate.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("TRIAGE_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,triage_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    // A subscriber may already be installed when embedded; keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            let output = Output::new(cli.format.unwrap_or_default(), cli.verbose);
            output.error(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };

    let format = cli.format.unwrap_or(config.global.default_format);
    let output = Output::new(format, cli.verbose);

    output.verbose("triage starting");
    if let Some(root) = &config.project_root {
        output.verbose(&format!("Using project config at: {}", root.display()));
    }

    match execute(cli.command, &config, &output) {
        Ok(()) => {
            output.verbose("Command completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Commands, config: &Config, output: &Output) -> Result<()> {
    match command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing config at: {}", path));
            let root = Path::new(&path);
            let config_path = Config::init_project(root)?;
            let project = Config::for_project(root)?;
            output.success(&format!(
                "Initialized triage config at {} (default strategy: {})",
                config_path.display(),
                project.strategy(None, None)
            ));
        }

        Commands::Analyze { input, scoring } => rank::analyze(output, config, &input, &scoring)?,
        Commands::Matrix { input, scoring } => rank::matrix(output, config, &input, &scoring)?,
        Commands::Cycles { input } => rank::cycles(output, &input)?,
        Commands::Strategies => rank::strategies(output, config)?,
    }

    Ok(())
}
