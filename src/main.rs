//! Triage - explainable priority ranking for task lists

use std::process::ExitCode;

fn main() -> ExitCode {
    triage_cli::cli::run()
}
