//! Command-line interface for merging disk files.
//!
//! The single `run` command reads `x y radius` records from a file or stdin,
//! merges them and renders a plain-text report.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionReport, MetricArg, RunCommand, render_report, run_cli,
};
