//! Command implementations and argument parsing for the `diskmerge` CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use diskmerge_core::{DiskMergeError, DiskMergerBuilder, DistanceMetric, MergeOutcome, Relaxation};
use diskmerge_providers_text::{DiskTextSource, TextProviderError};
use thiserror::Error;
use tracing::{Span, debug, field, info, instrument};

const STDIN_MARKER: &str = "-";
const STDIN_NAME: &str = "stdin";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "diskmerge",
    about = "Merge overlapping disks into a maximum set of centre-disjoint disks."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Merge the disks read from a file or stdin.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone, Default)]
pub struct RunCommand {
    /// File with one `x y radius` record per line; `-` or nothing reads stdin.
    pub path: Option<PathBuf>,

    /// Distance metric used for pruning and disjointness.
    #[arg(long, value_enum)]
    pub metric: Option<MetricArg>,

    /// Treat coordinates as latitude/longitude degrees (haversine metric).
    #[arg(short = 'g', long, conflicts_with = "metric")]
    pub geographic: bool,

    /// Use a fixed relaxation constant, capped at each pair's bound.
    #[arg(long = "big-m", value_name = "M")]
    pub big_m: Option<f64>,

    /// Check the merge outcome before reporting it.
    #[arg(long)]
    pub verify: bool,

    /// Override name for the disk set (defaults to the file stem).
    #[arg(long)]
    pub name: Option<String>,
}

impl RunCommand {
    /// Resolves the metric selected by `--metric` or `--geographic`.
    #[must_use]
    pub fn distance_metric(&self) -> DistanceMetric {
        if self.geographic {
            return DistanceMetric::Haversine;
        }
        self.metric.map_or_else(DistanceMetric::default, DistanceMetric::from)
    }

    /// Resolves the relaxation selected by `--big-m`.
    #[must_use]
    pub fn relaxation(&self) -> Relaxation {
        self.big_m.map_or(Relaxation::Tight, Relaxation::Fixed)
    }

    fn input_path(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .filter(|path| path.as_os_str() != STDIN_MARKER)
    }
}

/// Metric names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Squared Euclidean distance on planar coordinates.
    Planar,
    /// Great-circle distance in metres.
    Haversine,
}

impl From<MetricArg> for DistanceMetric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Planar => Self::SquaredEuclidean,
            MetricArg::Haversine => Self::Haversine,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Disk records could not be read.
    #[error(transparent)]
    Text(#[from] TextProviderError),
    /// Configuring or running the merge failed.
    #[error(transparent)]
    Core(#[from] DiskMergeError),
}

/// Outcome of a `run` command, ready for rendering.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Name of the merged disk set.
    pub disk_set: String,
    /// Number of input disks.
    pub disk_count: usize,
    /// The merge mapping and resulting disks.
    pub outcome: MergeOutcome,
}

/// Executes `cli`, reading stdin when no input path is given.
///
/// # Errors
/// Returns [`CliError`] when reading the input or merging fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use diskmerge_cli::cli::{Cli, Command, RunCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 0 1\n0 0 1\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         path: Some(file.path().to_path_buf()),
///         ..RunCommand::default()
///     }),
/// };
/// let report = run_cli(cli)?;
/// assert_eq!(report.disk_count, 2);
/// assert_eq!(report.outcome.selected_count(), 1);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionReport, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(&run, io::stdin().lock())
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command, stdin),
    fields(
        path = field::Empty,
        metric = field::Empty,
        relaxation = field::Empty,
        verify = command.verify,
    ),
)]
pub(super) fn run_command(
    command: &RunCommand,
    stdin: impl BufRead,
) -> Result<ExecutionReport, CliError> {
    let metric = command.distance_metric();
    let relaxation = command.relaxation();
    let span = Span::current();
    span.record("metric", field::display(metric));
    span.record("relaxation", field::display(relaxation));

    let merger = DiskMergerBuilder::new()
        .with_metric(metric)
        .with_relaxation(relaxation)
        .with_verification(command.verify)
        .build()?;

    let source = match command.input_path() {
        Some(path) => {
            span.record("path", field::display(path.display()));
            let name = derive_disk_set_name(Some(path), command.name.as_deref());
            DiskTextSource::try_from_reader(name, open_reader(path)?)?
        }
        None => {
            span.record("path", field::display(STDIN_MARKER));
            let name = derive_disk_set_name(None, command.name.as_deref());
            DiskTextSource::try_from_reader(name, stdin)?
        }
    };

    if source.is_empty() {
        debug!(disk_set = source.name(), "input holds no disk records");
    }
    let disks = source.into_disk_set();
    let outcome = merger.run(&disks)?;
    info!(
        disk_set = disks.name(),
        disks = disks.len(),
        selected = outcome.selected_count(),
        "command completed"
    );
    Ok(ExecutionReport {
        disk_set: disks.name().to_owned(),
        disk_count: disks.len(),
        outcome,
    })
}

#[instrument(name = "cli.open_reader", err, fields(path = %path.display()))]
pub(super) fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_disk_set_name(path: Option<&Path>, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }
    path.and_then(Path::file_stem)
        .and_then(|stem| stem.to_str())
        .unwrap_or(STDIN_NAME)
        .to_owned()
}

/// Writes `report` in the plain-text report format.
///
/// Merges are listed as `member -> target` in increasing member order;
/// resulting disks as `x y  radius` in increasing index order, skipping
/// selected disks whose aggregated radius is zero. Coordinates and radii keep
/// a fractional part, so whole numbers print as `2.0`.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use diskmerge_cli::cli::{ExecutionReport, render_report};
/// # use diskmerge_core::{DiskSet, MergeOutcome};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let disks = DiskSet::from_triples("demo", [(0.0, 0.0, 1.0), (0.0, 0.0, 2.0)])?;
/// let report = ExecutionReport {
///     disk_set: "demo".into(),
///     disk_count: 2,
///     outcome: MergeOutcome::from_mapping(&disks, vec![1, 1]),
/// };
/// let mut buffer = Vec::new();
/// render_report(&report, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "Disks: 2\nMerges:\n  0 -> 1\nResulting disks:\n  0.0 0.0  3.0\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_report(report: &ExecutionReport, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "Disks: {}", report.disk_count)?;
    writeln!(writer, "Merges:")?;
    for (member, target) in report.outcome.merges() {
        writeln!(writer, "  {member} -> {target}")?;
    }
    writeln!(writer, "Resulting disks:")?;
    for disk in report.outcome.output_disks() {
        writeln!(writer, "  {:?} {:?}  {:?}", disk.centre.x, disk.centre.y, disk.radius)?;
    }
    Ok(())
}
