//! The report commands behind the CLI subcommands.
//!
//! Each report loads its own input and renders its own chart; neither
//! depends on the other having run or succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{error, info, info_span};

use netlog_ingest::{CONN_LOG_FILE, load_all_csvs, load_and_standardize_log};
use netlog_report::{
    BucketWidth, ChartOutput, ImageFormat, ProtocolShare, TimeBuckets,
    plot_connections_over_time, plot_protocol_pie,
};

use crate::summary::{SummaryFormat, print_protocol_share, print_timeline};

/// File stem of the protocol share chart.
pub const PIE_CHART_STEM: &str = "combined_application_protocol_share_by_count_pie";
/// File stem of the connections chart.
pub const LINE_CHART_STEM: &str = "connections_over_time_from_conn_line";

/// Inputs and side effects shared by both reports.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Directory holding the `<logtype>.log.csv` exports.
    pub csv_dir: PathBuf,
    /// Directory charts are written to (created if absent).
    pub output_dir: PathBuf,
    pub format: ImageFormat,
    /// Also open each chart interactively.
    pub show: bool,
    pub summary: SummaryFormat,
}

impl ReportOptions {
    pub fn new(csv_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            csv_dir: csv_dir.into(),
            output_dir: output_dir.into(),
            format: ImageFormat::preferred(),
            show: false,
            summary: SummaryFormat::Table,
        }
    }

    /// Path of a chart with the given stem inside the output directory.
    pub fn chart_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{stem}.{}", self.format.extension()))
    }

    fn chart_output(&self, stem: &str) -> ChartOutput {
        ChartOutput::file(self.chart_path(stem), self.format).with_show(self.show)
    }
}

fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create output dir {}", dir.display()))
}

/// Protocol share pie over every export in the CSV directory.
pub fn run_protocol_share(options: &ReportOptions) -> Result<Option<ProtocolShare>> {
    let span = info_span!("protocol_share", csv_dir = %options.csv_dir.display());
    let _guard = span.enter();

    let combined = load_all_csvs(&options.csv_dir);
    ensure_output_dir(&options.output_dir)?;

    let share = plot_protocol_pie(&combined, &options.chart_output(PIE_CHART_STEM))
        .context("render protocol share pie")?;
    if let Some(share) = &share {
        print_protocol_share(share, options.summary)?;
    }
    Ok(share)
}

/// Connections line chart from the connection log only.
pub fn run_timeline(options: &ReportOptions, width: &BucketWidth) -> Result<Option<TimeBuckets>> {
    let span = info_span!("timeline", csv_dir = %options.csv_dir.display(), bin = %width);
    let _guard = span.enter();

    let conn_csv = options.csv_dir.join(CONN_LOG_FILE);
    if !conn_csv.is_file() {
        bail!("File not found: {}", conn_csv.display());
    }

    let records = match load_and_standardize_log(&conn_csv) {
        Some(records) if !records.is_empty() => records,
        _ => {
            info!("No data loaded from {CONN_LOG_FILE}");
            return Ok(None);
        }
    };
    ensure_output_dir(&options.output_dir)?;

    let series =
        plot_connections_over_time(&records, width, &options.chart_output(LINE_CHART_STEM))
            .context("render connections line chart")?;
    if let Some(series) = &series {
        print_timeline(series, width);
    }
    Ok(series)
}

/// Runs both reports; a failing report is logged and does not stop the other.
///
/// Returns the number of reports that failed.
pub fn run_all(options: &ReportOptions, width: &BucketWidth) -> usize {
    let mut failures = 0;
    if let Err(err) = run_protocol_share(options) {
        error!("protocol share report failed: {err:#}");
        failures += 1;
    }
    if let Err(err) = run_timeline(options, width) {
        error!("timeline report failed: {err:#}");
        failures += 1;
    }
    failures
}
