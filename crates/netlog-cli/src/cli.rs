//! CLI argument definitions for the network log charts.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use netlog_report::BucketWidth;

#[derive(Parser)]
#[command(
    name = "netlog-charts",
    version,
    about = "Network log charts - protocol share and connections over time",
    long_about = "Normalize tabular network log exports (<logtype>.log.csv) and chart them.\n\n\
                  protocol-share: pie of events per application protocol over all exports.\n\
                  timeline: connections per time bucket from conn.log.csv."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Pie chart of event share by application protocol over all exports.
    ProtocolShare(ProtocolShareArgs),

    /// Line chart of connections over time from conn.log.csv.
    Timeline(TimelineArgs),

    /// Run both reports independently.
    All(AllArgs),
}

#[derive(Args)]
pub struct ReportArgs {
    /// Directory containing the <logtype>.log.csv exports.
    #[arg(long = "csv-dir", value_name = "DIR", default_value = "csv")]
    pub csv_dir: PathBuf,

    /// Directory charts are written to (created if absent).
    #[arg(long = "output-dir", value_name = "DIR", default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Chart file format (default: png; needs the Kaleido executable under KALEIDO_PATH).
    #[arg(long = "format", value_enum)]
    pub format: Option<ChartFormatArg>,

    /// Also open each chart in the browser.
    #[arg(long = "show")]
    pub show: bool,
}

#[derive(Args)]
pub struct ProtocolShareArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// How to print the slice summary.
    #[arg(long = "summary", value_enum, default_value = "table")]
    pub summary: SummaryArg,
}

#[derive(Args)]
pub struct TimelineArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Bucket width as an offset alias (e.g. 30S, 5min, 1H).
    #[arg(long = "bin", value_name = "WIDTH", default_value = "30S")]
    pub bin: BucketWidth,
}

#[derive(Args)]
pub struct AllArgs {
    #[command(flatten)]
    pub report: ReportArgs,

    /// Bucket width of the timeline (e.g. 30S, 5min, 1H).
    #[arg(long = "bin", value_name = "WIDTH", default_value = "30S")]
    pub bin: BucketWidth,

    /// How to print the protocol share summary.
    #[arg(long = "summary", value_enum, default_value = "table")]
    pub summary: SummaryArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ChartFormatArg {
    Html,
    Png,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SummaryArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
