//! Network log charts CLI.

use clap::{ColorChoice, Parser};
use netlog_cli::commands::{ReportOptions, run_all, run_protocol_share, run_timeline};
use netlog_cli::logging::{LogConfig, LogFormat, init_logging};
use netlog_cli::summary::SummaryFormat;
use netlog_report::ImageFormat;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{ChartFormatArg, Cli, Command, LogFormatArg, LogLevelArg, ReportArgs, SummaryArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::ProtocolShare(args) => {
            let mut options = report_options(&args.report);
            options.summary = summary_format(args.summary);
            match run_protocol_share(&options) {
                Ok(_) => 0,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
        Command::Timeline(args) => match run_timeline(&report_options(&args.report), &args.bin) {
            Ok(_) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::All(args) => {
            let mut options = report_options(&args.report);
            options.summary = summary_format(args.summary);
            if run_all(&options, &args.bin) == 0 { 0 } else { 1 }
        }
    };
    std::process::exit(exit_code);
}

fn report_options(args: &ReportArgs) -> ReportOptions {
    let mut options = ReportOptions::new(&args.csv_dir, &args.output_dir);
    if let Some(format) = args.format {
        options.format = match format {
            ChartFormatArg::Html => ImageFormat::Html,
            ChartFormatArg::Png => ImageFormat::Png,
        };
    }
    options.show = args.show;
    options
}

fn summary_format(arg: SummaryArg) -> SummaryFormat {
    match arg {
        SummaryArg::Table => SummaryFormat::Table,
        SummaryArg::Json => SummaryFormat::Json,
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
