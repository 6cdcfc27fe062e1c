use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::path::PathBuf;

use xlsxcsv::{ConversionReport, ConverterBuilder, DateFormat, ErrorPolicy, LineTerminator};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the .xlsx / .xlsm workbooks (sub-directories are ignored)
    #[arg(required = true)]
    source_dir: PathBuf,

    /// Directory the CSV files are written to, created if missing
    #[arg(required = true)]
    destination_dir: PathBuf,

    /// Remove the destination directory's contents before writing
    #[arg(long, short = 'o')]
    overwrite: bool,

    /// Skip workbooks that cannot be parsed instead of aborting the run
    #[arg(long, short = 'k')]
    continue_on_error: bool,

    /// Field delimiter (single ASCII character)
    #[arg(long, short = 'd', default_value_t = ',')]
    delimiter: char,

    /// Terminate records with LF instead of CRLF
    #[arg(long)]
    lf: bool,

    /// strftime-style format for date cells (default: %Y-%m-%d %H:%M:%S)
    #[arg(long)]
    date_format: Option<String>,

    /// Print the conversion report as JSON to stdout
    #[arg(long, short = 'j')]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !cli.delimiter.is_ascii() {
        anyhow::bail!("Delimiter must be a single ASCII character: {:?}", cli.delimiter);
    }

    let mut builder = ConverterBuilder::new()
        .overwrite_destination(cli.overwrite)
        .with_delimiter(cli.delimiter as u8);
    if cli.continue_on_error {
        builder = builder.with_error_policy(ErrorPolicy::Continue);
    }
    if cli.lf {
        builder = builder.with_line_terminator(LineTerminator::Lf);
    }
    if let Some(format_str) = cli.date_format {
        builder = builder.with_date_format(DateFormat::Custom(format_str));
    }
    let converter = builder.build()?;

    let report = converter
        .convert(&cli.source_dir, &cli.destination_dir)
        .with_context(|| {
            format!(
                "Failed to convert \"{}\" into \"{}\"",
                cli.source_dir.display(),
                cli.destination_dir.display()
            )
        })?;

    if cli.json {
        let json_string =
            serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")?;
        println!("{}", json_string);
    }

    print_failures(&report);
    if !report.is_complete() {
        std::process::exit(2);
    }

    Ok(())
}

fn print_failures(report: &ConversionReport) {
    for failure in &report.failures {
        eprintln!(
            "Skipped \"{}\": {}",
            failure.source_path.display(),
            failure.error
        );
    }
}
