use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use log::error;

use onecrl2csv::config::Config;
use onecrl2csv::{remote, stream_file, write_csv, OutputOptions};

/// Dump Mozilla's OneCRL certificate blocklist as CSV
#[derive(Parser)]
#[command(name = "onecrl2csv", version, about)]
struct Cli {
    /// The URL of the blocklist record data
    #[arg(long)]
    url: Option<String>,

    /// revocations.txt to load entries from (takes precedence over --url)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Render hex serial values in upper case
    #[arg(long)]
    upper: bool,

    /// Separate the serial number bytes with colons
    #[arg(long)]
    separate: bool,

    /// Treat remote fetch or decode failures as fatal instead of emitting zero records
    #[arg(long)]
    strict: bool,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print an example configuration file and exit
    #[arg(long)]
    example_config: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.example_config {
        println!("{}", Config::example_toml());
        exit(0);
    }

    let mut config = Config::default();
    match Config::load(cli.config.as_deref()) {
        Ok(file_config) => config = config.merge_with(file_config),
        Err(err) => {
            error!("failed to load configuration: {}", err);
            exit(1);
        }
    }
    config = config.merge_with(Config::from_cli_args(
        cli.url,
        cli.file.map(|p| p.display().to_string()),
        cli.upper.then_some(true),
        cli.separate.then_some(true),
        cli.strict.then_some(true),
    ));

    let options = OutputOptions {
        separate: config.separate.unwrap_or(false),
        upper: config.upper.unwrap_or(false),
    };
    let strict = config.strict.unwrap_or(false);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // If no file is specified, fall back to loading from the URL
    match config.file.as_deref().filter(|f| !f.is_empty()) {
        Some(path) => {
            // rows stream out as the scanner reaches them; a fatal format
            // error mid-file leaves the earlier rows written
            if let Err(err) = stream_file(path, &options, &mut out) {
                error!("{}", err);
                exit(1);
            }
        }
        None => {
            let url = config.url.as_deref().unwrap_or(remote::DEFAULT_URL);
            let records = match remote::records_or_empty(remote::fetch_records(url), strict) {
                Ok(records) => records,
                Err(err) => {
                    error!("{}", err);
                    exit(1);
                }
            };
            if let Err(err) = write_csv(&records, &options, &mut out) {
                error!("{}", err);
                exit(1);
            }
        }
    }
}
