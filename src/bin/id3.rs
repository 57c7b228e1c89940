use clap::Parser;
use id3_tree::experiment::params::{EvaluationParams, SplitMethod};
use id3_tree::experiment::run;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Builds an ID3 decision tree from an ARFF-like file and scores it on held-out rows.
#[derive(Parser, Debug)]
#[command(name = "id3", version, about)]
struct Cli {
    /// Path to the data file
    path: PathBuf,

    /// Fraction of rows used for training by the holdout split
    #[arg(long, default_value_t = 0.75)]
    train_size: f64,

    /// Evaluate with this many random folds instead of a holdout split
    #[arg(long)]
    folds: Option<usize>,

    /// Seed for dealing rows into folds
    #[arg(long)]
    seed: Option<u64>,

    /// Turn on debugging output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(filter.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Data files come in UTF-8 or ISO-8859-1; bytes that are not valid UTF-8 are read as Latin-1.
fn read_lines(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let bytes = fs::read(path)?;
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&byte| byte as char).collect(),
    };
    Ok(text.lines().map(str::to_string).collect())
}

fn execute(cli: &Cli) -> Result<String, Box<dyn Error>> {
    let mut params = EvaluationParams::new();
    params.set_train_size(cli.train_size)?;
    if let Some(folds) = cli.folds {
        params.set_method(SplitMethod::CrossFold { folds })?;
    }
    params.set_seed(cli.seed);

    let lines = read_lines(&cli.path)?;
    tracing::info!(path = %cli.path.display(), lines = lines.len(), "read data file");

    let report = run(&lines, &params)?;
    Ok(report.to_string())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    match execute(&cli) {
        Ok(report) => print!("{}", report),
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    }
}
