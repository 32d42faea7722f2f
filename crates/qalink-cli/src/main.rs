use clap::Parser;
use qalink_core::BenchConfig;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

mod tracing_setup;

/// Times answer-to-question traversal through an ordered index, a hash index and cached
/// references.
#[derive(Parser, Debug)]
#[command(name = "qalink")]
#[command(version, about)]
struct Cli {
    /// Directory holding questions.csv, answers.csv, tags.csv and tag_questions.csv
    /// (defaults to the current directory)
    data_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_setup::init_tracing(&tracing_setup::LoggingConfig::from_environment())?;

    let config = BenchConfig::from_environment().with_data_dir(cli.data_dir);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = ?config.data_dir,
        iterations = config.iterations,
        format = %config.report_format,
        "Starting qalink"
    );

    let report = qalink_core::run(&config);
    if !report.aggregates_agree() {
        tracing::warn!("Strategies produced different aggregates");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report.render(config.report_format, &mut out)?;
    out.flush()?;
    Ok(())
}
