use std::path::PathBuf;

use clap::Parser;
use day_12::part2::process;
use miette::{Context, IntoDiagnostic};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[derive(Debug, Parser)]
#[command(about = "Day 12 part 2: price the fencing of a garden map")]
struct Args {
    /// Garden map, one row of plots per line
    #[arg(default_value = "input2.txt")]
    input: PathBuf,
}

#[tracing::instrument]
fn main() -> miette::Result<()> {
    init();

    let args = Args::parse();
    let file = std::fs::read_to_string(&args.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("read {}", args.input.display()))?;
    let result = process(&file).context("process part 2")?;
    println!("{}", result);
    Ok(())
}

fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("day_12=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::NONE)
        .try_init();
}
