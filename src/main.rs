use std::process;

use clap::Parser;
use tracing::info;

use happiness_report::cli::Cli;
use happiness_report::{charts, report, AnalysisConfig, Result};

fn run(config: &AnalysisConfig) -> Result<()> {
    let analyzer = config.analyzer();
    let happiness = analyzer.run(&config.input)?;

    println!("{}", report::render(&happiness));

    if config.render_charts {
        let written = charts::render_all(&happiness, config)?;
        println!("Bar chart saved to: {}", config.bar_chart.display());
        info!(charts = ?written, "rendering complete");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = happiness_report::logging::init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let config = cli.config();
    info!(input = %config.input.display(), group_by = config.group_by.header(), "starting analysis");

    if let Err(e) = run(&config) {
        eprintln!("Error: {e}");
        process::exit(e.exit_code());
    }
}
