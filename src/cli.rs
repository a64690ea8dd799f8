//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{AnalysisConfig, DEFAULT_BAR_CHART, DEFAULT_INPUT};
use crate::models::GroupColumn;

/// Descriptive statistics and charts for the World Happiness Report
#[derive(Parser, Debug)]
#[command(name = "happiness-report", version)]
pub struct Cli {
    /// Survey CSV to analyse
    #[arg(value_name = "CSV", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Output path of the group average bar chart
    #[arg(short, long, value_name = "PNG", default_value = DEFAULT_BAR_CHART)]
    pub output: PathBuf,

    /// Directory for the remaining charts (defaults to the bar chart's directory)
    #[arg(long, value_name = "DIR")]
    pub chart_dir: Option<PathBuf>,

    /// Column used to group countries
    #[arg(short, long, value_enum, default_value = "region")]
    pub group_by: GroupBy,

    /// Print the report without rendering any charts
    #[arg(long)]
    pub no_charts: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    /// The survey's "Regional indicator"
    Region,
    /// Continent from the built-in country table
    Continent,
}

impl From<GroupBy> for GroupColumn {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::Region => GroupColumn::Region,
            GroupBy::Continent => GroupColumn::Continent,
        }
    }
}

impl Cli {
    pub fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            input: self.input.clone(),
            bar_chart: self.output.clone(),
            chart_dir: self.chart_dir.clone(),
            group_by: self.group_by.into(),
            render_charts: !self.no_charts,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_config() {
        let cli = Cli::parse_from(["happiness-report"]);
        assert_eq!(cli.config(), AnalysisConfig::default());
    }

    #[test]
    fn overrides() {
        let cli = Cli::parse_from([
            "happiness-report",
            "data/2021.csv",
            "-o",
            "out/bar.png",
            "--group-by",
            "continent",
            "--no-charts",
            "-vv",
        ]);
        let config = cli.config();
        assert_eq!(config.input, PathBuf::from("data/2021.csv"));
        assert_eq!(config.bar_chart, PathBuf::from("out/bar.png"));
        assert_eq!(config.group_by, GroupColumn::Continent);
        assert!(!config.render_charts);
        assert_eq!(cli.verbose, 2);
    }
}
