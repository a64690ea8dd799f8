use std::path::{Path, PathBuf};

use crate::analyzer::ReportAnalyzer;
use crate::eda_statistics::DEFAULT_TOP_N;
use crate::models::GroupColumn;

pub const DEFAULT_INPUT: &str = "world-happiness-report-2021.csv";
pub const DEFAULT_BAR_CHART: &str = "average_by_continent.png";

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    /// Where the group average bar chart is written.
    pub bar_chart: PathBuf,
    /// Directory for the other charts; defaults to the bar chart's directory.
    pub chart_dir: Option<PathBuf>,
    pub group_by: GroupColumn,
    pub top_n: usize,
    pub render_charts: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            bar_chart: PathBuf::from(DEFAULT_BAR_CHART),
            chart_dir: None,
            group_by: GroupColumn::Region,
            top_n: DEFAULT_TOP_N,
            render_charts: true,
        }
    }
}

impl AnalysisConfig {
    pub fn chart_dir(&self) -> PathBuf {
        match &self.chart_dir {
            Some(dir) => dir.clone(),
            None => self
                .bar_chart
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn analyzer(&self) -> ReportAnalyzer {
        ReportAnalyzer::new().group_by(self.group_by).top_n(self.top_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.input, PathBuf::from("world-happiness-report-2021.csv"));
        assert_eq!(config.bar_chart, PathBuf::from("average_by_continent.png"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.chart_dir(), PathBuf::from("."));
        assert_eq!(config.analyzer().group_column(), GroupColumn::Region);
    }

    #[test]
    fn chart_dir_follows_bar_chart() {
        let config = AnalysisConfig {
            bar_chart: PathBuf::from("out/charts/bar.png"),
            ..Default::default()
        };
        assert_eq!(config.chart_dir(), PathBuf::from("out/charts"));

        let config = AnalysisConfig {
            chart_dir: Some(PathBuf::from("elsewhere")),
            ..config
        };
        assert_eq!(config.chart_dir(), PathBuf::from("elsewhere"));
    }
}
