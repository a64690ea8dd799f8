use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::continents::ContinentTable;
use crate::eda_statistics::{
    self, CorrelationMatrix, CorrelationResult, Description, DriverSeries, GroupStats, HistogramBins, RankedCountry,
    RankingResult, SummaryTable,
};
use crate::error::{ReportWarning, Result};
use crate::load_clean;
use crate::models::{Column, Dataset, GroupColumn};

/// Everything the console report and the charts need, computed once.
#[derive(Debug, Clone)]
pub struct HappinessReport {
    pub description: Option<Description>,
    pub ranking: RankingResult,
    pub highest: Option<RankedCountry>,
    pub lowest: Option<RankedCountry>,
    /// Highest score relative to the single lowest-scoring record. `None` when undefined.
    pub percent_difference: Option<f64>,
    pub group_means: GroupStats,
    pub group_std_devs: GroupStats,
    /// Ladder scores per group, the box plot's input.
    pub group_scores: BTreeMap<Option<String>, Vec<f64>>,
    pub correlations: CorrelationResult,
    pub correlation_matrix: Option<CorrelationMatrix>,
    pub drivers: (Column, Column),
    /// Scatter data for each driver, in `drivers` order.
    pub driver_series: Vec<DriverSeries>,
    pub score_histogram: Option<HistogramBins>,
    pub summary: SummaryTable,
    pub warnings: Vec<ReportWarning>,
}

/// Runs the load → group → rank → correlate → summarize pipeline.
#[derive(Debug, Clone)]
pub struct ReportAnalyzer {
    group_column: GroupColumn,
    top_n: usize,
    drivers: (Column, Column),
    continents: ContinentTable,
}

impl Default for ReportAnalyzer {
    fn default() -> Self {
        Self {
            group_column: GroupColumn::Region,
            top_n: eda_statistics::DEFAULT_TOP_N,
            drivers: (Column::LoggedGdpPerCapita, Column::SocialSupport),
            continents: ContinentTable::builtin(),
        }
    }
}

impl ReportAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_by(mut self, group_column: GroupColumn) -> Self {
        self.group_column = group_column;
        self
    }

    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    pub fn drivers(mut self, first: Column, second: Column) -> Self {
        self.drivers = (first, second);
        self
    }

    pub fn continents(mut self, table: ContinentTable) -> Self {
        self.continents = table;
        self
    }

    pub fn group_column(&self) -> GroupColumn {
        self.group_column
    }

    /// Load `path`, tagging continents only when grouping by continent.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let table = match self.group_column {
            GroupColumn::Continent => Some(&self.continents),
            GroupColumn::Region => None,
        };
        load_clean::load(path, table)
    }

    pub fn run(&self, path: impl AsRef<Path>) -> Result<HappinessReport> {
        let dataset = self.load(path)?;
        Ok(self.analyze(&dataset))
    }

    pub fn analyze(&self, dataset: &Dataset) -> HappinessReport {
        let score = Column::LadderScore;
        let mut warnings = Vec::new();

        let description = eda_statistics::describe(dataset, score);
        let ranked = eda_statistics::ranked(dataset, score);
        let ranking = eda_statistics::rank(dataset, score, self.top_n);
        let highest = ranked.first().cloned();
        let lowest = ranked.last().cloned();
        info!(scored = ranked.len(), top_n = self.top_n, "ranked countries");

        let percent_difference = match (&highest, &lowest) {
            (Some(high), Some(low)) => {
                let diff = eda_statistics::percent_difference(high.score, low.score);
                if diff.is_nan() {
                    warnings.push(ReportWarning::DivisionByZero {
                        high: high.score,
                        low: low.score,
                    });
                    None
                } else {
                    Some(diff)
                }
            }
            _ => None,
        };

        let group_means = eda_statistics::group_average(dataset, self.group_column, score, &self.continents);
        let group_std_devs = eda_statistics::group_std_dev(dataset, self.group_column, score, &self.continents);
        let group_scores = eda_statistics::partition(dataset, self.group_column, score, &self.continents);
        for (key, group) in &group_std_devs.groups {
            if group.value.is_nan() {
                warnings.push(ReportWarning::InsufficientData {
                    metric: format!("standard deviation of {}", eda_statistics::group_label(key)),
                    found: group.count,
                });
            }
        }
        info!(group_by = self.group_column.header(), groups = group_means.len(), "grouped scores");

        let mut indicators = Column::INDICATORS.to_vec();
        for driver in [self.drivers.0, self.drivers.1] {
            if !indicators.contains(&driver) {
                indicators.push(driver);
            }
        }
        let mut entries = Vec::with_capacity(indicators.len());
        for column in indicators {
            match eda_statistics::try_correlate(dataset, column, score) {
                Ok(r) => entries.push((column, Some(r))),
                Err(warning) => {
                    warnings.push(warning);
                    entries.push((column, None));
                }
            }
        }
        let correlations = CorrelationResult { target: score, entries };
        let correlation_matrix = eda_statistics::correlation_matrix(dataset, &Column::ALL);

        let (first, second) = self.drivers;
        let driver = eda_statistics::strongest_driver(
            (first, correlations.get(first)),
            (second, correlations.get(second)),
        );
        let summary = eda_statistics::build_summary(description.as_ref(), highest.as_ref(), lowest.as_ref(), driver);

        let driver_series = [first, second]
            .into_iter()
            .map(|column| eda_statistics::driver_series(dataset, column, score))
            .collect();
        let score_histogram = eda_statistics::histogram_bins(&dataset.values(score), eda_statistics::HISTOGRAM_BINS);

        for warning in &warnings {
            warn!(%warning, "metric undefined");
        }

        HappinessReport {
            description,
            ranking,
            highest,
            lowest,
            percent_difference,
            group_means,
            group_std_devs,
            group_scores,
            correlations,
            correlation_matrix,
            drivers: self.drivers,
            driver_series,
            score_histogram,
            summary,
            warnings,
        }
    }
}
