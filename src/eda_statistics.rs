use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use ndarray::Array2;
use ndarray_stats::CorrelationExt;
use ordered_float::OrderedFloat;
use statrs::statistics::{Data, Median, Statistics};
use tracing::debug;

use crate::continents::ContinentTable;
use crate::error::ReportWarning;
use crate::models::{Column, Dataset, GroupColumn};

/// Number of countries shown at each end of the ranking.
pub const DEFAULT_TOP_N: usize = 5;

/// Label for records that have no value in the grouping column. Parenthesised
/// so it never reads like a real region or continent name.
pub const UNKNOWN_GROUP: &str = "(no group)";

/// Bins used for the ladder score histogram.
pub const HISTOGRAM_BINS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation, NaN with fewer than two values.
    pub std_dev: f64,
}

/// Mean, median and spread of the non-null values in `column`.
///
/// Returns `None` when the column has no values at all.
pub fn describe(dataset: &Dataset, column: Column) -> Option<Description> {
    let values = dataset.values(column);
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().mean();
    let std_dev = values.iter().std_dev();
    let median = Data::new(values.clone()).median();

    Some(Description {
        count: values.len(),
        mean,
        median,
        min,
        max,
        std_dev,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCountry {
    pub country: String,
    pub score: f64,
}

impl fmt::Display for RankedCountry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.country, self.score)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingResult {
    pub column: Column,
    /// Highest first.
    pub top: Vec<RankedCountry>,
    /// Tail of the descending order, so the lowest record comes last.
    pub bottom: Vec<RankedCountry>,
}

/// All records with a value in `column`, highest first. Ties keep file order.
pub fn ranked(dataset: &Dataset, column: Column) -> Vec<RankedCountry> {
    let mut ranked: Vec<RankedCountry> = dataset
        .records()
        .iter()
        .filter_map(|r| {
            Some(RankedCountry {
                country: r.country.clone(),
                score: column.value(r)?,
            })
        })
        .collect();
    // sort_by_key is stable
    ranked.sort_by_key(|c| Reverse(OrderedFloat(c.score)));
    ranked
}

/// Top and bottom `n` countries by `column`. `n` is clamped to the number of ranked records.
pub fn rank(dataset: &Dataset, column: Column, n: usize) -> RankingResult {
    let ranked = ranked(dataset, column);
    let n = n.min(ranked.len());

    RankingResult {
        column,
        top: ranked[..n].to_vec(),
        bottom: ranked[ranked.len() - n..].to_vec(),
    }
}

/// `(high - low) / low * 100`.
///
/// NaN when `low` is zero; the caller decides how to report it.
pub fn percent_difference(high: f64, low: f64) -> f64 {
    if low == 0.0 {
        return f64::NAN;
    }
    (high - low) / low * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupValue {
    pub count: usize,
    pub value: f64,
}

/// One aggregate of `value_column` per group. The `None` key holds records
/// without a group label.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStats {
    pub group_column: GroupColumn,
    pub value_column: Column,
    pub groups: BTreeMap<Option<String>, GroupValue>,
}

pub fn group_label(key: &Option<String>) -> &str {
    key.as_deref().unwrap_or(UNKNOWN_GROUP)
}

impl GroupStats {
    pub fn get(&self, group: &str) -> Option<f64> {
        self.groups.get(&Some(group.to_string())).map(|g| g.value)
    }

    /// Aggregate for records with no group label.
    pub fn unknown(&self) -> Option<f64> {
        self.groups.get(&None).map(|g| g.value)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups ordered by value; NaN entries always go last.
    pub fn sorted_entries(&self, descending: bool) -> Vec<(&Option<String>, &GroupValue)> {
        let (mut defined, undefined): (Vec<_>, Vec<_>) =
            self.groups.iter().partition(|(_, g)| !g.value.is_nan());

        defined.sort_by_key(|(_, g)| OrderedFloat(g.value));
        if descending {
            defined.reverse();
        }
        defined.extend(undefined);
        defined
    }

    /// `(label, value)` pairs in the order of [`GroupStats::sorted_entries`].
    pub fn sorted_by_value(&self, descending: bool) -> Vec<(&str, f64)> {
        self.sorted_entries(descending)
            .into_iter()
            .map(|(key, g)| (group_label(key), g.value))
            .collect()
    }
}

/// Values of `value_column` partitioned by `group_column`. Each partition is
/// built independently. `continents` resolves the continent of untagged records.
pub fn partition(
    dataset: &Dataset,
    group_column: GroupColumn,
    value_column: Column,
    continents: &ContinentTable,
) -> BTreeMap<Option<String>, Vec<f64>> {
    dataset
        .records()
        .iter()
        .filter_map(|r| Some((group_column.key(r, continents), value_column.value(r)?)))
        .into_group_map()
        .into_iter()
        .collect()
}

fn aggregate_groups(
    dataset: &Dataset,
    group_column: GroupColumn,
    value_column: Column,
    continents: &ContinentTable,
    aggregate: impl Fn(&[f64]) -> f64,
) -> GroupStats {
    let groups = partition(dataset, group_column, value_column, continents)
        .into_iter()
        .map(|(key, values)| {
            let value = aggregate(&values);
            debug!(group = group_label(&key), count = values.len(), value, "group aggregate");
            (
                key,
                GroupValue {
                    count: values.len(),
                    value,
                },
            )
        })
        .collect();

    GroupStats {
        group_column,
        value_column,
        groups,
    }
}

/// Mean of `value_column` within each group.
pub fn group_average(
    dataset: &Dataset,
    group_column: GroupColumn,
    value_column: Column,
    continents: &ContinentTable,
) -> GroupStats {
    aggregate_groups(dataset, group_column, value_column, continents, |values| values.iter().mean())
}

/// Sample (N-1) standard deviation of `value_column` within each group.
/// Single-member groups are NaN.
pub fn group_std_dev(
    dataset: &Dataset,
    group_column: GroupColumn,
    value_column: Column,
    continents: &ContinentTable,
) -> GroupStats {
    aggregate_groups(dataset, group_column, value_column, continents, |values| values.iter().std_dev())
}

/// Pearson coefficient of two equal-length series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let x_mean = xs.iter().mean();
    let y_mean = ys.iter().mean();

    let numerator: f64 = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| (x - x_mean) * (y - y_mean))
        .sum();
    let x_variance: f64 = xs.iter().map(|&x| (x - x_mean).powi(2)).sum();
    let y_variance: f64 = ys.iter().map(|&y| (y - y_mean).powi(2)).sum();

    let denominator = (x_variance * y_variance).sqrt();
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Like [`correlate`], but says why the coefficient is undefined.
pub fn try_correlate(dataset: &Dataset, a: Column, b: Column) -> Result<f64, ReportWarning> {
    let metric = || format!("correlation of {} with {}", a.label(), b.label());
    let (xs, ys) = dataset.paired_values(a, b);
    if xs.len() < 2 {
        return Err(ReportWarning::InsufficientData {
            metric: metric(),
            found: xs.len(),
        });
    }
    pearson(&xs, &ys).ok_or_else(|| ReportWarning::ZeroVariance { metric: metric() })
}

/// Pearson correlation over the rows where both columns are present.
pub fn correlate(dataset: &Dataset, a: Column, b: Column) -> Option<f64> {
    try_correlate(dataset, a, b).ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationResult {
    pub target: Column,
    pub entries: Vec<(Column, Option<f64>)>,
}

impl CorrelationResult {
    pub fn get(&self, column: Column) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .and_then(|(_, r)| *r)
    }
}

/// Correlation of each indicator with `target`.
pub fn correlations(dataset: &Dataset, target: Column, indicators: &[Column]) -> CorrelationResult {
    CorrelationResult {
        target,
        entries: indicators
            .iter()
            .map(|&c| (c, correlate(dataset, c, target)))
            .collect(),
    }
}

/// Square matrix of pairwise coefficients, row/column order following `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<Column>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Column, b: Column) -> Option<f64> {
        let i = self.columns.iter().position(|&c| c == a)?;
        let j = self.columns.iter().position(|&c| c == b)?;
        Some(self.values[(i, j)])
    }
}

/// Correlation matrix over the rows where every one of `columns` is present.
/// Zero-variance columns give NaN cells.
pub fn correlation_matrix(dataset: &Dataset, columns: &[Column]) -> Option<CorrelationMatrix> {
    let complete: Vec<Vec<f64>> = dataset
        .records()
        .iter()
        .filter_map(|r| columns.iter().map(|c| c.value(r)).collect::<Option<Vec<_>>>())
        .collect();
    if complete.is_empty() || columns.is_empty() {
        return None;
    }

    // one row per variable, one column per observation
    let n_obs = complete.len();
    let flat: Vec<f64> = (0..columns.len())
        .flat_map(|var| complete.iter().map(move |row| row[var]))
        .collect();
    let observations = Array2::from_shape_vec((columns.len(), n_obs), flat).ok()?;
    let values = observations.pearson_correlation().ok()?;

    Some(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

/// Least-squares `(slope, intercept)` of `ys` on `xs`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let x_mean = xs.iter().mean();
    let y_mean = ys.iter().mean();
    let sxy: f64 = xs.iter().zip(ys).map(|(&x, &y)| (x - x_mean) * (y - y_mean)).sum();
    let sxx: f64 = xs.iter().map(|&x| (x - x_mean).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope, y_mean - slope * x_mean))
}

/// One indicator paired with the ladder score, ready for a scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSeries {
    pub column: Column,
    pub target: Column,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// `(slope, intercept)` of `ys` on `xs`; `None` when `xs` has no spread.
    pub fit: Option<(f64, f64)>,
}

pub fn driver_series(dataset: &Dataset, column: Column, target: Column) -> DriverSeries {
    let (xs, ys) = dataset.paired_values(column, target);
    let fit = linear_fit(&xs, &ys);
    DriverSeries {
        column,
        target,
        xs,
        ys,
        fit,
    }
}

/// `(min, max)` of `values`, or `(0, 1)` when there are none.
pub(crate) fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}

/// Equal-width histogram counts.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    pub start: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

impl HistogramBins {
    pub fn lower_edge(&self, bin: usize) -> f64 {
        self.start + self.width * bin as f64
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Splits `values` into `bins` equal-width buckets; the maximum lands in the last one.
pub fn histogram_bins(values: &[f64], bins: usize) -> Option<HistogramBins> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let (lo, hi) = value_range(values.iter().copied());
    let (start, width) = if hi > lo {
        (lo, (hi - lo) / bins as f64)
    } else {
        (lo - 0.5, 1.0 / bins as f64)
    };

    let mut counts = vec![0; bins];
    for &v in values {
        let bin = (((v - start) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }
    Some(HistogramBins { start, width, counts })
}

/// Pick the indicator with the larger coefficient. The first wins a tie, and
/// an undefined coefficient loses to a defined one.
pub fn strongest_driver(first: (Column, Option<f64>), second: (Column, Option<f64>)) -> Option<Column> {
    match (first.1, second.1) {
        (Some(a), Some(b)) => Some(if a >= b { first.0 } else { second.0 }),
        (Some(_), None) => Some(first.0),
        (None, Some(_)) => Some(second.0),
        (None, None) => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryValue {
    Score(Option<f64>),
    Country(Option<RankedCountry>),
    Driver(Option<Column>),
}

impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryValue::Score(Some(v)) => write!(f, "{v:.2}"),
            SummaryValue::Country(Some(c)) => write!(f, "{c}"),
            SummaryValue::Driver(Some(c)) => write!(f, "{}", c.label()),
            _ => f.write_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub metric: &'static str,
    pub value: SummaryValue,
}

/// Fixed-order key insights of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn get(&self, metric: &str) -> Option<&SummaryValue> {
        self.rows.iter().find(|r| r.metric == metric).map(|r| &r.value)
    }
}

/// Summary with GDP per capita and social support as the competing drivers.
pub fn summarize(dataset: &Dataset) -> SummaryTable {
    summarize_with(dataset, Column::LoggedGdpPerCapita, Column::SocialSupport)
}

pub fn summarize_with(dataset: &Dataset, first_driver: Column, second_driver: Column) -> SummaryTable {
    let score = Column::LadderScore;
    let description = describe(dataset, score);
    let ranking = ranked(dataset, score);
    let driver = strongest_driver(
        (first_driver, correlate(dataset, first_driver, score)),
        (second_driver, correlate(dataset, second_driver, score)),
    );

    build_summary(description.as_ref(), ranking.first(), ranking.last(), driver)
}

pub(crate) fn build_summary(
    description: Option<&Description>,
    top: Option<&RankedCountry>,
    bottom: Option<&RankedCountry>,
    driver: Option<Column>,
) -> SummaryTable {
    let rows = vec![
        SummaryRow {
            metric: "Mean Score",
            value: SummaryValue::Score(description.map(|d| d.mean)),
        },
        SummaryRow {
            metric: "Median Score",
            value: SummaryValue::Score(description.map(|d| d.median)),
        },
        SummaryRow {
            metric: "Top Country",
            value: SummaryValue::Country(top.cloned()),
        },
        SummaryRow {
            metric: "Bottom Country",
            value: SummaryValue::Country(bottom.cloned()),
        },
        SummaryRow {
            metric: "Strongest Correlation",
            value: SummaryValue::Driver(driver),
        },
    ];
    SummaryTable { rows }
}
