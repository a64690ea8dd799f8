//! Console rendering of a [`HappinessReport`].

use std::fmt::{self, Write};

use crate::analyzer::HappinessReport;
use crate::eda_statistics::{group_label, RankedCountry};
use crate::models::GroupColumn;

fn fmt_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{v:.decimals$}"),
        _ => "undefined".to_string(),
    }
}

fn write_countries(out: &mut String, countries: &[RankedCountry]) -> fmt::Result {
    let width = countries.iter().map(|c| c.country.len()).max().unwrap_or(0);
    for c in countries {
        writeln!(out, "  {:<width$}  {:.3}", c.country, c.score)?;
    }
    Ok(())
}

/// Labeled metric lines followed by the interpretive summary.
pub fn render(report: &HappinessReport) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &HappinessReport) -> fmt::Result {
    let mean = report.description.map(|d| d.mean);
    let median = report.description.map(|d| d.median);
    let group_name = match report.group_means.group_column {
        GroupColumn::Region => "Region",
        GroupColumn::Continent => "Continent",
    };

    writeln!(out, "### 1. Overall Happiness Scores ###")?;
    writeln!(out, "Mean Happiness Score: {}", fmt_value(mean, 2))?;
    writeln!(out, "Median Happiness Score: {}", fmt_value(median, 2))?;

    writeln!(out, "\n### 2. Country Rankings ###")?;
    writeln!(out, "Top {} Happiest Countries:", report.ranking.top.len())?;
    write_countries(out, &report.ranking.top)?;
    writeln!(out, "Bottom {} Least Happy Countries:", report.ranking.bottom.len())?;
    write_countries(out, &report.ranking.bottom)?;

    writeln!(out, "\n### 3. Score Disparity ###")?;
    writeln!(
        out,
        "Relative Percent Difference: {}%",
        fmt_value(report.percent_difference, 1)
    )?;
    if let (Some(high), Some(low), Some(diff)) = (&report.highest, &report.lowest, report.percent_difference) {
        writeln!(
            out,
            "Interpretation: The top-ranked country ({}) has a happiness score {:.0}% higher than \
             the lowest-ranked country ({}), showing vast inequality in well-being globally.",
            high.country, diff, low.country
        )?;
    }

    writeln!(out, "\n### 4. Average Happiness Score by {group_name} ###")?;
    let sorted = report.group_means.sorted_entries(true);
    let width = sorted.iter().map(|(key, _)| group_label(key).len()).max().unwrap_or(0);
    for &(key, group) in &sorted {
        let std_dev = report.group_std_devs.groups.get(key).map(|g| g.value);
        writeln!(
            out,
            "  {:<width$}  {}  (sd {}, n={})",
            group_label(key),
            fmt_value(Some(group.value), 2),
            fmt_value(std_dev, 2),
            group.count
        )?;
    }

    writeln!(out, "\n### 5. Correlation Analysis ###")?;
    for (column, r) in &report.correlations.entries {
        writeln!(out, "Correlation with {}: {}", column.label(), fmt_value(*r, 3))?;
    }

    writeln!(out, "\n### 6. Key Insights ###")?;
    let width = report.summary.rows.iter().map(|r| r.metric.len()).max().unwrap_or(0);
    for row in &report.summary.rows {
        writeln!(out, "  {:<width$}  {}", row.metric, row.value)?;
    }

    writeln!(out, "\n### 7. Summary ###")?;
    writeln!(
        out,
        "1. Overall global happiness lies around {} (mean) and {} (median).",
        fmt_value(mean, 2),
        fmt_value(median, 2)
    )?;
    if let Some(top) = &report.highest {
        writeln!(out, "2. {} tops the rankings with a ladder score of {}.", top.country, top.score)?;
    }
    writeln!(
        out,
        "3. The gap between the happiest and least happy countries is {}%.",
        fmt_value(report.percent_difference, 1)
    )?;
    let defined: Vec<_> = sorted.iter().filter(|(_, g)| !g.value.is_nan()).collect();
    if let (Some((best, best_group)), Some((worst, worst_group))) = (defined.first(), defined.last()) {
        writeln!(
            out,
            "4. {group_name} differences are visible: {} averages {:.2} while {} averages {:.2}.",
            group_label(best),
            best_group.value,
            group_label(worst),
            worst_group.value
        )?;
    }
    let (first, second) = report.drivers;
    writeln!(
        out,
        "5. Correlations: {} ({}) and {} ({}).",
        first.label(),
        fmt_value(report.correlations.get(first), 3),
        second.label(),
        fmt_value(report.correlations.get(second), 3)
    )?;
    if let Some(driver) = report.summary.get("Strongest Correlation") {
        writeln!(out, "6. Insight: the strongest driver of happiness in this data is {driver}.")?;
    }

    if !report.warnings.is_empty() {
        writeln!(out, "\nWarnings:")?;
        for warning in &report.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }
    Ok(())
}
