use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use tracing::{info, warn};

use crate::analyzer::HappinessReport;
use crate::config::AnalysisConfig;
use crate::eda_statistics::{group_label, value_range, CorrelationMatrix, DriverSeries, GroupStats, HistogramBins};
use crate::error::{ReportError, Result};
use crate::models::GroupColumn;

type DrawResult = std::result::Result<(), Box<dyn Error>>;

const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);
const POINT_COLOR: RGBAColor = RGBAColor(31, 119, 180, 0.6);

/// Render every chart for `report`, returning the written paths.
pub fn render_all(report: &HappinessReport, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let chart_dir = config.chart_dir();
    fs::create_dir_all(&chart_dir)?;
    if let Some(parent) = config.bar_chart.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut written = Vec::new();
    if report.group_means.is_empty() {
        warn!("no scored records, skipping charts");
        return Ok(written);
    }

    bar_chart(&report.group_means, &report.group_std_devs, &config.bar_chart)?;
    written.push(config.bar_chart.clone());

    let path = chart_dir.join("score_by_group_boxplot.png");
    box_plot(&report.group_scores, report.group_means.group_column, &path)?;
    written.push(path);

    if let Some(matrix) = &report.correlation_matrix {
        let path = chart_dir.join("correlation_heatmap.png");
        heatmap(matrix, &path)?;
        written.push(path);
    }

    for (series, color) in report.driver_series.iter().zip([POINT_COLOR, RGBAColor(44, 160, 44, 0.6)]) {
        let path = chart_dir.join(format!("{}_vs_score.png", slug(series.column.label())));
        scatter_plot(series, color, &path)?;
        written.push(path);
    }

    if let Some(bins) = &report.score_histogram {
        let path = chart_dir.join("score_histogram.png");
        histogram(bins, &path)?;
        written.push(path);
    }

    info!(charts = written.len(), dir = %chart_dir.display(), "charts saved");
    Ok(written)
}

fn slug(label: &str) -> String {
    label
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn group_title(group_column: GroupColumn) -> &'static str {
    match group_column {
        GroupColumn::Region => "Region",
        GroupColumn::Continent => "Continent",
    }
}

/// Average score per group, ascending, with one standard deviation error bars.
pub fn bar_chart(means: &GroupStats, std_devs: &GroupStats, path: &Path) -> Result<()> {
    draw_bar_chart(means, std_devs, path).map_err(|e| ReportError::chart(path, e))
}

fn draw_bar_chart(means: &GroupStats, std_devs: &GroupStats, path: &Path) -> DrawResult {
    let entries = means.sorted_entries(false);
    let labels: Vec<String> = entries.iter().map(|(key, _)| group_label(key).to_string()).collect();
    let spread = |key: &Option<String>| std_devs.groups.get(key).map(|g| g.value).filter(|v| !v.is_nan());

    let y_max = entries
        .iter()
        .map(|(key, g)| g.value + spread(*key).unwrap_or(0.0))
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = group_title(means.group_column);
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Average Happiness Score by {title}"), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..entries.len() as u32).into_segmented(), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(entries.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .x_desc(title)
        .y_desc("Average Ladder Score")
        .label_style(("sans-serif", 12))
        .axis_desc_style(("sans-serif", 18))
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(i, (_, g))| {
        let i = i as u32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), g.value)],
            BAR_COLOR.filled(),
        );
        bar.set_margin(0, 0, 8, 8);
        bar
    }))?;

    chart.draw_series(entries.iter().enumerate().filter_map(|(i, (key, g))| {
        let sd = spread(*key)?;
        Some(ErrorBar::new_vertical(
            SegmentValue::CenterOf(i as u32),
            g.value - sd,
            g.value,
            g.value + sd,
            BLACK.filled(),
            10,
        ))
    }))?;

    root.present()?;
    Ok(())
}

/// Distribution of ladder scores per group.
pub fn box_plot(groups: &BTreeMap<Option<String>, Vec<f64>>, group_column: GroupColumn, path: &Path) -> Result<()> {
    draw_box_plot(groups, group_column, path).map_err(|e| ReportError::chart(path, e))
}

fn draw_box_plot(groups: &BTreeMap<Option<String>, Vec<f64>>, group_column: GroupColumn, path: &Path) -> DrawResult {
    let labels: Vec<String> = groups.keys().map(|k| group_label(k).to_string()).collect();
    let (lo, hi) = value_range(groups.values().flatten().copied());

    let root = BitMapBackend::new(path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = group_title(group_column);
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Happiness Score Distribution by {title}"), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(260)
        .build_cartesian_2d(lo as f32 - 0.5..hi as f32 + 0.5, labels[..].into_segmented())?;

    chart
        .configure_mesh()
        .x_desc("Ladder Score")
        .y_desc(title)
        .light_line_style(WHITE)
        .label_style(("sans-serif", 12))
        .draw()?;

    chart.draw_series(groups.values().zip(labels.iter()).map(|(values, label)| {
        Boxplot::new_horizontal(SegmentValue::CenterOf(label), &Quartiles::new(values.as_slice()))
            .width(16)
            .whisker_width(0.5)
            .style(BLUE)
    }))?;

    root.present()?;
    Ok(())
}

/// Coefficient in [-1, 1] mapped onto a blue-white-red scale. NaN is grey.
pub fn heat_color(r: f64) -> RGBColor {
    if r.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let r = r.clamp(-1.0, 1.0);
    let (end, t) = if r >= 0.0 {
        ((180.0, 4.0, 38.0), r)
    } else {
        ((59.0, 76.0, 192.0), -r)
    };
    let mix = |c: f64| (255.0 + (c - 255.0) * t).round() as u8;
    RGBColor(mix(end.0), mix(end.1), mix(end.2))
}

/// Annotated correlation heatmap.
pub fn heatmap(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    draw_heatmap(matrix, path).map_err(|e| ReportError::chart(path, e))
}

fn draw_heatmap(matrix: &CorrelationMatrix, path: &Path) -> DrawResult {
    let n = matrix.columns.len() as u32;
    let label = |i: u32| {
        matrix
            .columns
            .get(i as usize)
            .map(|c| c.label().to_string())
            .unwrap_or_default()
    };

    let root = BitMapBackend::new(path, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Heatmap", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(140)
        .build_cartesian_2d((0u32..n).into_segmented(), (0u32..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n as usize)
        .y_labels(n as usize)
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => label(*i),
            _ => String::new(),
        })
        // row 0 is drawn at the top
        .y_label_formatter(&|y| match y {
            SegmentValue::CenterOf(i) if *i < n => label(n - 1 - *i),
            _ => String::new(),
        })
        .label_style(("sans-serif", 14))
        .draw()?;

    for ((i, j), &r) in matrix.values.indexed_iter() {
        let (x, y) = (j as u32, n - 1 - i as u32);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(SegmentValue::Exact(x), SegmentValue::Exact(y)), (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1))],
            heat_color(r).filled(),
        )))?;
        let text = if r.is_nan() { "n/a".to_string() } else { format!("{r:.2}") };
        chart.draw_series(std::iter::once(Text::new(
            text,
            (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
            ("sans-serif", 18).into_font(),
        )))?;
    }

    root.present()?;
    Ok(())
}

fn padded(lo: f64, hi: f64) -> std::ops::Range<f64> {
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
    lo - pad..hi + pad
}

/// Driver against the ladder score with its fitted regression line.
pub fn scatter_plot(series: &DriverSeries, color: RGBAColor, path: &Path) -> Result<()> {
    draw_scatter_plot(series, color, path).map_err(|e| ReportError::chart(path, e))
}

fn draw_scatter_plot(series: &DriverSeries, color: RGBAColor, path: &Path) -> DrawResult {
    let (xs, ys, x, y) = (&series.xs, &series.ys, series.column, series.target);
    let (x_lo, x_hi) = value_range(xs.iter().copied());
    let (y_lo, y_hi) = value_range(ys.iter().copied());

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} vs Happiness Score", x.label()), ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(padded(x_lo, x_hi), padded(y_lo, y_hi))?;

    chart
        .configure_mesh()
        .x_desc(x.header())
        .y_desc(y.header())
        .draw()?;

    chart.draw_series(
        xs.iter()
            .zip(ys.iter())
            .map(|(&xv, &yv)| Circle::new((xv, yv), 4, color.filled())),
    )?;

    if let Some((slope, intercept)) = series.fit {
        chart.draw_series(LineSeries::new(
            [x_lo, x_hi].map(|xv| (xv, slope * xv + intercept)),
            color.stroke_width(2),
        ))?;
    }

    root.present()?;
    Ok(())
}

/// Histogram of pre-binned ladder scores.
pub fn histogram(binned: &HistogramBins, path: &Path) -> Result<()> {
    draw_histogram(binned, path).map_err(|e| ReportError::chart(path, e))
}

fn draw_histogram(binned: &HistogramBins, path: &Path) -> DrawResult {
    let bins = binned.len();
    if bins == 0 {
        return Err("no values to plot".into());
    }
    let max_count = binned.counts.iter().copied().max().unwrap_or(0) as u32;

    let root = BitMapBackend::new(path, (1024, 640)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Happiness Scores", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d((0u32..bins as u32).into_segmented(), 0u32..max_count + 1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bins)
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => format!("{:.1}", binned.lower_edge(*i as usize)),
            _ => String::new(),
        })
        .x_desc("Happiness Score")
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(1)
            .data(binned.counts.iter().enumerate().map(|(i, &c)| (i as u32, c as u32))),
    )?;

    root.present()?;
    Ok(())
}
