use std::io::Write;

use happiness_report::eda_statistics::{self, percent_difference};
use happiness_report::{report, Column, ContinentTable, GroupColumn, ReportAnalyzer, ReportError};
use tempfile::NamedTempFile;

const HEADER: &str = "Country name,Regional indicator,Ladder score,Logged GDP per capita,Social support,Healthy life expectancy,Freedom to make life choices";

fn fixture(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn five_countries() -> NamedTempFile {
    fixture(&[
        "A,Western Europe,7.8,10.8,0.95,72.0,0.95",
        "B,Western Europe,7.6,10.9,0.94,73.0,0.93",
        "C,Latin America,6.0,9.5,0.85,68.0,0.88",
        "D,South Asia,4.0,8.1,0.65,60.0,0.72",
        "E,South Asia,2.5,7.7,0.46,52.0,0.38",
    ])
}

#[test]
fn five_row_end_to_end() {
    let file = five_countries();
    let analyzer = ReportAnalyzer::new().top_n(2);
    let dataset = analyzer.load(file.path()).unwrap();
    let happiness = analyzer.analyze(&dataset);

    let top: Vec<(&str, f64)> = happiness.ranking.top.iter().map(|c| (c.country.as_str(), c.score)).collect();
    let bottom: Vec<(&str, f64)> = happiness.ranking.bottom.iter().map(|c| (c.country.as_str(), c.score)).collect();
    assert_eq!(top, [("A", 7.8), ("B", 7.6)]);
    assert_eq!(bottom, [("D", 4.0), ("E", 2.5)]);

    assert!((percent_difference(7.8, 2.5) - 212.0).abs() < 1e-9);
    assert!((happiness.percent_difference.unwrap() - 212.0).abs() < 1e-9);

    assert!((happiness.group_means.get("South Asia").unwrap() - 3.25).abs() < 1e-9);
    assert!(happiness.group_std_devs.get("Latin America").unwrap().is_nan());
    assert!(happiness.correlation_matrix.is_some());

    let text = report::render(&happiness);
    assert!(text.contains("Top 2 Happiest Countries:"));
    assert!(text.contains("Relative Percent Difference: 212.0%"));
}

#[test]
fn ranking_is_ordered_at_both_ends() {
    let file = five_countries();
    let dataset = ReportAnalyzer::new().load(file.path()).unwrap();
    let ranking = eda_statistics::rank(&dataset, Column::LadderScore, 5);
    let scores = dataset.values(Column::LadderScore);

    assert!(ranking.top.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(ranking.bottom.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(scores.iter().all(|&s| ranking.top[0].score >= s));
    assert!(scores.iter().all(|&s| ranking.bottom.last().unwrap().score <= s));
}

#[test]
fn continent_grouping_keeps_unmapped_countries() {
    let file = fixture(&[
        "Finland,Western Europe,7.8,10.8,0.95,72.0,0.95",
        "Denmark,Western Europe,7.6,10.9,0.94,73.0,0.93",
        "Atlantis,Nowhere,5.0,9.0,0.80,65.0,0.80",
    ]);
    let analyzer = ReportAnalyzer::new().group_by(GroupColumn::Continent);
    let happiness = analyzer.run(file.path()).unwrap();

    assert!((happiness.group_means.get("Europe").unwrap() - 7.7).abs() < 1e-9);
    assert_eq!(happiness.group_means.unknown(), Some(5.0));
    assert!(report::render(&happiness).contains(eda_statistics::UNKNOWN_GROUP));
}

#[test]
fn continent_grouping_after_region_load() {
    let file = fixture(&[
        "Finland,Western Europe,7.8,10.8,0.95,72.0,0.95",
        "Japan,East Asia,5.9,10.6,0.88,75.0,0.80",
    ]);
    // a region-grouping analyzer loads without tagging continents
    let dataset = ReportAnalyzer::new().load(file.path()).unwrap();
    assert!(dataset.records().iter().all(|r| r.continent.is_none()));

    let table = ContinentTable::builtin();
    let means = eda_statistics::group_average(&dataset, GroupColumn::Continent, Column::LadderScore, &table);
    assert_eq!(means.get("Europe"), Some(7.8));
    assert_eq!(means.get("Asia"), Some(5.9));

    let happiness = ReportAnalyzer::new().group_by(GroupColumn::Continent).analyze(&dataset);
    assert_eq!(happiness.group_means.get("Europe"), Some(7.8));
    assert_eq!(happiness.group_means.unknown(), None);
}

#[test]
fn region_named_unknown_stays_separate() {
    let file = fixture(&[
        "A,Unknown,6.0,10.0,0.9,70.0,0.9",
        "B,,2.0,8.0,0.5,55.0,0.5",
    ]);
    let happiness = ReportAnalyzer::new().run(file.path()).unwrap();

    assert_eq!(happiness.group_means.len(), 2);
    assert_eq!(happiness.group_means.get("Unknown"), Some(6.0));
    assert_eq!(happiness.group_means.unknown(), Some(2.0));

    let text = report::render(&happiness);
    assert!(text.contains("Unknown"));
    assert!(text.contains(eda_statistics::UNKNOWN_GROUP));
}

#[test]
fn rows_with_missing_score_are_excluded() {
    let file = fixture(&[
        "A,X,7.0,10.0,0.9,70.0,0.9",
        "B,X,,10.0,0.9,70.0,0.9",
        "C,X,5.0,9.0,0.8,60.0,0.8",
    ]);
    let dataset = ReportAnalyzer::new().load(file.path()).unwrap();
    assert_eq!(dataset.len(), 3);

    let description = eda_statistics::describe(&dataset, Column::LadderScore).unwrap();
    assert_eq!(description.count, 2);
    assert!((description.mean - 6.0).abs() < 1e-9);
}

#[test]
fn strongest_driver_reported_in_summary() {
    let file = five_countries();
    let dataset = ReportAnalyzer::new().load(file.path()).unwrap();
    let summary = eda_statistics::summarize(&dataset);

    let gdp = eda_statistics::correlate(&dataset, Column::LoggedGdpPerCapita, Column::LadderScore).unwrap();
    let social = eda_statistics::correlate(&dataset, Column::SocialSupport, Column::LadderScore).unwrap();
    let expected = if gdp >= social { "GDP per capita" } else { "Social support" };
    assert_eq!(summary.get("Strongest Correlation").unwrap().to_string(), expected);
}

#[test]
fn missing_column_names_the_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Country name,Regional indicator,Ladder score,Logged GDP per capita,Social support,Healthy life expectancy").unwrap();
    writeln!(file, "A,X,7.0,10.0,0.9,70.0").unwrap();
    file.flush().unwrap();

    let err = ReportAnalyzer::new().run(file.path()).unwrap_err();
    assert!(matches!(err, ReportError::MissingColumn { ref column, .. } if column == "Freedom to make life choices"));
    assert!(err.to_string().contains("Freedom to make life choices"));
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = ReportAnalyzer::new().run(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, ReportError::DataLoad { .. }));
    assert!(err.to_string().contains("absent.csv"));
}
