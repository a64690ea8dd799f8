use std::fmt;

use serde::Deserialize;

use crate::continents::{Continent, ContinentTable};

/// Headers that must be present in every input file.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Country name",
    "Regional indicator",
    "Ladder score",
    "Logged GDP per capita",
    "Social support",
    "Healthy life expectancy",
    "Freedom to make life choices",
];

/// One country row of the happiness survey.
///
/// Numeric fields that are empty or fail to parse come through as `None`
/// and are left out of every aggregate that reads them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HappinessRecord {
    #[serde(rename = "Country name")]
    pub country: String,

    #[serde(rename = "Regional indicator")]
    pub region: String,

    #[serde(rename = "Ladder score", deserialize_with = "csv::invalid_option")]
    pub ladder_score: Option<f64>,

    #[serde(rename = "Logged GDP per capita", deserialize_with = "csv::invalid_option")]
    pub logged_gdp_per_capita: Option<f64>,

    #[serde(rename = "Social support", deserialize_with = "csv::invalid_option")]
    pub social_support: Option<f64>,

    #[serde(rename = "Healthy life expectancy", deserialize_with = "csv::invalid_option")]
    pub healthy_life_expectancy: Option<f64>,

    #[serde(rename = "Freedom to make life choices", deserialize_with = "csv::invalid_option")]
    pub freedom: Option<f64>,

    /// Filled from a `ContinentTable` at load time.
    #[serde(skip)]
    pub continent: Option<Continent>,
}

impl HappinessRecord {
    /// Builds a record with only the fields the ranking and grouping code needs.
    pub fn new(country: impl Into<String>, region: impl Into<String>, ladder_score: f64) -> Self {
        Self {
            country: country.into(),
            region: region.into(),
            ladder_score: Some(ladder_score),
            logged_gdp_per_capita: None,
            social_support: None,
            healthy_life_expectancy: None,
            freedom: None,
            continent: None,
        }
    }
}

/// Numeric columns of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    LadderScore,
    LoggedGdpPerCapita,
    SocialSupport,
    HealthyLifeExpectancy,
    Freedom,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::LadderScore,
        Column::LoggedGdpPerCapita,
        Column::SocialSupport,
        Column::HealthyLifeExpectancy,
        Column::Freedom,
    ];

    /// The columns correlated against the ladder score.
    pub const INDICATORS: [Column; 4] = [
        Column::LoggedGdpPerCapita,
        Column::SocialSupport,
        Column::HealthyLifeExpectancy,
        Column::Freedom,
    ];

    /// Header name in the CSV file.
    pub fn header(self) -> &'static str {
        match self {
            Column::LadderScore => "Ladder score",
            Column::LoggedGdpPerCapita => "Logged GDP per capita",
            Column::SocialSupport => "Social support",
            Column::HealthyLifeExpectancy => "Healthy life expectancy",
            Column::Freedom => "Freedom to make life choices",
        }
    }

    /// Short name used in the report text and chart axes.
    pub fn label(self) -> &'static str {
        match self {
            Column::LadderScore => "Ladder score",
            Column::LoggedGdpPerCapita => "GDP per capita",
            Column::SocialSupport => "Social support",
            Column::HealthyLifeExpectancy => "Life expectancy",
            Column::Freedom => "Freedom",
        }
    }

    pub fn value(self, record: &HappinessRecord) -> Option<f64> {
        let value = match self {
            Column::LadderScore => record.ladder_score,
            Column::LoggedGdpPerCapita => record.logged_gdp_per_capita,
            Column::SocialSupport => record.social_support,
            Column::HealthyLifeExpectancy => record.healthy_life_expectancy,
            Column::Freedom => record.freedom,
        };
        value.filter(|v| !v.is_nan())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Column used to partition records for group statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupColumn {
    #[default]
    Region,
    Continent,
}

impl GroupColumn {
    pub fn header(self) -> &'static str {
        match self {
            GroupColumn::Region => "Regional indicator",
            GroupColumn::Continent => "Continent",
        }
    }

    /// Group key of a record; `None` when the record has no label for this column.
    ///
    /// A continent tagged at load time wins, otherwise `continents` is consulted.
    pub fn key(self, record: &HappinessRecord, continents: &ContinentTable) -> Option<String> {
        match self {
            GroupColumn::Region => {
                let region = record.region.trim();
                (!region.is_empty()).then(|| region.to_string())
            }
            GroupColumn::Continent => record
                .continent
                .or_else(|| continents.lookup(&record.country))
                .map(|c| c.name().to_string()),
        }
    }
}

/// Records in file order. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<HappinessRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<HappinessRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HappinessRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-null values of `column` in row order.
    pub fn values(&self, column: Column) -> Vec<f64> {
        self.records.iter().filter_map(|r| column.value(r)).collect()
    }

    /// Pairs of `(a, b)` for rows where both columns are present.
    pub fn paired_values(&self, a: Column, b: Column) -> (Vec<f64>, Vec<f64>) {
        self.records
            .iter()
            .filter_map(|r| Some((a.value(r)?, b.value(r)?)))
            .unzip()
    }
}
