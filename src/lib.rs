//! Descriptive statistics over the World Happiness Report survey.
//!
//! The pipeline loads the CSV once, tags an optional continent, then groups,
//! ranks and correlates the ladder score. Results are plain structures that
//! the console report and the chart renderers consume.

pub mod analyzer;
pub mod charts;
pub mod cli;
pub mod config;
pub mod continents;
pub mod eda_statistics;
pub mod error;
pub mod load_clean;
pub mod logging;
pub mod models;
pub mod report;

pub use analyzer::{HappinessReport, ReportAnalyzer};
pub use config::AnalysisConfig;
pub use continents::{Continent, ContinentTable};
pub use error::{ReportError, ReportWarning, Result};
pub use models::{Column, Dataset, GroupColumn, HappinessRecord};
