use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info};

use crate::continents::ContinentTable;
use crate::error::{ReportError, Result};
use crate::models::{Dataset, HappinessRecord, REQUIRED_COLUMNS};

/// Load the survey CSV at `path`.
///
/// Every header in `REQUIRED_COLUMNS` must be present. When `continents` is
/// given each record is tagged with its continent, unmapped countries stay `None`.
pub fn load(path: impl AsRef<Path>, continents: Option<&ContinentTable>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ReportError::DataLoad {
        path: path.to_path_buf(),
        source: e.into(),
    })?;

    let dataset = load_from_reader(file, path, continents)?;
    info!(path = %path.display(), records = dataset.len(), "loaded dataset");
    Ok(dataset)
}

pub(crate) fn load_from_reader<R: Read>(
    reader: R,
    path: &Path,
    continents: Option<&ContinentTable>,
) -> Result<Dataset> {
    let data_load = |source: csv::Error| ReportError::DataLoad {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(data_load)?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|&&required| !headers.iter().any(|h| h == required))
    {
        return Err(ReportError::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let mut record: HappinessRecord = result.map_err(data_load)?;
        if let Some(table) = continents {
            record.continent = table.lookup(&record.country);
            if record.continent.is_none() {
                debug!(country = %record.country, "no continent mapping");
            }
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(ReportError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }

    Ok(Dataset::from_records(records))
}
