//! CSV dataset loading.
//!
//! The first row is a header. One column holds the sample text; one or more
//! label columns hold label names, and several non-empty label cells make a
//! multi-label sample. Rows without any label are skipped with a warning.

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::{LabeledDataset, LabeledRecord, LoadError};
use crate::config::CsvLayout;

/// Load a CSV file.
pub fn load_csv(path: &Path, layout: &CsvLayout) -> Result<LabeledDataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|error| LoadError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    let dataset = read_csv(file, path, layout, &name)?;
    info!(
        path = %path.display(),
        samples = dataset.len(),
        labels = dataset.vocabulary().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Parse CSV from any reader; `path` is used in errors only.
pub fn read_csv<R: Read>(
    reader: R,
    path: &Path,
    layout: &CsvLayout,
    name: &str,
) -> Result<LabeledDataset, LoadError> {
    let csv_err = |error: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        error,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
    };

    let text_idx = match &layout.text_column {
        Some(name) => column(name)?,
        None => 0,
    };
    let label_idx: Vec<usize> = if layout.label_columns.is_empty() {
        (text_idx + 1..headers.len()).collect()
    } else {
        layout
            .label_columns
            .iter()
            .map(|name| column(name))
            .collect::<Result<_, _>>()?
    };
    if label_idx.is_empty() {
        return Err(LoadError::TooFewColumns {
            path: path.to_path_buf(),
            columns: headers.len(),
        });
    }

    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let text = record.get(text_idx).unwrap_or("").to_string();
        let labels: Vec<&str> = label_idx
            .iter()
            .filter_map(|&i| record.get(i))
            .filter(|cell| !cell.is_empty())
            .collect();
        if labels.is_empty() {
            // header is line 1
            warn!(path = %path.display(), line = row + 2, "row has no labels, skipping");
            continue;
        }
        records.push(LabeledRecord::new(text, labels));
    }

    Ok(LabeledDataset::new(name, records))
}
