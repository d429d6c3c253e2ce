//! Per-fold classification CSV output.
//!
//! Columns: `sample_index, text, actual, predicted`. Label lists are sorted
//! and joined with `;`.

use std::path::{Path, PathBuf};

use crate::runners::{ExperimentResults, FoldResult};

/// File name for a fold's classifications.
pub fn file_name(fold: usize) -> String {
    format!("classifications_fold{}.csv", fold)
}

/// Write one fold's classifications as CSV.
pub fn write_fold<W: std::io::Write>(writer: W, fold: &FoldResult) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["sample_index", "text", "actual", "predicted"])?;
    for record in &fold.classifications {
        wtr.write_record([
            record.sample_index.to_string(),
            record.text.clone(),
            record.actual.join(";"),
            record.predicted.join(";"),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write every fold into `dir`, returning the written paths.
pub fn write_all(results: &ExperimentResults, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(results.folds.len());
    for fold in &results.folds {
        let path = dir.join(file_name(fold.index));
        let file = std::fs::File::create(&path)?;
        write_fold(file, fold).map_err(std::io::Error::other)?;
        paths.push(path);
    }
    tracing::info!(dir = %dir.display(), files = paths.len(), "wrote classifications");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::evaluate_fold;
    use crate::runners::ClassificationRecord;
    use sdr_text_core::LabelVocabulary;
    use std::collections::BTreeSet;

    #[test]
    fn test_write_fold_csv() {
        let vocab = LabelVocabulary::from_label_lists(vec![vec!["a", "b"]]);
        let evaluation = evaluate_fold(&[vec![1]], &[BTreeSet::from([0])], &vocab).unwrap();
        let fold = FoldResult {
            index: 0,
            train_size: 1,
            test_size: 1,
            evaluation,
            classifications: vec![ClassificationRecord {
                sample_index: 3,
                text: "hello, world".into(),
                actual: vec!["a".into()],
                predicted: vec!["a".into(), "b".into()],
            }],
            train_ms: 0,
            test_ms: 0,
        };

        let mut buf = Vec::new();
        write_fold(&mut buf, &fold).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "sample_index,text,actual,predicted");
        assert_eq!(lines[1], "3,\"hello, world\",a,a;b");
    }
}
