//! Markdown report generation.

use crate::metrics::ConfusionMatrix;
use crate::runners::ExperimentResults;

/// Generate Markdown report from experiment results.
pub fn generate_markdown(results: &ExperimentResults) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Classification Results: {}\n\n", results.config.name));
    md.push_str(&format!(
        "**Generated:** {}\n\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("**Run:** `{}`\n\n", results.run_id));

    md.push_str("## Summary\n\n");
    write_summary(&mut md, results);

    md.push_str("## Accuracy by Fold\n\n");
    write_fold_table(&mut md, results);

    md.push_str("## Per-Label Accuracy\n\n");
    write_label_tables(&mut md, results);

    md.push_str("## Cumulative Confusion Matrix\n\n");
    write_confusion(&mut md, &results.summary.total_confusion);

    md.push_str("## Methodology\n\n");
    write_methodology(&mut md, results);

    md
}

fn write_summary(md: &mut String, results: &ExperimentResults) {
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Dataset | {} |\n", results.dataset_name));
    md.push_str(&format!("| Encoder | {} |\n", results.encoder));
    md.push_str(&format!("| Samples | {} |\n", results.sample_count));
    md.push_str(&format!("| Labels | {} |\n", results.labels.len()));
    md.push_str(&format!("| Folds evaluated | {} |\n", results.summary.folds));
    md.push_str(&format!("| Max accuracy | {:.4} |\n", results.summary.max_accuracy));
    md.push_str(&format!("| Mean accuracy | {:.4} |\n", results.summary.mean_accuracy));
    md.push_str(&format!("| Min accuracy | {:.4} |\n", results.summary.min_accuracy));
    md.push('\n');

    if !results.skipped_folds.is_empty() {
        md.push_str(&format!(
            "Folds without test samples (not evaluated): {:?}\n\n",
            results.skipped_folds
        ));
    }
}

fn write_fold_table(md: &mut String, results: &ExperimentResults) {
    md.push_str("| Fold | Train | Test | Accuracy | Train ms | Test ms |\n");
    md.push_str("|------|-------|------|----------|----------|---------|\n");
    for fold in &results.folds {
        md.push_str(&format!(
            "| {} | {} | {} | {:.4} | {} | {} |\n",
            fold.index,
            fold.train_size,
            fold.test_size,
            fold.evaluation.accuracy,
            fold.train_ms,
            fold.test_ms,
        ));
    }
    md.push('\n');
}

fn write_label_tables(md: &mut String, results: &ExperimentResults) {
    for (train_size, accuracies) in &results.label_accuracy_by_train_size {
        md.push_str(&format!("### Training size {}\n\n", train_size));
        md.push_str("| Label | Support | Accuracy |\n");
        md.push_str("|-------|---------|----------|\n");
        for la in accuracies {
            md.push_str(&format!("| {} | {} | {:.4} |\n", la.name, la.support, la.accuracy));
        }
        md.push('\n');
    }
}

/// Render a confusion matrix as a Markdown table.
pub fn confusion_table(cm: &ConfusionMatrix) -> String {
    let table = cm.to_table();
    let mut out = String::new();
    for (i, row) in table.iter().enumerate() {
        out.push_str("| ");
        out.push_str(&row.join(" | "));
        out.push_str(" |\n");
        if i == 0 {
            out.push_str(&format!("|{}\n", "---|".repeat(row.len())));
        }
    }
    out
}

fn write_confusion(md: &mut String, cm: &ConfusionMatrix) {
    md.push_str("Rows are actual labels, columns predicted labels.\n\n");
    md.push_str(&confusion_table(cm));
    md.push('\n');
}

fn write_methodology(md: &mut String, results: &ExperimentResults) {
    let model = &results.config.model;
    md.push_str(&format!(
        "- Patterns: n={}, w={}, metric {:?}, k {:?}\n",
        model.n, model.w, model.metric, model.k
    ));
    md.push_str(&format!("- Winners per sample: {}\n", model.num_labels));
    md.push_str(&format!("- Split: {:?}\n", results.config.split));
    md.push_str(&format!("- Seed: {}\n", results.config.seed));
    md.push_str("- Accuracy per sample is |predicted ∩ actual| / |actual|; extra predictions are not penalised.\n");
}
