//! Cross-validated classification experiment.
//!
//! Samples are tokenized and encoded once. Each fold then resets the model,
//! trains on the fold's training indices, classifies the test indices and
//! evaluates the predictions. Fold evaluations are combined into an
//! [`ExperimentSummary`].

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use sdr_text_core::{
    ClassificationModel, Label, LabelVocabulary, Sample, SdrError, SdrResult, SpellCorrector,
    TextPreprocessor, Tokenizer,
};

use crate::config::ExperimentConfig;
use crate::datasets::LabeledDataset;
use crate::metrics::{
    aggregate_label_accuracy, evaluate_experiment, evaluate_fold, ExperimentSummary,
    FoldEvaluation, LabelAccuracy,
};
use crate::splits::CrossValidationSplitter;

/// File name of the encoding log inside the results directory.
pub const ENCODING_LOG_FILE: &str = "encoding_log.json";

/// Actual and predicted labels of one test sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub sample_index: usize,
    pub text: String,
    /// Actual label names, sorted
    pub actual: Vec<String>,
    /// Predicted label names, sorted
    pub predicted: Vec<String>,
}

/// Outcome of one fold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldResult {
    pub index: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub evaluation: FoldEvaluation,
    pub classifications: Vec<ClassificationRecord>,
    pub train_ms: u64,
    pub test_ms: u64,
}

/// Outcome of a complete experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResults {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub config: ExperimentConfig,
    pub dataset_name: String,
    pub sample_count: usize,
    pub labels: Vec<String>,
    pub encoder: String,
    pub folds: Vec<FoldResult>,
    /// Folds that had no test samples and were not evaluated
    pub skipped_folds: Vec<usize>,
    pub summary: ExperimentSummary,
    /// Per-label accuracy grouped by training-set size
    pub label_accuracy_by_train_size: BTreeMap<usize, Vec<LabelAccuracy>>,
    pub encode_ms: u64,
}

impl ExperimentResults {
    /// One-paragraph human-readable summary.
    pub fn summary_text(&self) -> String {
        format!(
            "{} on '{}' ({} samples, {} labels, {} folds): accuracy max {:.4} / mean {:.4} / min {:.4}",
            self.encoder,
            self.dataset_name,
            self.sample_count,
            self.labels.len(),
            self.summary.folds,
            self.summary.max_accuracy,
            self.summary.mean_accuracy,
            self.summary.min_accuracy,
        )
    }
}

/// Runs one experiment configuration against datasets.
pub struct ExperimentRunner {
    config: ExperimentConfig,
    tokenizer: Box<dyn Tokenizer>,
}

impl ExperimentRunner {
    /// Build a runner and its tokenizer from `config`.
    pub fn new(config: ExperimentConfig) -> SdrResult<Self> {
        config.validate()?;
        let tokenizer = TextPreprocessor::new(config.tokenizer.clone())?;
        Ok(Self {
            config,
            tokenizer: Box::new(tokenizer),
        })
    }

    /// Replace the tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Rebuild the configured tokenizer around a spelling corrector.
    pub fn with_spell_corrector(self, corrector: Box<dyn SpellCorrector>) -> SdrResult<Self> {
        let tokenizer =
            TextPreprocessor::new(self.config.tokenizer.clone())?.with_spell_corrector(corrector);
        Ok(self.with_tokenizer(Box::new(tokenizer)))
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run every fold of the configured split policy over `dataset`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty dataset or when no fold has test samples
    /// - `InvalidFoldCount` / `ConfigError` / `InvalidTrainSize` from the splitter
    /// - `EmptyLabels` when a tested sample has no labels
    pub fn run(&self, dataset: &LabeledDataset) -> SdrResult<ExperimentResults> {
        if dataset.is_empty() {
            return Err(SdrError::InvalidInput(format!(
                "dataset '{}' has no samples",
                dataset.name
            )));
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let vocabulary = dataset.vocabulary();
        let label_sets = dataset.label_sets(&vocabulary);
        let num_labels = self.config.model.num_labels;
        let mut model = ClassificationModel::from_config(&self.config.model)?;

        info!(
            %run_id,
            experiment = %self.config.name,
            dataset = %dataset.name,
            samples = dataset.len(),
            labels = vocabulary.len(),
            "starting experiment"
        );

        let encode_start = Instant::now();
        let samples: Vec<Sample> = dataset
            .records
            .iter()
            .zip(&label_sets)
            .map(|(record, labels)| {
                let tokens = self.tokenizer.tokenize(&record.text);
                model.encode_sample(&tokens, labels.iter().copied())
            })
            .collect();
        let encode_ms = encode_start.elapsed().as_millis() as u64;
        info!(samples = samples.len(), elapsed_ms = encode_ms, "encoded samples");

        if self.config.write_encodings {
            let dir = &self.config.results_dir;
            std::fs::create_dir_all(dir).map_err(|e| SdrError::io(dir, e))?;
            model.write_encodings(&dir.join(ENCODING_LOG_FILE), &samples, &vocabulary)?;
        }

        let folds = CrossValidationSplitter::new(self.config.seed)
            .folds(&self.config.split, samples.len())?;

        let mut results = Vec::with_capacity(folds.len());
        let mut skipped_folds = Vec::new();

        for fold in &folds {
            info!(
                fold = fold.index,
                train = fold.train.len(),
                test = fold.test.len(),
                "running fold"
            );

            let train_start = Instant::now();
            model.reset_model();
            let learned: usize = fold.train.iter().map(|&i| model.train_model(&samples[i])).sum();
            let train_ms = train_start.elapsed().as_millis() as u64;
            debug!(fold = fold.index, prototypes = learned, "trained");

            if fold.test.is_empty() {
                warn!(fold = fold.index, "fold has no test samples, skipping evaluation");
                skipped_folds.push(fold.index);
                continue;
            }

            let test_start = Instant::now();
            let predicted: Vec<Vec<Label>> = fold
                .test
                .iter()
                .map(|&i| model.test_model(&samples[i], num_labels))
                .collect();
            let test_ms = test_start.elapsed().as_millis() as u64;
            let actual: Vec<BTreeSet<Label>> =
                fold.test.iter().map(|&i| label_sets[i].clone()).collect();

            let evaluation = evaluate_fold(&predicted, &actual, &vocabulary)?;
            info!(
                fold = fold.index,
                accuracy = evaluation.accuracy,
                train_ms,
                test_ms,
                "fold evaluated"
            );

            let classifications = fold
                .test
                .iter()
                .zip(&predicted)
                .map(|(&i, p)| {
                    Ok(ClassificationRecord {
                        sample_index: i,
                        text: dataset.records[i].text.clone(),
                        actual: label_names(label_sets[i].iter().copied(), &vocabulary)?,
                        predicted: label_names(p.iter().copied(), &vocabulary)?,
                    })
                })
                .collect::<SdrResult<Vec<_>>>()?;

            results.push(FoldResult {
                index: fold.index,
                train_size: fold.train.len(),
                test_size: fold.test.len(),
                evaluation,
                classifications,
                train_ms,
                test_ms,
            });
        }

        let evaluations: Vec<FoldEvaluation> =
            results.iter().map(|r| r.evaluation.clone()).collect();
        let summary = evaluate_experiment(&evaluations)?;

        let mut by_size: BTreeMap<usize, Vec<&FoldEvaluation>> = BTreeMap::new();
        for r in &results {
            by_size.entry(r.train_size).or_default().push(&r.evaluation);
        }
        let label_accuracy_by_train_size = by_size
            .into_iter()
            .map(|(size, evals)| (size, aggregate_label_accuracy(evals)))
            .collect();

        info!(
            %run_id,
            max = summary.max_accuracy,
            mean = summary.mean_accuracy,
            min = summary.min_accuracy,
            "experiment complete"
        );

        Ok(ExperimentResults {
            run_id,
            started_at,
            config: self.config.clone(),
            dataset_name: dataset.name.clone(),
            sample_count: dataset.len(),
            labels: vocabulary.names().to_vec(),
            encoder: model.encoder_name().to_string(),
            folds: results,
            skipped_folds,
            summary,
            label_accuracy_by_train_size,
            encode_ms,
        })
    }
}

/// Sorted label names.
fn label_names(
    labels: impl Iterator<Item = Label>,
    vocabulary: &LabelVocabulary,
) -> SdrResult<Vec<String>> {
    let mut names = labels
        .map(|l| vocabulary.name(l).map(str::to_string))
        .collect::<SdrResult<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
