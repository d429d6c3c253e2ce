//! Classifier throughput benchmarks using Criterion.
//!
//! Measures encoding, prototype learning, inference and winner selection at
//! a few corpus sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use sdr_text_benchmark::datasets::{CorpusGenerator, GeneratorConfig, LabeledDataset};
use sdr_text_core::{
    ClassificationModel, FrequencyVector, ModelConfig, Sample, TextPreprocessor, Tokenizer,
    WinnerSelector,
};

const SIZES: [usize; 3] = [100, 400, 1600];

fn corpus(num_samples: usize) -> LabeledDataset {
    CorpusGenerator::with_config(GeneratorConfig {
        seed: 42,
        num_samples,
        ..Default::default()
    })
    .generate()
}

fn encode_corpus(model: &ClassificationModel, dataset: &LabeledDataset) -> Vec<Sample> {
    let tokenizer = TextPreprocessor::default();
    let vocabulary = dataset.vocabulary();
    dataset
        .records
        .iter()
        .zip(dataset.label_sets(&vocabulary))
        .map(|(record, labels)| model.encode_sample(&tokenizer.tokenize(&record.text), labels))
        .collect()
}

fn model_config() -> ModelConfig {
    ModelConfig::random_sdr().with_tiebreak_seed(7)
}

/// Benchmark tokenizing and encoding a whole corpus.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.measurement_time(Duration::from_secs(5));

    for size in SIZES {
        let dataset = corpus(size);
        let model = ClassificationModel::from_config(&model_config()).unwrap();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("random_sdr", size),
            &(&model, &dataset),
            |b, (model, dataset)| b.iter(|| black_box(encode_corpus(model, dataset))),
        );
    }

    group.finish();
}

/// Benchmark learning every sample into an empty store.
fn bench_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("train");
    group.measurement_time(Duration::from_secs(5));

    for size in SIZES {
        let dataset = corpus(size);
        let mut model = ClassificationModel::from_config(&model_config()).unwrap();
        let samples = encode_corpus(&model, &dataset);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(BenchmarkId::new("learn", size), |b| {
            b.iter(|| {
                model.reset_model();
                for sample in &samples {
                    black_box(model.train_model(sample));
                }
            })
        });
    }

    group.finish();
}

/// Benchmark classifying every sample against a store of the whole corpus.
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for size in SIZES {
        let dataset = corpus(size);
        let mut model = ClassificationModel::from_config(&model_config()).unwrap();
        let samples = encode_corpus(&model, &dataset);
        for sample in &samples {
            model.train_model(sample);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(BenchmarkId::new("infer_and_select", size), |b| {
            b.iter(|| {
                for sample in &samples {
                    black_box(model.classify(sample));
                }
            })
        });
    }

    group.finish();
}

/// Benchmark winner selection on wide vote vectors with many ties.
fn bench_select_winners(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_winners");

    for labels in [10usize, 100, 1000] {
        let votes: FrequencyVector = (0..labels).map(|l| (l, (l % 7) as u64 + 1)).collect();
        let mut selector = WinnerSelector::new(Some(3));

        group.bench_with_input(BenchmarkId::new("top3", labels), &votes, |b, votes| {
            b.iter(|| black_box(selector.select_winners(votes, 3)))
        });
    }

    group.finish();
}

criterion_group!(encode_benches, bench_encode);

criterion_group!(classifier_benches, bench_train, bench_classify);

criterion_group!(selection_benches, bench_select_winners);

criterion_main!(encode_benches, classifier_benches, selection_benches);
