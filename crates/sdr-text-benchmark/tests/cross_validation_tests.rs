//! Fold construction and scoring integration tests.
//!
//! Covers:
//! 1. k-fold test sets partitioning the sample range
//! 2. Training-size partitions
//! 3. Fold accuracy bounds and the worked permutation example
//! 4. Combining folds into an experiment summary

use std::collections::BTreeSet;

use sdr_text_benchmark::config::SplitPolicy;
use sdr_text_benchmark::metrics::{evaluate_experiment, evaluate_fold};
use sdr_text_benchmark::splits::CrossValidationSplitter;
use sdr_text_core::{Label, LabelVocabulary, SdrError};

fn vocabulary(size: usize) -> LabelVocabulary {
    LabelVocabulary::from_label_lists((0..size).map(|i| vec![format!("label{}", i)]))
}

fn singletons(labels: &[Label]) -> Vec<BTreeSet<Label>> {
    labels.iter().map(|&l| BTreeSet::from([l])).collect()
}

#[test]
fn test_kfold_tests_partition_range() {
    for n in [2usize, 5, 9, 17, 40] {
        for k in 2..=n.min(8) {
            for shuffle in [false, true] {
                let folds = CrossValidationSplitter::new(n as u64 * 31 + k as u64)
                    .k_folds(n, k, shuffle)
                    .unwrap();
                assert_eq!(folds.len(), k, "n={} k={}", n, k);

                let mut seen = vec![0usize; n];
                for fold in &folds {
                    assert!(!fold.test.is_empty(), "empty test block n={} k={}", n, k);
                    assert_eq!(fold.train.len() + fold.test.len(), n);
                    let test: BTreeSet<usize> = fold.test.iter().copied().collect();
                    assert!(fold.train.iter().all(|i| !test.contains(i)));
                    for &i in &fold.test {
                        seen[i] += 1;
                    }
                }
                assert!(
                    seen.iter().all(|&c| c == 1),
                    "every sample tested once: n={} k={} shuffle={}",
                    n,
                    k,
                    shuffle
                );
            }
        }
    }
}

#[test]
fn test_three_folds_over_nine_samples() {
    let folds = CrossValidationSplitter::new(7).k_folds(9, 3, true).unwrap();
    assert_eq!(folds.len(), 3);
    let union: BTreeSet<usize> = folds.iter().flat_map(|f| f.test.iter().copied()).collect();
    assert_eq!(union, (0..9).collect());
    for fold in &folds {
        assert_eq!(fold.test.len(), 3);
        assert_eq!(fold.train.len(), 6);
    }
}

#[test]
fn test_same_seed_same_folds() {
    let a = CrossValidationSplitter::new(99).k_folds(30, 4, true).unwrap();
    let b = CrossValidationSplitter::new(99).k_folds(30, 4, true).unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.test, y.test);
    }
}

#[test]
fn test_single_fold_is_resubstitution() {
    let folds = CrossValidationSplitter::new(0).k_folds(6, 1, true).unwrap();
    assert_eq!(folds.len(), 1);
    assert_eq!(folds[0].train, (0..6).collect::<Vec<_>>());
    assert_eq!(folds[0].test, (0..6).collect::<Vec<_>>());
}

#[test]
fn test_fold_count_errors() {
    let mut splitter = CrossValidationSplitter::new(0);
    assert!(matches!(
        splitter.k_folds(5, 0, false),
        Err(SdrError::InvalidFoldCount { k: 0, .. })
    ));
    assert!(matches!(
        splitter.k_folds(3, 4, false),
        Err(SdrError::ConfigError(_))
    ));
}

#[test]
fn test_train_size_policy() {
    let policy = SplitPolicy::TrainSizes {
        sizes: vec![2, 5, 10],
        ordered: false,
    };
    let folds = CrossValidationSplitter::new(3).folds(&policy, 10).unwrap();
    assert_eq!(folds.len(), 3);
    assert_eq!(folds[0].train.len(), 2);
    assert_eq!(folds[1].train.len(), 5);
    assert_eq!(folds[2].train.len(), 10);
    assert!(folds[2].test.is_empty());

    let ordered = CrossValidationSplitter::new(3).partition(10, 4, true).unwrap();
    assert_eq!(ordered.train, vec![0, 1, 2, 3]);
    assert_eq!(ordered.test, vec![4, 5, 6, 7, 8, 9]);

    assert!(matches!(
        CrossValidationSplitter::new(3).partition(10, 11, false),
        Err(SdrError::InvalidTrainSize { size: 11, samples: 10 })
    ));
}

#[test]
fn test_repeated_train_sizes_draw_fresh_partitions() {
    let policy = SplitPolicy::TrainSizes {
        sizes: vec![10, 10, 10],
        ordered: false,
    };
    let folds = CrossValidationSplitter::new(1).folds(&policy, 40).unwrap();
    assert_eq!(folds.len(), 3);

    for fold in &folds {
        assert_eq!(fold.train.len(), 10);
        assert_eq!(fold.test.len(), 30);
        let all: BTreeSet<usize> = fold.train.iter().chain(&fold.test).copied().collect();
        assert_eq!(all, (0..40).collect());
    }

    let trains: BTreeSet<BTreeSet<usize>> = folds
        .iter()
        .map(|f| f.train.iter().copied().collect())
        .collect();
    assert!(trains.len() > 1, "repeated sizes reused one partition");
}

#[test]
fn test_permuted_predictions_score_one_third() {
    let predicted = vec![vec![1], vec![2], vec![0]];
    let actual = singletons(&[2, 1, 0]);
    let eval = evaluate_fold(&predicted, &actual, &vocabulary(3)).unwrap();

    assert!((eval.accuracy - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(eval.sample_accuracies, vec![0.0, 0.0, 1.0]);
    assert_eq!(eval.confusion.get(2, 1), 1);
    assert_eq!(eval.confusion.get(1, 2), 1);
    assert_eq!(eval.confusion.get(0, 0), 1);
    assert_eq!(eval.confusion.total(), 3);
}

#[test]
fn test_accuracy_bounds() {
    let vocab = vocabulary(3);
    let actual = vec![
        BTreeSet::from([0]),
        BTreeSet::from([1, 2]),
        BTreeSet::from([2]),
    ];

    let perfect = vec![vec![0], vec![1, 2], vec![2]];
    assert_eq!(evaluate_fold(&perfect, &actual, &vocab).unwrap().accuracy, 1.0);

    let silent: Vec<Vec<Label>> = vec![vec![], vec![], vec![]];
    let eval = evaluate_fold(&silent, &actual, &vocab).unwrap();
    assert_eq!(eval.accuracy, 0.0);
    let none = eval.confusion.none_index();
    assert_eq!(eval.confusion.get(1, none), 1);
    assert_eq!(eval.confusion.get(2, none), 2);

    let partial = vec![vec![0, 1], vec![2], vec![0]];
    let acc = evaluate_fold(&partial, &actual, &vocab).unwrap().accuracy;
    assert!((0.0..=1.0).contains(&acc));
    assert!((acc - 0.5).abs() < 1e-12);
}

#[test]
fn test_fold_input_errors() {
    let vocab = vocabulary(2);
    assert!(matches!(
        evaluate_fold(&[vec![0]], &singletons(&[0, 1]), &vocab),
        Err(SdrError::LengthMismatch { .. })
    ));
    assert!(matches!(
        evaluate_fold(&[vec![0], vec![1]], &[BTreeSet::from([0]), BTreeSet::new()], &vocab),
        Err(SdrError::EmptyLabels { index: 1 })
    ));
    assert!(matches!(
        evaluate_fold(&[vec![5]], &singletons(&[0]), &vocab),
        Err(SdrError::UnknownLabel { label: 5, .. })
    ));
}

#[test]
fn test_experiment_summary() {
    let vocab = vocabulary(2);
    let folds = vec![
        evaluate_fold(&[vec![0], vec![1]], &singletons(&[0, 1]), &vocab).unwrap(),
        evaluate_fold(&[vec![1], vec![1]], &singletons(&[0, 1]), &vocab).unwrap(),
        evaluate_fold(&[vec![1]], &singletons(&[0]), &vocab).unwrap(),
    ];
    let summary = evaluate_experiment(&folds).unwrap();

    assert_eq!(summary.folds, 3);
    assert_eq!(summary.max_accuracy, 1.0);
    assert_eq!(summary.min_accuracy, 0.0);
    assert!((summary.mean_accuracy - 0.5).abs() < 1e-12);
    assert_eq!(summary.total_confusion.get(0, 0), 1);
    assert_eq!(summary.total_confusion.get(0, 1), 2);
    assert_eq!(summary.total_confusion.get(1, 1), 2);
    assert_eq!(summary.total_confusion.total(), 5);

    assert!(matches!(evaluate_experiment(&[]), Err(SdrError::InvalidInput(_))));
}
