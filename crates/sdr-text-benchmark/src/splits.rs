//! Train/test partitioning of sample indices.
//!
//! - [`CrossValidationSplitter::k_folds`]: `k` contiguous blocks of
//!   `floor(N/k)` indices, the last block absorbing the remainder
//! - [`CrossValidationSplitter::partition`]: one train/test split of a given
//!   training size, ordered or drawn at random without replacement
//!
//! Every fold's train and test sets are disjoint and together cover `[0, N)`.

use rand::prelude::*;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use sdr_text_core::{SdrError, SdrResult};

use crate::config::SplitPolicy;

/// One train/test split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    /// Position of the fold in the experiment
    pub index: usize,
    /// Training indices, ascending
    pub train: Vec<usize>,
    /// Test indices, ascending
    pub test: Vec<usize>,
}

/// Builds folds with a seeded generator.
#[derive(Debug, Clone)]
pub struct CrossValidationSplitter {
    rng: ChaCha8Rng,
}

impl CrossValidationSplitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// All folds of `policy` over `n` samples.
    pub fn folds(&mut self, policy: &SplitPolicy, n: usize) -> SdrResult<Vec<Fold>> {
        match policy {
            SplitPolicy::KFold { k, shuffle } => self.k_folds(n, *k, *shuffle),
            SplitPolicy::TrainSizes { sizes, ordered } => sizes
                .iter()
                .enumerate()
                .map(|(i, &size)| {
                    let mut fold = self.partition(n, size, *ordered)?;
                    fold.index = i;
                    Ok(fold)
                })
                .collect(),
        }
    }

    /// `k` folds over `n` samples.
    ///
    /// `k == 1` yields a single resubstitution fold that trains and tests on
    /// every sample.
    ///
    /// # Errors
    ///
    /// - `InvalidFoldCount` when `k == 0`
    /// - `ConfigError` when `k > n`
    pub fn k_folds(&mut self, n: usize, k: usize, shuffle: bool) -> SdrResult<Vec<Fold>> {
        if k == 0 {
            return Err(SdrError::invalid_folds(k, n, "at least one fold is required"));
        }
        if k > n {
            return Err(SdrError::ConfigError(format!(
                "cannot build {} folds from {} samples",
                k, n
            )));
        }

        let mut order: Vec<usize> = (0..n).collect();
        if shuffle {
            order.shuffle(&mut self.rng);
        }

        if k == 1 {
            return Ok(vec![Fold {
                index: 0,
                train: (0..n).collect(),
                test: (0..n).collect(),
            }]);
        }

        let block = n / k;
        let folds = (0..k)
            .map(|i| {
                let start = i * block;
                let end = if i + 1 == k { n } else { start + block };
                let mut test: Vec<usize> = order[start..end].to_vec();
                let mut train: Vec<usize> = order[..start]
                    .iter()
                    .chain(&order[end..])
                    .copied()
                    .collect();
                test.sort_unstable();
                train.sort_unstable();
                Fold { index: i, train, test }
            })
            .collect();
        Ok(folds)
    }

    /// Split `n` samples into `train_size` training and `n - train_size` test indices.
    ///
    /// # Errors
    ///
    /// `InvalidTrainSize` when `train_size > n`.
    pub fn partition(&mut self, n: usize, train_size: usize, ordered: bool) -> SdrResult<Fold> {
        if train_size > n {
            return Err(SdrError::InvalidTrainSize {
                size: train_size,
                samples: n,
            });
        }

        let train: Vec<usize> = if ordered {
            (0..train_size).collect()
        } else {
            let mut drawn = index::sample(&mut self.rng, n, train_size).into_vec();
            drawn.sort_unstable();
            drawn
        };

        let mut in_train = vec![false; n];
        for &i in &train {
            in_train[i] = true;
        }
        let test = (0..n).filter(|&i| !in_train[i]).collect();

        Ok(Fold {
            index: 0,
            train,
            test,
        })
    }
}
