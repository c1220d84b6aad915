//! Reproducible train / validate / test partitioning.
//!
//! Sampling is uniform over indices and ignores labels (no stratification).

use ndarray::{Array, ArrayBase, Axis, Data, RemoveAxis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoughError, Result};

pub const DEFAULT_TEST_FRACTION: f64 = 0.1;
pub const DEFAULT_VALIDATE_FRACTION: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub validate_fraction: f64,
    /// Fixed seed for reproducible splits; fresh entropy on every call when absent.
    pub seed: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            validate_fraction: DEFAULT_VALIDATE_FRACTION,
            seed: None,
        }
    }
}

impl SplitConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (test, validate) = (self.test_fraction, self.validate_fraction);
        let valid = test.is_finite()
            && validate.is_finite()
            && test >= 0.0
            && validate >= 0.0
            && test + validate < 1.0;
        if valid {
            Ok(())
        } else {
            Err(CoughError::InvalidFraction { test, validate })
        }
    }

    fn holdout_fraction(&self) -> f64 {
        self.test_fraction + self.validate_fraction
    }
}

/// Disjoint index sets covering `0..n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub validate: Vec<usize>,
    pub test: Vec<usize>,
}

/// Any collection partitioned along a [`SplitIndices`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partitioned<T> {
    pub train: T,
    pub validate: T,
    pub test: T,
}

impl SplitIndices {
    pub fn len(&self) -> usize {
        self.train.len() + self.validate.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn select<T: Clone>(&self, items: &[T]) -> Partitioned<Vec<T>> {
        let pick = |indices: &[usize]| indices.iter().map(|&i| items[i].clone()).collect();
        Partitioned {
            train: pick(&self.train),
            validate: pick(&self.validate),
            test: pick(&self.test),
        }
    }

    /// Partition the outer axis of an array (one record per entry of axis 0).
    pub fn select_rows<A, S, D>(&self, array: &ArrayBase<S, D>) -> Partitioned<Array<A, D>>
    where
        A: Clone,
        S: Data<Elem = A>,
        D: RemoveAxis,
    {
        Partitioned {
            train: array.select(Axis(0), &self.train),
            validate: array.select(Axis(0), &self.validate),
            test: array.select(Axis(0), &self.test),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DatasetSplitter {
    config: SplitConfig,
}

impl DatasetSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split `0..n`: first a holdout of `ceil((test + validate) * n)` indices,
    /// then `ceil(validate * holdout)` of those become the validation set and
    /// the rest the test set. Both stages draw from an rng seeded identically.
    pub fn partition(&self, n: usize) -> Result<SplitIndices> {
        self.config.validate()?;

        let holdout_len = ceil_fraction(self.config.holdout_fraction(), n);
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng());
        let train = order.split_off(holdout_len);
        let holdout = order;

        let validate_len = ceil_fraction(self.config.validate_fraction, holdout.len());
        let mut holdout_order: Vec<usize> = (0..holdout.len()).collect();
        holdout_order.shuffle(&mut self.rng());
        let validate = holdout_order[..validate_len]
            .iter()
            .map(|&i| holdout[i])
            .collect::<Vec<_>>();
        let test = holdout_order[validate_len..]
            .iter()
            .map(|&i| holdout[i])
            .collect::<Vec<_>>();

        debug!(
            total = n,
            train = train.len(),
            validate = validate.len(),
            test = test.len(),
            seed = ?self.config.seed,
            "partitioned dataset"
        );
        Ok(SplitIndices {
            train,
            validate,
            test,
        })
    }

    /// Partition items and labels along the same indices.
    pub fn split<T: Clone, L: Clone>(
        &self,
        items: &[T],
        labels: &[L],
    ) -> Result<(Partitioned<Vec<T>>, Partitioned<Vec<L>>)> {
        if items.len() != labels.len() {
            return Err(CoughError::MisalignedInputs {
                items: items.len(),
                labels: labels.len(),
            });
        }
        let indices = self.partition(items.len())?;
        Ok((indices.select(items), indices.select(labels)))
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Convenience wrapper over [`DatasetSplitter::split`].
pub fn split<T: Clone, L: Clone>(
    items: &[T],
    labels: &[L],
    test_fraction: f64,
    validate_fraction: f64,
    seed: Option<u64>,
) -> Result<(Partitioned<Vec<T>>, Partitioned<Vec<L>>)> {
    DatasetSplitter::new(SplitConfig {
        test_fraction,
        validate_fraction,
        seed,
    })
    .split(items, labels)
}

fn ceil_fraction(fraction: f64, n: usize) -> usize {
    ((fraction * n as f64).ceil() as usize).min(n)
}
