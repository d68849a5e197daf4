//! Cumulative-threshold categorical sampling.

use rand::Rng;

use crate::error::ConfigError;

/// A categorical distribution over `T` built from positive weights.
///
/// Stores the running sum of weights in front of each category. Sampling
/// draws uniformly in `[0, total)` and returns the category with the greatest
/// threshold not above the draw.
#[derive(Debug, Clone)]
pub struct WeightedChoice<T> {
    thresholds: Vec<(f64, T)>,
    total: f64,
}

impl<T: Clone> WeightedChoice<T> {
    /// Build the sampler. `label` names a category in error messages.
    pub fn new<I, F>(entries: I, label: F) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (f64, T)>,
        F: Fn(&T) -> String,
    {
        let mut thresholds = Vec::new();
        let mut total = 0.0;
        for (weight, item) in entries {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    label: label(&item),
                    weight,
                });
            }
            // Zero-weight entries would shadow the previous threshold.
            if weight == 0.0 {
                continue;
            }
            thresholds.push((total, item));
            total += weight;
        }
        if thresholds.is_empty() {
            return Err(ConfigError::NonPositiveTotalWeight { total });
        }
        if !total.is_finite() {
            return Err(ConfigError::NonFiniteTotalWeight { total });
        }
        Ok(Self { thresholds, total })
    }

    /// Draw one category.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> T {
        let draw = rng.gen_range(0.0..self.total);
        // Index of the first threshold strictly above the draw; the floor entry
        // precedes it. The first threshold is 0.0, so the index is never 0.
        let idx = self.thresholds.partition_point(|(t, _)| *t <= draw);
        self.thresholds[idx.saturating_sub(1)].1.clone()
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Categories with positive weight, in declaration order.
    pub fn categories(&self) -> impl Iterator<Item = &T> {
        self.thresholds.iter().map(|(_, item)| item)
    }
}
