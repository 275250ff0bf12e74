//! Cost evaluation: sum of within-zone population variances plus a
//! large penalty for every zone whose variance exceeds the homogeneity
//! threshold.

use crate::common::Instance;
use ndarray::Array2;

/// Multiplier applied to each zone's threshold excess. Large enough that
/// threshold-violating partitions are dominated by conforming ones while
/// the cost surface stays smooth for the local search.
pub const PENALTY_WEIGHT: f64 = 1e9;

/// Running `(count, sum, sum of squares)` statistics for one zone.
/// Supports O(1) add/remove, which is what makes the incremental cost
/// update in the search loop possible.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ZoneStats {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl ZoneStats {
    pub(crate) fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub(crate) fn remove(&mut self, value: f64) {
        debug_assert!(self.count > 0, "removing a value from an empty zone");
        self.count -= 1;
        self.sum -= value;
        self.sum_sq -= value * value;
    }

    /// Population variance of the zone's values. Zones of size 0 or 1
    /// have variance exactly 0.0. Clamped at zero against floating-point
    /// cancellation in `sum_sq`.
    pub(crate) fn variance(&self) -> f64 {
        if self.count <= 1 {
            return 0.0;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        (self.sum_sq / n - mean * mean).max(0.0)
    }

    /// Variance plus the threshold penalty for this zone.
    pub(crate) fn penalized_cost(&self, threshold: f64) -> f64 {
        let var = self.variance();
        if var > threshold {
            var + (var - threshold) * PENALTY_WEIGHT
        } else {
            var
        }
    }
}

/// One pass over the grid accumulating per-zone statistics, indexed
/// directly by zone id.
pub(crate) fn collect_stats(instance: &Instance, assignment: &Array2<usize>) -> Vec<ZoneStats> {
    let mut stats = vec![ZoneStats::default(); instance.zone_count()];
    for (&zone, &value) in assignment.iter().zip(instance.grid().iter()) {
        stats[zone].add(value);
    }
    stats
}

/// Evaluates a partition: base cost is the sum of within-zone variances
/// ("loss of representativeness"); each zone whose variance exceeds
/// `threshold` additionally contributes `(variance - threshold) * 1e9`.
/// `threshold = +∞` yields the unpenalized objective. O(rows·cols).
pub fn evaluate(instance: &Instance, assignment: &Array2<usize>, threshold: f64) -> f64 {
    collect_stats(instance, assignment)
        .iter()
        .map(|s| s.penalized_cost(threshold))
        .sum()
}
