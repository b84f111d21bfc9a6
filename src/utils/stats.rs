//! Sample sequences and the summary statistics computed over them.
//!
//! All values are microseconds stored as `f32`. Sums are accumulated in `f64`
//! so long runs of samples do not lose precision.

use std::cell::OnceCell;
use std::fmt;

/// An ordered list of timing samples, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Samples {
    values: Vec<f32>,
}

impl Samples {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample_usec: f32) {
        self.values.push(sample_usec);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f32> {
        self.values.iter()
    }

    /// Snapshot these samples into a [`Stats`].
    pub fn stats(&self) -> Stats {
        Stats::new(self)
    }
}

impl From<Vec<f32>> for Samples {
    fn from(values: Vec<f32>) -> Self {
        Self { values }
    }
}

impl FromIterator<f32> for Samples {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Samples {
    type Item = &'a f32;
    type IntoIter = std::slice::Iter<'a, f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// All statistics, computed together on first access.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Summary {
    minimum: f32,
    maximum: f32,
    median: f32,
    mean: f32,
    standard_deviation: f32,
}

/// Statistics over a private copy of a sample sequence.
///
/// Computation is lazy: the first accessor call computes every statistic and
/// caches the result. With zero samples the minimum is `+inf`, the maximum is
/// `-inf` and everything else is `0`; check [`Stats::count`] before reporting.
#[derive(Clone, Debug)]
pub struct Stats {
    samples: Vec<f32>,
    summary: OnceCell<Summary>,
}

impl Stats {
    /// Copy `samples` and prepare to summarize them. The caller's sequence is
    /// never reordered.
    pub fn new(samples: &Samples) -> Self {
        Self::from_slice(samples.as_slice())
    }

    pub fn from_slice(samples: &[f32]) -> Self {
        Self {
            samples: samples.to_vec(),
            summary: OnceCell::new(),
        }
    }

    pub fn minimum(&self) -> f32 {
        self.summary().minimum
    }

    pub fn maximum(&self) -> f32 {
        self.summary().maximum
    }

    pub fn median(&self) -> f32 {
        self.summary().median
    }

    pub fn mean(&self) -> f32 {
        self.summary().mean
    }

    /// Population standard deviation.
    pub fn standard_deviation(&self) -> f32 {
        self.summary().standard_deviation
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// The ±2σ error bound as a percentage of the mean.
    ///
    /// `None` when there are no samples or the mean is zero.
    pub fn error_percent(&self) -> Option<f32> {
        let mean = self.mean();
        if self.count() == 0 || mean == 0.0 {
            return None;
        }
        Some(self.standard_deviation() * 2.0 * 100.0 / mean.abs())
    }

    fn summary(&self) -> &Summary {
        self.summary.get_or_init(|| compute_summary(&self.samples))
    }
}

fn compute_summary(samples: &[f32]) -> Summary {
    let mut summary = Summary {
        minimum: f32::INFINITY,
        maximum: f32::NEG_INFINITY,
        median: 0.0,
        mean: 0.0,
        standard_deviation: 0.0,
    };

    let count = samples.len();
    let mut total = 0.0f64;
    for &sample in samples {
        if sample < summary.minimum {
            summary.minimum = sample;
        }
        if sample > summary.maximum {
            summary.maximum = sample;
        }
        total += sample as f64;
    }

    if count == 0 {
        return summary;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    summary.median = if count % 2 == 1 {
        sorted[count / 2]
    } else {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    };

    summary.mean = (total / count as f64) as f32;

    let mean = summary.mean as f64;
    let squares: f64 = samples
        .iter()
        .map(|&sample| {
            let diff = sample as f64 - mean;
            diff * diff
        })
        .sum();
    summary.standard_deviation = (squares / count as f64).sqrt() as f32;

    summary
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.3} median={:.3} min={:.3} max={:.3} stddev={:.3} samples={}",
            self.mean(),
            self.median(),
            self.minimum(),
            self.maximum(),
            self.standard_deviation(),
            self.count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_of(values: &[f32]) -> Stats {
        Stats::new(&Samples::from(values.to_vec()))
    }

    #[test]
    fn test_explicit_constructors_agree() {
        let samples = Samples::from(vec![3.0, 1.0, 2.0]);
        let a = Stats::new(&samples);
        let b = samples.stats();
        let c = Stats::from_slice(samples.as_slice());
        for stats in [&b, &c] {
            assert_eq!(stats.median(), a.median());
            assert_eq!(stats.mean(), a.mean());
            assert_eq!(stats.count(), a.count());
        }
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(stats_of(&[1.0, 2.0, 3.0]).median(), 2.0);
        assert_eq!(stats_of(&[1.0, 2.0, 3.0, 4.0]).median(), 2.5);
        assert_eq!(stats_of(&[3.0, 1.0, 2.0]).median(), 2.0);
    }

    #[test]
    fn test_mean_and_population_std_dev() {
        let stats = stats_of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.mean(), 5.0);
        assert_eq!(stats.standard_deviation(), 2.0);
        assert_eq!(stats.minimum(), 2.0);
        assert_eq!(stats.maximum(), 9.0);
        assert_eq!(stats.count(), 8);
    }

    #[test]
    fn test_empty_samples_give_sentinels() {
        let stats = Stats::new(&Samples::new());
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.median(), 0.0);
        assert_eq!(stats.standard_deviation(), 0.0);
        assert_eq!(stats.minimum(), f32::INFINITY);
        assert_eq!(stats.maximum(), f32::NEG_INFINITY);
        assert_eq!(stats.error_percent(), None);
    }

    #[test]
    fn test_input_not_mutated() {
        let samples = Samples::from(vec![5.0, 1.0, 4.0, 2.0, 3.0]);
        let stats = Stats::new(&samples);
        assert_eq!(stats.median(), 3.0);
        assert_eq!(samples.as_slice(), &[5.0, 1.0, 4.0, 2.0, 3.0]);
    }

    #[test]
    fn test_recomputation_is_bit_identical() {
        let samples = Samples::from(vec![0.1, 0.7, 0.3, 1.9, 0.2, 0.25]);
        let first = Stats::new(&samples);
        let second = Stats::new(&samples);
        assert_eq!(first.mean().to_bits(), second.mean().to_bits());
        assert_eq!(first.median().to_bits(), second.median().to_bits());
        assert_eq!(
            first.standard_deviation().to_bits(),
            second.standard_deviation().to_bits()
        );
        // Cached accessors return the same values on repeat.
        assert_eq!(first.mean().to_bits(), first.mean().to_bits());
    }

    #[test]
    fn test_error_percent() {
        let stats = stats_of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        // 2 * 2 * 100 / 5
        assert_eq!(stats.error_percent(), Some(80.0));
        assert_eq!(stats_of(&[0.0, 0.0]).error_percent(), None);
    }

    #[test]
    fn test_display() {
        let stats = stats_of(&[1.0, 2.0, 3.0]);
        assert_eq!(
            stats.to_string(),
            "mean=2.000 median=2.000 min=1.000 max=3.000 stddev=0.816 samples=3"
        );
    }

    mod proptest_stats {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Median and mean both lie within [min, max].
            #[test]
            fn central_values_within_bounds(
                values in prop::collection::vec(0.001f32..1.0e6, 1..64)
            ) {
                let stats = stats_of(&values);
                prop_assert!(stats.minimum() <= stats.median());
                prop_assert!(stats.median() <= stats.maximum());
                prop_assert!(stats.minimum() <= stats.mean());
                prop_assert!(stats.mean() <= stats.maximum());
            }

            /// Standard deviation is never negative.
            #[test]
            fn std_dev_non_negative(
                values in prop::collection::vec(-1.0e6f32..1.0e6, 0..64)
            ) {
                prop_assert!(stats_of(&values).standard_deviation() >= 0.0);
            }

            /// Identical samples have zero spread.
            #[test]
            fn std_dev_zero_for_constant(value in 0.001f32..1.0e6, len in 1usize..64) {
                let stats = stats_of(&vec![value; len]);
                prop_assert_eq!(stats.standard_deviation(), 0.0);
                prop_assert_eq!(stats.mean(), value);
            }

            /// Two distinct values always produce a positive spread.
            #[test]
            fn std_dev_positive_when_values_differ(
                values in prop::collection::vec(0.001f32..1.0e6, 2..64)
            ) {
                let all_equal = values.iter().all(|&v| v == values[0]);
                let stats = stats_of(&values);
                prop_assert_eq!(stats.standard_deviation() == 0.0, all_equal);
            }

            /// Building stats leaves the samples untouched.
            #[test]
            fn samples_unchanged(
                values in prop::collection::vec(-1.0e6f32..1.0e6, 0..64)
            ) {
                let samples = Samples::from(values.clone());
                let stats = Stats::new(&samples);
                let _ = stats.median();
                prop_assert_eq!(samples.as_slice(), values.as_slice());
            }
        }
    }
}
