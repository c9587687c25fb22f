/// Counts over equal-width bins spanning the observed value range.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    counts: Vec<u64>,
    edges: Vec<f64>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins from the minimum to the
    /// maximum observed value. The last bin is closed on the right.
    ///
    /// A constant input widens the range to `v - 0.5 ..= v + 0.5`, so the
    /// single value lands in the middle bin. An empty input yields all-zero
    /// counts over `0.0..=1.0`.
    pub fn uniform(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if values.is_empty() {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let step = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| i as f64 * step + lo).collect();
        edges[bins] = hi;

        let norm = bins as f64 / (hi - lo);
        let mut counts = vec![0u64; bins];
        for &value in values {
            let mut index = (((value - lo) * norm) as usize).min(bins - 1);
            // The scaled index can be off by one near an edge.
            if index > 0 && value < edges[index] {
                index -= 1;
            } else if index + 1 < bins && value >= edges[index + 1] {
                index += 1;
            }
            counts[index] += 1;
        }

        Self { counts, edges }
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Population variance of the bin counts, not of the binned values.
    pub fn count_variance(&self) -> f64 {
        population_variance(&self.counts)
    }
}

pub fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<u64>() as f64 / values.len() as f64
}

/// Zero for fewer than two values.
pub fn population_variance(values: &[u64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn integer_labels_fill_one_bin_each() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let histogram = Histogram::uniform(&values, 10);
        assert_eq!(histogram.counts(), &[1; 10]);
        assert_eq!(histogram.count_variance(), 0.0);
    }

    #[test]
    fn maximum_value_belongs_to_last_bin() {
        let histogram = Histogram::uniform(&[0.0, 9.0, 9.0, 4.5], 10);
        assert_eq!(histogram.counts(), &[1, 0, 0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(histogram.edges().len(), 11);
        assert_eq!(histogram.edges()[10], 9.0);
    }

    #[test]
    fn constant_input_lands_in_middle_bin() {
        let histogram = Histogram::uniform(&[8.0; 1024], 10);
        assert_eq!(histogram.counts()[5], 1024);
        assert_eq!(histogram.total(), 1024);
        // One full bin and nine empty ones: large, not small.
        assert!(approx_eq(histogram.count_variance(), 94371.84));
    }

    #[test]
    fn single_value_variance_is_defined() {
        let histogram = Histogram::uniform(&[3.0], 10);
        assert!(approx_eq(histogram.count_variance(), 0.09));
    }

    #[test]
    fn empty_input_has_zero_counts() {
        let histogram = Histogram::uniform(&[], 10);
        assert_eq!(histogram.total(), 0);
        assert_eq!(histogram.count_variance(), 0.0);
    }

    #[test]
    fn variance_conventions() {
        assert_eq!(population_variance(&[]), 0.0);
        assert_eq!(population_variance(&[7]), 0.0);
        assert_eq!(population_variance(&[1, 3]), 1.0);
        assert_eq!(mean(&[]), 0.0);
        assert!(approx_eq(
            population_variance(&[4, 0, 0, 0, 120, 0, 0, 0, 0, 900]),
            71955.84
        ));
    }
}
