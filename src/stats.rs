//! Descriptive statistics over a sample set.

/// Summary of one benchmark's samples, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    /// Sample standard deviation (n - 1 divisor); 0 for a single sample.
    pub stdev: f64,
}

impl Summary {
    /// Summarize `samples`, or `None` when there is nothing to summarize.
    pub fn from_samples(samples: &[i64]) -> Option<Self> {
        let (&first, rest) = samples.split_first()?;

        let (min, max) = rest
            .iter()
            .fold((first, first), |(lo, hi), &s| (lo.min(s), hi.max(s)));

        let count = samples.len();
        let n = count as f64;
        let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / n;

        let stdev = if count > 1 {
            let ss: f64 = samples
                .iter()
                .map(|&s| {
                    let d = s as f64 - mean;
                    d * d
                })
                .sum();
            (ss / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            stdev,
        })
    }
}
