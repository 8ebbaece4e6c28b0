use std::fmt;

/// Critical value of the standard normal for a two-sided 95% interval.
const Z_95: f64 = 1.96;

/// Online mean and variance accumulator (Welford's algorithm).
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

/// Mean, standard deviation and normal-approximation 95% confidence
/// interval of a set of values.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct AggregateStats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub n: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    /// Returns `None` when no values were added.
    ///
    /// The variance denominator is `max(1, n - 1)`, so a single value has
    /// zero spread. No small-sample correction is applied to the interval.
    pub fn report(&self) -> Option<AggregateStats> {
        if self.n_vals == 0 {
            return None;
        }
        let n = self.n_vals as f64;
        let var = self.diff_2_sum / (self.n_vals - 1).max(1) as f64;
        let std_dev = var.sqrt();
        let half_width = Z_95 * std_dev / n.sqrt();
        Some(AggregateStats {
            mean: self.mean,
            std_dev,
            ci_low: self.mean - half_width,
            ci_high: self.mean + half_width,
            n: self.n_vals,
        })
    }
}

impl fmt::Display for AggregateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.3}, sd={:.3}, 95% CI=[{:.3}, {:.3}], n={}",
            self.mean, self.std_dev, self.ci_low, self.ci_high, self.n
        )
    }
}
