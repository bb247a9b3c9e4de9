//! Per-message reduction logic, kept independent of the transport.

/// Running maximum over a sequence of integers, reporting only changes.
///
/// The maximum is unset until the first value arrives. Each observed value
/// that exceeds the current maximum is reported once; repeats and smaller
/// values produce no output, so the reported sequence is strictly
/// increasing.
#[derive(Debug, Default)]
pub struct RunningMax {
    current: Option<i64>,
    reported: bool,
}

impl RunningMax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one value, returning the new maximum if it changed.
    pub fn observe(&mut self, value: i64) -> Option<i64> {
        match self.current {
            Some(max) if value <= max => None,
            _ => {
                self.current = Some(value);
                self.reported = true;
                Some(value)
            }
        }
    }

    /// Consumes the reducer at end of input, returning the final maximum
    /// if it has not been reported yet.
    pub fn finish(self) -> Option<i64> {
        if self.reported {
            None
        } else {
            self.current
        }
    }
}

/// Running sum and count, resolved to a mean at end of input.
#[derive(Debug, Default)]
pub struct MeanAccumulator {
    sum: f64,
    count: u64,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Returns the mean, or `None` when no values were pushed.
    pub fn finish(self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Prime decomposition by trial division, smallest factors first.
pub fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut k = 2;
    while n > 1 {
        if n % k == 0 {
            factors.push(k);
            n /= k;
        } else {
            k += 1;
        }
    }
    factors
}
