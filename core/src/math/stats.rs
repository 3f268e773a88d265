use serde::Serialize;

/// Running mean and extent of one angle series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunningStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Non-finite samples are ignored.
    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        (self.count > 0).then_some((self.min, self.max))
    }
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_have_no_range() {
        let stats = RunningStats::new();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.range(), None);
    }

    #[test]
    fn tracks_mean_and_extent() {
        let mut stats = RunningStats::new();
        for value in [1.0, -2.0, 4.0, f64::NAN] {
            stats.push(value);
        }
        assert_eq!(stats.count, 3);
        assert!((stats.mean - 1.0).abs() < 1e-12);
        assert_eq!(stats.range(), Some((-2.0, 4.0)));
    }
}
