//! Time-keyed Kp samples from the geomagnetic index feed.

use radmon_core::time::Epoch;

/// Kp values ordered by time.
#[derive(Debug, Clone, Default)]
pub struct KpSeries {
    samples: Vec<(Epoch, f64)>,
}

impl KpSeries {
    /// Samples may arrive in any order; they are sorted by epoch.
    pub fn new(mut samples: Vec<(Epoch, f64)>) -> Self {
        samples.sort_by(|a, b| a.0.unix_seconds().total_cmp(&b.0.unix_seconds()));
        KpSeries { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Kp in effect at `epoch`: the latest sample at or before it. Epochs
    /// before the first sample take the first value.
    pub fn kp_at(&self, epoch: Epoch) -> Option<f64> {
        let idx = self.samples.partition_point(|(t, _)| *t <= epoch);
        match idx {
            0 => self.samples.first().map(|(_, kp)| *kp),
            n => Some(self.samples[n - 1].1),
        }
    }
}
