//! Render cost per row, summarised once per scroll cycle.

/// Min/max/average of one batch of samples, in cycles.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct TimingSummary {
    pub samples: u32,
    pub min: u32,
    pub max: u32,
    pub avg: u32,
}

/// Accumulates cycle counts between summaries.
#[derive(Clone, Copy, Debug)]
pub struct RowTiming {
    samples: u32,
    min: u32,
    max: u32,
    total: u64,
    bad_samples: u32,
}

impl RowTiming {
    pub const fn new() -> Self {
        Self {
            samples: 0,
            min: u32::MAX,
            max: 0,
            total: 0,
            bad_samples: 0,
        }
    }

    /// Add one measurement. `None` marks a sample the counter could not resolve.
    pub fn record(
        &mut self,
        cycles: Option<u32>,
    ) {
        let Some(cycles) = cycles else {
            self.bad_samples = self.bad_samples.saturating_add(1);
            return;
        };
        self.samples = self.samples.saturating_add(1);
        self.min = self.min.min(cycles);
        self.max = self.max.max(cycles);
        self.total = self.total.saturating_add(u64::from(cycles));
    }

    #[inline]
    pub const fn samples(&self) -> u32 { self.samples }

    #[inline]
    pub const fn bad_samples(&self) -> u32 { self.bad_samples }

    /// Current summary without clearing.
    pub const fn summary(&self) -> TimingSummary {
        if self.samples == 0 {
            return TimingSummary {
                samples: 0,
                min: 0,
                max: 0,
                avg: 0,
            };
        }
        TimingSummary {
            samples: self.samples,
            min: self.min,
            max: self.max,
            avg: (self.total / self.samples as u64) as u32,
        }
    }

    /// Summary of the batch so far, then start a new batch.
    pub const fn take(&mut self) -> TimingSummary {
        let summary = self.summary();
        *self = Self::new();
        summary
    }
}

impl Default for RowTiming {
    fn default() -> Self { Self::new() }
}
