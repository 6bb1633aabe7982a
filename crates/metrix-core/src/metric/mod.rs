//! Typed metric handles (Counter / Gauge / Histogram) and their value cells.

pub mod counter;
pub mod gauge;
pub mod histogram;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{MetrixError, Result};

pub use counter::Counter;
pub use gauge::Gauge;
pub use histogram::{validate_bounds, Histogram, HistogramSample, DEFAULT_BUCKETS};

/// Metric type, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// Name used on the `# TYPE` line.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `f64` stored as bits in an `AtomicU64`.
#[derive(Debug, Default)]
pub(crate) struct AtomicF64(AtomicU64);

impl AtomicF64 {
    pub(crate) fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, v: f64) {
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }

    /// CAS-loop add. Refuses (and leaves the cell untouched) if the result
    /// would not be finite.
    pub(crate) fn add(&self, delta: f64) -> Result<()> {
        let mut current = self.0.load(Ordering::Relaxed);
        loop {
            let next = f64::from_bits(current) + delta;
            if !next.is_finite() {
                return Err(MetrixError::InvalidValue(format!(
                    "adding {delta} overflows the stored value"
                )));
            }
            match self.0.compare_exchange_weak(
                current,
                next.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }
}

pub(crate) fn ensure_finite(v: f64) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(MetrixError::InvalidValue(format!("{v} is not a finite number")))
    }
}
