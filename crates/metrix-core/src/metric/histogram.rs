//! Cumulative histograms.
//!
//! Bucket counts are stored cumulatively: an observation increments every
//! bucket whose upper bound is >= the value, not just the tightest one.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{MetrixError, Result};
use crate::series::SeriesStore;

use super::ensure_finite;

/// Bounds used when a histogram is created without explicit buckets.
pub const DEFAULT_BUCKETS: [f64; 5] = [0.1, 0.5, 1.0, 2.0, 5.0];

/// Bounds must be finite and strictly increasing (`+Inf` is implicit).
pub fn validate_bounds(bounds: &[f64]) -> Result<()> {
    if let Some(b) = bounds.iter().find(|b| !b.is_finite()) {
        return Err(MetrixError::InvalidDefinition(format!(
            "bucket bound {b} is not finite (+Inf is implicit)"
        )));
    }
    if bounds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(MetrixError::InvalidDefinition(
            "bucket bounds must be strictly increasing".into(),
        ));
    }
    Ok(())
}

/// Point-in-time copy of one histogram series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSample {
    /// Cumulative counts, index-aligned with the metric's bounds.
    pub cumulative: Vec<u64>,
    pub sum: f64,
    /// Total observations (the `+Inf` bucket).
    pub count: u64,
}

struct HistogramState {
    buckets: Box<[u64]>,
    sum: f64,
    count: u64,
}

/// One series. The mutex makes an observation all-or-nothing: readers never
/// see a bumped count without the matching buckets and sum.
pub(crate) struct HistogramCell {
    state: Mutex<HistogramState>,
}

impl HistogramCell {
    fn new(buckets: usize) -> Self {
        Self {
            state: Mutex::new(HistogramState {
                buckets: vec![0; buckets].into_boxed_slice(),
                sum: 0.0,
                count: 0,
            }),
        }
    }

    fn observe(&self, bounds: &[f64], value: f64) -> Result<()> {
        let mut st = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let sum = st.sum + value;
        if !sum.is_finite() {
            return Err(MetrixError::InvalidValue(format!(
                "observing {value} overflows the histogram sum"
            )));
        }

        let first = bounds.partition_point(|b| *b < value);
        for c in st.buckets.iter_mut().skip(first) {
            *c += 1;
        }
        st.sum = sum;
        st.count += 1;
        Ok(())
    }

    pub(crate) fn sample(&self) -> HistogramSample {
        let st = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        HistogramSample {
            cumulative: st.buckets.to_vec(),
            sum: st.sum,
            count: st.count,
        }
    }
}

/// Series store plus the bounds captured at creation time.
pub(crate) struct HistogramVec {
    bounds: Box<[f64]>,
    series: SeriesStore<HistogramCell>,
}

impl HistogramVec {
    pub(crate) fn new(bounds: Box<[f64]>, series: SeriesStore<HistogramCell>) -> Self {
        Self { bounds, series }
    }

    pub(crate) fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub(crate) fn series(&self) -> &SeriesStore<HistogramCell> {
        &self.series
    }
}

/// Handle to a registered histogram. Cheap to clone.
#[derive(Clone)]
pub struct Histogram {
    name: Arc<str>,
    vec: Arc<HistogramVec>,
}

impl Histogram {
    pub(crate) fn new(name: Arc<str>, vec: Arc<HistogramVec>) -> Self {
        Self { name, vec }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upper bounds, ascending, without the implicit `+Inf`.
    pub fn bounds(&self) -> &[f64] {
        self.vec.bounds()
    }

    pub fn observe(&self, labels: &[(&str, &str)], value: f64) -> Result<()> {
        ensure_finite(value)?;
        let bounds = self.vec.bounds();
        self.vec
            .series()
            .with_cell(labels, || HistogramCell::new(bounds.len()), |c| {
                c.observe(bounds, value)
            })?
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Result<Option<HistogramSample>> {
        self.vec.series().read(labels, HistogramCell::sample)
    }
}
