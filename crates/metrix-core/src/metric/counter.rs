use std::sync::Arc;

use crate::error::{MetrixError, Result};
use crate::series::SeriesStore;

use super::{ensure_finite, AtomicF64};

pub(crate) type CounterVec = SeriesStore<AtomicF64>;

/// Handle to a registered counter. Cheap to clone.
#[derive(Clone)]
pub struct Counter {
    name: Arc<str>,
    series: Arc<CounterVec>,
}

impl Counter {
    pub(crate) fn new(name: Arc<str>, series: Arc<CounterVec>) -> Self {
        Self { name, series }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) -> Result<()> {
        self.inc_by(labels, 1.0)
    }

    /// Increment by `delta`, which must be finite and non-negative.
    pub fn inc_by(&self, labels: &[(&str, &str)], delta: f64) -> Result<()> {
        ensure_finite(delta)?;
        if delta < 0.0 {
            return Err(MetrixError::InvalidValue(format!(
                "counter {} cannot decrease (delta {delta})",
                self.name
            )));
        }
        self.series
            .with_cell(labels, AtomicF64::default, |c| c.add(delta))?
    }

    /// Current value of one series, `None` if it was never incremented.
    pub fn get(&self, labels: &[(&str, &str)]) -> Result<Option<f64>> {
        self.series.read(labels, AtomicF64::get)
    }
}
