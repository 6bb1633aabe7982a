use std::sync::Arc;

use crate::error::Result;
use crate::series::SeriesStore;

use super::{ensure_finite, AtomicF64};

pub(crate) type GaugeVec = SeriesStore<AtomicF64>;

/// Handle to a registered gauge. Cheap to clone.
#[derive(Clone)]
pub struct Gauge {
    name: Arc<str>,
    series: Arc<GaugeVec>,
}

impl Gauge {
    pub(crate) fn new(name: Arc<str>, series: Arc<GaugeVec>) -> Self {
        Self { name, series }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overwrite the series value.
    pub fn set(&self, labels: &[(&str, &str)], value: f64) -> Result<()> {
        ensure_finite(value)?;
        self.series
            .with_cell(labels, AtomicF64::default, |c| c.set(value))
    }

    /// Add a signed delta.
    pub fn add(&self, labels: &[(&str, &str)], delta: f64) -> Result<()> {
        ensure_finite(delta)?;
        self.series
            .with_cell(labels, AtomicF64::default, |c| c.add(delta))?
    }

    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) -> Result<()> {
        self.add(labels, 1.0)
    }

    /// Decrement by 1.
    pub fn dec(&self, labels: &[(&str, &str)]) -> Result<()> {
        self.add(labels, -1.0)
    }

    pub fn get(&self, labels: &[(&str, &str)]) -> Result<Option<f64>> {
        self.series.read(labels, AtomicF64::get)
    }
}
