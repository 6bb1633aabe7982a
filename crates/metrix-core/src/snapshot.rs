//! Read-only copies of registry state, consumed by the encoder.

use crate::labels::LabelSet;
use crate::metric::{HistogramSample, MetricKind};

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSnapshot {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    /// Declaration order; series label values follow it.
    pub label_names: Vec<String>,
    /// Histogram upper bounds (without `+Inf`); `None` for counters/gauges.
    pub buckets: Option<Vec<f64>>,
    /// Sorted by label values.
    pub series: Vec<SeriesSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot {
    pub label_values: Vec<String>,
    pub value: SampleValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Scalar(f64),
    Histogram(HistogramSample),
}

impl From<(LabelSet, SampleValue)> for SeriesSnapshot {
    fn from((labels, value): (LabelSet, SampleValue)) -> Self {
        Self {
            label_values: labels.values().to_vec(),
            value,
        }
    }
}
