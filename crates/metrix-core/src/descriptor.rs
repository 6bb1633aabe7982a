//! Metric identity plus ownership of its series store.

use std::sync::Arc;

use crate::labels::LabelNames;
use crate::metric::counter::CounterVec;
use crate::metric::gauge::GaugeVec;
use crate::metric::histogram::HistogramVec;
use crate::metric::MetricKind;
use crate::snapshot::{MetricSnapshot, SampleValue, SeriesSnapshot};

/// Type-specific series store owned by a descriptor.
pub(crate) enum Store {
    Counter(Arc<CounterVec>),
    Gauge(Arc<GaugeVec>),
    Histogram(Arc<HistogramVec>),
}

/// Immutable identity of a registered metric.
pub struct MetricDescriptor {
    name: Arc<str>,
    help: String,
    seq: u64,
    store: Store,
}

impl MetricDescriptor {
    pub(crate) fn new(name: Arc<str>, help: &str, seq: u64, store: Store) -> Self {
        Self {
            name,
            help: help.to_string(),
            seq,
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn kind(&self) -> MetricKind {
        match self.store {
            Store::Counter(_) => MetricKind::Counter,
            Store::Gauge(_) => MetricKind::Gauge,
            Store::Histogram(_) => MetricKind::Histogram,
        }
    }

    pub fn label_names(&self) -> &LabelNames {
        match &self.store {
            Store::Counter(s) | Store::Gauge(s) => s.label_names(),
            Store::Histogram(h) => h.series().label_names(),
        }
    }

    /// Histogram bounds, `None` for counters and gauges.
    pub fn buckets(&self) -> Option<&[f64]> {
        match &self.store {
            Store::Histogram(h) => Some(h.bounds()),
            _ => None,
        }
    }

    /// Creation order within the registry.
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    pub fn series_count(&self) -> usize {
        match &self.store {
            Store::Counter(s) | Store::Gauge(s) => s.len(),
            Store::Histogram(h) => h.series().len(),
        }
    }

    /// Copy out every series. Each series read is atomic; the set as a whole
    /// is not a single instant.
    pub fn snapshot(&self) -> MetricSnapshot {
        let series = match &self.store {
            Store::Counter(s) | Store::Gauge(s) => s
                .collect(|c| SampleValue::Scalar(c.get()))
                .into_iter()
                .map(SeriesSnapshot::from)
                .collect(),
            Store::Histogram(h) => h
                .series()
                .collect(|c| SampleValue::Histogram(c.sample()))
                .into_iter()
                .map(SeriesSnapshot::from)
                .collect(),
        };

        MetricSnapshot {
            name: self.name.to_string(),
            help: self.help.clone(),
            kind: self.kind(),
            label_names: self.label_names().as_slice().to_vec(),
            buckets: self.buckets().map(<[f64]>::to_vec),
            series,
        }
    }
}
