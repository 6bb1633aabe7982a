//! Metric registry: `name -> MetricDescriptor`.
//!
//! - Get-or-create is atomic per name: existing metrics are a `DashMap` read,
//!   creation runs under one registry-wide lock, so concurrent first callers
//!   converge on one descriptor.
//! - Each descriptor gets a creation sequence number; snapshots and encoding
//!   walk metrics in creation order.
//! - A histogram `h` also owns the sample names `h_bucket`, `h_sum` and
//!   `h_count`; no other metric may take them, in either creation order.
//! - Name and help non-emptiness is the caller's job (the HTTP layer checks it).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;

use crate::descriptor::{MetricDescriptor, Store};
use crate::encode;
use crate::error::{MetrixError, Result};
use crate::labels::LabelNames;
use crate::metric::histogram::{validate_bounds, HistogramVec, DEFAULT_BUCKETS};
use crate::metric::{Counter, Gauge, Histogram, MetricKind};
use crate::series::SeriesStore;
use crate::snapshot::MetricSnapshot;

/// Sample-name suffixes a histogram adds to its family name.
const HISTOGRAM_SUFFIXES: [&str; 3] = ["_bucket", "_sum", "_count"];

pub struct Registry {
    families: DashMap<String, Arc<MetricDescriptor>>,
    /// Held while creating, so the sample-name check and the insert are one step.
    create: Mutex<()>,
    seq: AtomicU64,
    default_buckets: Box<[f64]>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            families: DashMap::new(),
            create: Mutex::new(()),
            seq: AtomicU64::new(1),
            default_buckets: Box::new(DEFAULT_BUCKETS),
        }
    }

    /// Registry whose histograms default to `bounds` instead of [`DEFAULT_BUCKETS`].
    pub fn with_default_buckets(bounds: &[f64]) -> Result<Self> {
        validate_bounds(bounds)?;
        Ok(Self {
            default_buckets: bounds.into(),
            ..Self::new()
        })
    }

    pub fn default_buckets(&self) -> &[f64] {
        &self.default_buckets
    }

    pub fn get_or_create_counter(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
    ) -> Result<Counter> {
        let names = LabelNames::new(label_names)?;
        let desc = self.get_or_insert(name, help, MetricKind::Counter, &names, || {
            Store::Counter(Arc::new(SeriesStore::new(names.clone())))
        })?;
        match desc.store() {
            Store::Counter(series) => Ok(Counter::new(desc.shared_name(), Arc::clone(series))),
            _ => Err(kind_conflict(&desc, MetricKind::Counter)),
        }
    }

    pub fn get_or_create_gauge(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
    ) -> Result<Gauge> {
        let names = LabelNames::new(label_names)?;
        let desc = self.get_or_insert(name, help, MetricKind::Gauge, &names, || {
            Store::Gauge(Arc::new(SeriesStore::new(names.clone())))
        })?;
        match desc.store() {
            Store::Gauge(series) => Ok(Gauge::new(desc.shared_name(), Arc::clone(series))),
            _ => Err(kind_conflict(&desc, MetricKind::Gauge)),
        }
    }

    /// `bounds = None` uses the registry defaults on creation and accepts
    /// whatever bounds an existing histogram already has.
    pub fn get_or_create_histogram(
        &self,
        name: &str,
        help: &str,
        label_names: &[&str],
        bounds: Option<&[f64]>,
    ) -> Result<Histogram> {
        let names = LabelNames::new(label_names)?;
        if names.contains("le") {
            return Err(MetrixError::InvalidDefinition(format!(
                "histogram {name}: label name \"le\" is reserved"
            )));
        }
        if let Some(b) = bounds {
            validate_bounds(b)?;
        }

        let initial: Box<[f64]> = bounds.unwrap_or(self.default_buckets()).into();
        let desc = self.get_or_insert(name, help, MetricKind::Histogram, &names, || {
            Store::Histogram(Arc::new(HistogramVec::new(
                initial,
                SeriesStore::new(names.clone()),
            )))
        })?;
        let Store::Histogram(vec) = desc.store() else {
            return Err(kind_conflict(&desc, MetricKind::Histogram));
        };

        if let Some(b) = bounds {
            if vec.bounds() != b {
                return Err(MetrixError::ConfigConflict(format!(
                    "histogram {name} already registered with buckets {:?}, requested {:?}",
                    vec.bounds(),
                    b
                )));
            }
        }
        Ok(Histogram::new(desc.shared_name(), Arc::clone(vec)))
    }

    /// Look up `name`, creating it with `make` if absent. Label-set
    /// agreement is checked here; kind agreement is left to the caller's
    /// store match.
    fn get_or_insert(
        &self,
        name: &str,
        help: &str,
        kind: MetricKind,
        names: &LabelNames,
        make: impl FnOnce() -> Store,
    ) -> Result<Arc<MetricDescriptor>> {
        let existing = self.families.get(name).map(|r| Arc::clone(r.value()));
        let desc = match existing {
            Some(desc) => desc,
            None => {
                let _guard = self.create.lock().unwrap_or_else(PoisonError::into_inner);
                let raced = self.families.get(name).map(|r| Arc::clone(r.value()));
                match raced {
                    Some(desc) => desc,
                    None => {
                        self.check_sample_names(name, kind)?;
                        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                        let desc =
                            Arc::new(MetricDescriptor::new(Arc::from(name), help, seq, make()));
                        self.families.insert(name.to_string(), Arc::clone(&desc));
                        tracing::debug!(metric = %name, kind = %kind, seq, "metric registered");
                        desc
                    }
                }
            }
        };

        if desc.kind() == kind && !desc.label_names().same_set(names) {
            return Err(MetrixError::ConfigConflict(format!(
                "metric {name} already registered with labels [{}], requested [{}]",
                desc.label_names().as_slice().join(", "),
                names.as_slice().join(", ")
            )));
        }
        Ok(desc)
    }

    /// Reject a new metric whose exposed sample names would collide with an
    /// existing histogram's, or a new histogram whose suffixed names are taken.
    fn check_sample_names(&self, name: &str, kind: MetricKind) -> Result<()> {
        if kind == MetricKind::Histogram {
            for suffix in HISTOGRAM_SUFFIXES {
                let sample = format!("{name}{suffix}");
                if self.families.contains_key(&sample) {
                    return Err(MetrixError::ConfigConflict(format!(
                        "histogram {name} would expose {sample}, which is already registered"
                    )));
                }
            }
        }

        for suffix in HISTOGRAM_SUFFIXES {
            let Some(base) = name.strip_suffix(suffix) else {
                continue;
            };
            let owned_by_histogram = self
                .families
                .get(base)
                .is_some_and(|d| d.kind() == MetricKind::Histogram);
            if owned_by_histogram {
                return Err(MetrixError::ConfigConflict(format!(
                    "metric {name} collides with a sample of histogram {base}"
                )));
            }
        }
        Ok(())
    }

    /// Copy out every metric in creation order.
    ///
    /// Consistency is per value read: concurrent writers may update one series
    /// after another has already been copied, so the result is not a single
    /// instant across the registry.
    pub fn snapshot(&self) -> Vec<MetricSnapshot> {
        let mut descs: Vec<Arc<MetricDescriptor>> =
            self.families.iter().map(|r| Arc::clone(r.value())).collect();
        descs.sort_by_key(|d| d.seq());
        descs.iter().map(|d| d.snapshot()).collect()
    }

    /// Render the current snapshot in the text exposition format.
    pub fn encode(&self) -> Result<String> {
        encode::encode(&self.snapshot())
    }

    /// Drop every metric. Handles obtained earlier keep working but their
    /// updates no longer show up here.
    pub fn clear(&self) {
        self.families.clear();
        tracing::debug!("registry cleared");
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

fn kind_conflict(desc: &MetricDescriptor, requested: MetricKind) -> MetrixError {
    MetrixError::ConfigConflict(format!(
        "metric {} already registered as {}, requested {}",
        desc.name(),
        desc.kind(),
        requested
    ))
}
