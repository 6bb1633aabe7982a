//! metrix core: in-process metrics registry and text exposition encoder.
//!
//! Producers obtain typed handles from a [`Registry`] (get-or-create by name)
//! and record counter increments, gauge values, and histogram observations
//! against concrete label values. [`Registry::encode`] renders the current
//! state in the pull-scrape text format. The crate carries no transport or
//! runtime dependencies; the HTTP layer lives in `metrix-gateway`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every rejected update surfaces as `MetrixError` before any state changes.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod descriptor;
pub mod encode;
pub mod error;
pub mod labels;
pub mod metric;
pub mod registry;
pub mod series;
pub mod snapshot;

pub use descriptor::MetricDescriptor;
pub use encode::{encode, CONTENT_TYPE};
pub use error::{ClientCode, MetrixError, Result};
pub use labels::{LabelNames, LabelSet};
pub use metric::{
    validate_bounds, Counter, Gauge, Histogram, HistogramSample, MetricKind, DEFAULT_BUCKETS,
};
pub use registry::Registry;
pub use snapshot::{MetricSnapshot, SampleValue, SeriesSnapshot};
