//! metrix gateway library entry.
//!
//! HTTP glue around `metrix-core`: strict YAML config, JSON ingestion
//! endpoints, the `/metrics` scrape endpoint, and request metrics for the
//! gateway itself. Consumed by the binary (`main.rs`) and integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
