//! Shared application state for the metrix gateway.
//!
//! Owns the one `Registry` the handlers write into; tests can inject their own.
//! Also holds the process collector when `gateway.process_metrics` is on.

use std::sync::Arc;

use metrix_core::error::Result;
use metrix_core::Registry;

use crate::config::MetrixConfig;
use crate::obs::ProcessCollector;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: MetrixConfig,
    registry: Arc<Registry>,
    process: Option<ProcessCollector>,
}

impl AppState {
    /// Build application state with a fresh registry configured from `cfg`.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: MetrixConfig) -> Result<Self> {
        let registry = Registry::with_default_buckets(&cfg.registry.default_buckets)?;
        Ok(Self::with_registry(cfg, Arc::new(registry)))
    }

    pub fn with_registry(cfg: MetrixConfig, registry: Arc<Registry>) -> Self {
        let process = match cfg.gateway.process_metrics.then(ProcessCollector::new) {
            Some(Ok(collector)) => Some(collector),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "process metrics disabled");
                None
            }
            None => None,
        };
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                process,
            }),
        }
    }

    pub fn cfg(&self) -> &MetrixConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn process(&self) -> Option<&ProcessCollector> {
        self.inner.process.as_ref()
    }
}
