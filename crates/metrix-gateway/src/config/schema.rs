use std::net::SocketAddr;

use metrix_core::error::{MetrixError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetrixConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub registry: RegistrySection,
}

impl Default for MetrixConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            registry: RegistrySection::default(),
        }
    }
}

impl MetrixConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetrixError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.gateway.validate()?;
        self.registry.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Record `http_requests_total` / `http_request_duration_seconds`.
    #[serde(default = "default_http_metrics")]
    pub http_metrics: bool,

    /// Refresh `process_*` metrics (CPU time, memory) on every scrape.
    #[serde(default = "default_process_metrics")]
    pub process_metrics: bool,

    /// `project_name` label on the request metrics and `up`.
    #[serde(default = "default_project_name")]
    pub project_name: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            http_metrics: default_http_metrics(),
            process_metrics: default_process_metrics(),
            project_name: default_project_name(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if self.project_name.is_empty() {
            return Err(MetrixError::BadRequest(
                "gateway.project_name must not be empty".into(),
            ));
        }
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MetrixError::BadRequest(format!(
                "gateway.listen must be a valid socket address ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:3007".into()
}
fn default_http_metrics() -> bool {
    true
}
fn default_process_metrics() -> bool {
    true
}
fn default_project_name() -> String {
    crate::ops::SERVICE_NAME.into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    /// Histogram bounds used when a request does not send its own.
    #[serde(default = "default_buckets")]
    pub default_buckets: Vec<f64>,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            default_buckets: default_buckets(),
        }
    }
}

impl RegistrySection {
    pub fn validate(&self) -> Result<()> {
        metrix_core::validate_bounds(&self.default_buckets).map_err(|e| {
            MetrixError::BadRequest(format!("registry.default_buckets: {e}"))
        })
    }
}

fn default_buckets() -> Vec<f64> {
    metrix_core::DEFAULT_BUCKETS.to_vec()
}
