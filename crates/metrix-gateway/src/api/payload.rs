//! Request bodies and boundary validation.
//!
//! Everything the registry assumes (non-empty name/help, well-formed metric
//! and label names, string label values) is checked here, along with the
//! names the gateway reserves for its own metrics.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use metrix_core::error::{MetrixError, Result};

/// Body of `POST /api/metrics/{counter,gauge}`.
#[derive(Debug, Deserialize)]
pub struct UpdatePayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Body of `POST /api/metrics/histogram`.
#[derive(Debug, Deserialize)]
pub struct HistogramPayload {
    #[serde(flatten)]
    pub update: UpdatePayload,
    #[serde(default)]
    pub buckets: Option<Vec<f64>>,
}

/// A validated update, ready for the registry.
#[derive(Debug)]
pub struct MetricUpdate {
    pub name: String,
    pub help: String,
    /// Sorted by label name; label names are declared from these keys.
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl MetricUpdate {
    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn label_pairs(&self) -> Vec<(&str, &str)> {
        self.labels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl UpdatePayload {
    /// `default_value = None` makes `value` mandatory.
    pub fn validate(self, default_value: Option<f64>) -> Result<MetricUpdate> {
        let name = self.name.filter(|s| !s.is_empty());
        let help = self.help.filter(|s| !s.is_empty());
        let value = self.value.or(default_value);

        let (Some(name), Some(help), Some(value)) = (name, help, value) else {
            let msg = if default_value.is_some() {
                "name and help are required"
            } else {
                "name, help and value are required"
            };
            return Err(MetrixError::BadRequest(msg.into()));
        };

        validate_metric_name(&name)?;
        if crate::obs::is_reserved(&name) {
            return Err(MetrixError::BadRequest(format!(
                "metric name {name} is reserved by the gateway"
            )));
        }

        let mut labels = Vec::new();
        for (k, v) in self.labels.unwrap_or_default() {
            validate_label_name(&k)?;
            let v = label_value(&k, v)?;
            labels.push((k, v));
        }

        Ok(MetricUpdate {
            name,
            help,
            labels,
            value,
        })
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn validate_metric_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
    if ok {
        Ok(())
    } else {
        Err(MetrixError::BadRequest(format!("invalid metric name: {name}")))
    }
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, not starting with `__` (reserved).
pub fn validate_label_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with("__");
    if ok {
        Ok(())
    } else {
        Err(MetrixError::BadRequest(format!("invalid label name: {name}")))
    }
}

/// Strings pass through; numbers and booleans are stringified.
fn label_value(name: &str, v: Value) -> Result<String> {
    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(MetrixError::BadRequest(format!(
            "label {name}: value must be a string, number or boolean"
        ))),
    }
}
