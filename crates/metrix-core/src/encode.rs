//! Text exposition format encoder.
//!
//! Per metric: `# HELP`, `# TYPE`, then one line per series (histograms expand
//! into `_bucket` / `_sum` / `_count`). HELP/TYPE are written even when the
//! metric has no series yet. Numbers use the shortest decimal form that
//! round-trips (`3`, `0.8`), bucket bounds included.

use std::fmt::Write;

use crate::error::{MetrixError, Result};
use crate::snapshot::{MetricSnapshot, SampleValue};

/// Content type of [`encode`] output.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render a snapshot. Fails only on an unrepresentable (non-finite) value;
/// the registry is never touched.
pub fn encode(metrics: &[MetricSnapshot]) -> Result<String> {
    let mut out = String::new();
    for m in metrics {
        encode_metric(&mut out, m)?;
    }
    Ok(out)
}

fn encode_metric(out: &mut String, m: &MetricSnapshot) -> Result<()> {
    writeln!(out, "# HELP {} {}", m.name, escape_help(&m.help))?;
    writeln!(out, "# TYPE {} {}", m.name, m.kind)?;

    for s in &m.series {
        let pairs: Vec<(&str, &str)> = m
            .label_names
            .iter()
            .zip(&s.label_values)
            .map(|(n, v)| (n.as_str(), v.as_str()))
            .collect();

        match &s.value {
            SampleValue::Scalar(v) => {
                writeln!(out, "{}{} {}", m.name, render_labels(&pairs, None), number(*v)?)?;
            }
            SampleValue::Histogram(h) => {
                let bounds = m.buckets.as_deref().unwrap_or_default();
                if bounds.len() != h.cumulative.len() {
                    return Err(MetrixError::Internal(format!(
                        "histogram {}: {} bounds but {} bucket counts",
                        m.name,
                        bounds.len(),
                        h.cumulative.len()
                    )));
                }
                for (b, count) in bounds.iter().zip(&h.cumulative) {
                    let le = number(*b)?;
                    let labels = render_labels(&pairs, Some(("le", le.as_str())));
                    writeln!(out, "{}_bucket{} {}", m.name, labels, count)?;
                }
                let labels = render_labels(&pairs, Some(("le", "+Inf")));
                writeln!(out, "{}_bucket{} {}", m.name, labels, h.count)?;

                let labels = render_labels(&pairs, None);
                writeln!(out, "{}_sum{} {}", m.name, labels, number(h.sum)?)?;
                writeln!(out, "{}_count{} {}", m.name, labels, h.count)?;
            }
        }
    }
    Ok(())
}

/// `{a="x",b="y"}`, or empty when there is nothing to render.
fn render_labels(pairs: &[(&str, &str)], extra: Option<(&str, &str)>) -> String {
    if pairs.is_empty() && extra.is_none() {
        return String::new();
    }
    let mut parts: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect();
    if let Some((k, v)) = extra {
        parts.push(format!("{k}=\"{v}\""));
    }
    format!("{{{}}}", parts.join(","))
}

fn number(v: f64) -> Result<String> {
    if v.is_finite() {
        Ok(v.to_string())
    } else {
        Err(MetrixError::Internal(format!("cannot encode non-finite value {v}")))
    }
}

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}
