//! Label declarations and resolved label sets.
//!
//! A metric declares its label names once. Every update resolves the caller's
//! `(name, value)` pairs against that declaration into a [`LabelSet`]: the
//! tuple of values in declaration order, which is what series are keyed by.

use std::sync::Arc;

use crate::error::{MetrixError, Result};

/// Declared label names of one metric, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelNames(Arc<[String]>);

impl LabelNames {
    /// Validate a label-name declaration (non-empty, no duplicates).
    pub fn new(names: &[&str]) -> Result<Self> {
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(MetrixError::InvalidDefinition(
                    "label name must not be empty".into(),
                ));
            }
            if names[..i].contains(name) {
                return Err(MetrixError::InvalidDefinition(format!(
                    "duplicate label name: {name}"
                )));
            }
        }
        Ok(Self(names.iter().map(|n| n.to_string()).collect()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }

    /// True when both declare the same names, ignoring order.
    pub fn same_set(&self, other: &LabelNames) -> bool {
        // Declarations never hold duplicates, so equal length + inclusion is set equality.
        self.len() == other.len() && other.0.iter().all(|n| self.contains(n))
    }

    /// Resolve caller-supplied pairs into the canonical label set.
    ///
    /// The pairs must name every declared label exactly once and nothing else.
    pub fn resolve(&self, labels: &[(&str, &str)]) -> Result<LabelSet> {
        if labels.len() != self.len() {
            return Err(self.mismatch(labels));
        }

        let mut slots: Vec<Option<&str>> = vec![None; self.len()];
        for (name, value) in labels {
            let idx = self.position(name).ok_or_else(|| self.mismatch(labels))?;
            if slots[idx].replace(*value).is_some() {
                return Err(MetrixError::LabelMismatch(format!(
                    "label {name} supplied more than once"
                )));
            }
        }

        Ok(LabelSet(slots.into_iter().flatten().map(str::to_string).collect()))
    }

    fn mismatch(&self, labels: &[(&str, &str)]) -> MetrixError {
        let got: Vec<&str> = labels.iter().map(|(k, _)| *k).collect();
        MetrixError::LabelMismatch(format!(
            "expected labels [{}], got [{}]",
            self.0.join(", "),
            got.join(", ")
        ))
    }
}

/// Label values of one series, in declaration order of the owning metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelSet(Box<[String]>);

impl LabelSet {
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Pair the values back up with their declared names.
    pub fn pairs<'a>(&'a self, names: &'a LabelNames) -> impl Iterator<Item = (&'a str, &'a str)> {
        names
            .as_slice()
            .iter()
            .zip(self.0.iter())
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
