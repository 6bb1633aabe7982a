//! Per-metric series storage.
//!
//! `LabelSet -> cell`, created lazily on first update and never removed.
//! Creation goes through the `DashMap` entry API, so two writers racing on a
//! new label set converge on one cell. Lookups for existing series only take a
//! shard read lock.

use dashmap::DashMap;

use crate::error::Result;
use crate::labels::{LabelNames, LabelSet};

pub struct SeriesStore<C> {
    names: LabelNames,
    map: DashMap<LabelSet, C>,
}

impl<C> SeriesStore<C> {
    pub fn new(names: LabelNames) -> Self {
        Self {
            names,
            map: DashMap::new(),
        }
    }

    pub fn label_names(&self) -> &LabelNames {
        &self.names
    }

    /// Resolve `labels`, get-or-create the series, and run `f` on its cell.
    ///
    /// Label validation happens before anything is inserted.
    pub fn with_cell<R>(
        &self,
        labels: &[(&str, &str)],
        init: impl FnOnce() -> C,
        f: impl FnOnce(&C) -> R,
    ) -> Result<R> {
        let key = self.names.resolve(labels)?;

        if let Some(cell) = self.map.get(&key) {
            return Ok(f(cell.value()));
        }

        let cell = self.map.entry(key).or_insert_with(init).downgrade();
        Ok(f(cell.value()))
    }

    /// Run `f` on an existing series. `Ok(None)` when it was never written.
    pub fn read<R>(&self, labels: &[(&str, &str)], f: impl FnOnce(&C) -> R) -> Result<Option<R>> {
        let key = self.names.resolve(labels)?;
        Ok(self.map.get(&key).map(|cell| f(cell.value())))
    }

    /// Read every series, sorted by label values.
    ///
    /// Each cell is read on its own; writers may land between two cells.
    pub fn collect<R>(&self, mut f: impl FnMut(&C) -> R) -> Vec<(LabelSet, R)> {
        let mut out: Vec<(LabelSet, R)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), f(r.value())))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
