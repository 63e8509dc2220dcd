//! ES -> MR percentile lookup table.
//!
//! MR and ES both scale linearly with the shot dispersion, so the MR/ES ratio
//! distribution depends on the group size alone. One simulation per group size
//! is enough; every table cell is `ES * ratio_percentile(n)`.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use shotgroup_shared::config::TABLE_DECIMALS;
use shotgroup_shared::result::RatioPercentiles;

use crate::error::{Result, SimError};

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub es: f64,
    /// `(n_shots, [mr_p5, mr_p50, mr_p95])` in group-size order.
    pub cells: Vec<(usize, [f64; 3])>,
}

impl TableRow {
    pub fn key(&self) -> String {
        es_key(self.es)
    }

    pub fn get(&self, n_shots: usize) -> Option<[f64; 3]> {
        self.cells
            .iter()
            .find(|(n, _)| *n == n_shots)
            .map(|(_, cell)| *cell)
    }
}

/// Rows keep the order of the ES values they were built from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LookupTable {
    pub rows: Vec<TableRow>,
}

impl LookupTable {
    /// Cell for the ES key (`"1.0"`) and group size.
    pub fn get(&self, es: &str, n_shots: usize) -> Option<[f64; 3]> {
        self.rows
            .iter()
            .find(|row| row.key() == es)
            .and_then(|row| row.get(n_shots))
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }
}

struct Row<'a>(&'a [(usize, [f64; 3])]);

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (n_shots, cell) in self.0 {
            map.serialize_entry(&n_shots.to_string(), cell)?;
        }
        map.end()
    }
}

/// `{"0.1": {"3": [p5, p50, p95], ...}, ...}` with string keys in insertion order.
impl Serialize for LookupTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for row in &self.rows {
            map.serialize_entry(&row.key(), &Row(&row.cells))?;
        }
        map.end()
    }
}

#[inline]
pub fn es_key(es: f64) -> String {
    format!("{es:.1}")
}

/// Round to `decimals` places on the exact decimal expansion, ties to even.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

pub fn build_table(
    es_values: &[f64],
    group_sizes: &[usize],
    ratio_percentiles_by_n: &BTreeMap<usize, RatioPercentiles>,
) -> Result<LookupTable> {
    let mut ratios: Vec<(usize, [f64; 3])> = Vec::with_capacity(group_sizes.len());
    for &n_shots in group_sizes {
        let ratio = ratio_percentiles_by_n
            .get(&n_shots)
            .ok_or(SimError::MissingRatioPercentiles { n_shots })?;
        if !ratios.iter().any(|(n, _)| *n == n_shots) {
            ratios.push((n_shots, ratio.as_array()));
        }
    }

    // One row per ES key: a repeated key keeps its first position, the last
    // row's values win.
    let mut rows: Vec<TableRow> = Vec::with_capacity(es_values.len());
    for &es in es_values {
        let row = TableRow {
            es,
            cells: ratios
                .iter()
                .map(|&(n_shots, ratio)| {
                    (n_shots, ratio.map(|r| round_to(es * r, TABLE_DECIMALS)))
                })
                .collect(),
        };
        let key = row.key();
        match rows.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
    }

    Ok(LookupTable { rows })
}
