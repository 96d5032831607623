use std::collections::BTreeMap;

use serde::Serialize;

/// Rectangular model x column table of scores in `[0, 1]`.
///
/// Used both for weighted group scores and for technology coverage. Columns
/// keep the order they were requested in; models are kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreTable {
    columns: Vec<String>,
    rows: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Weighted mean per (model, group).
pub type WeightedScoreTable = ScoreTable;
/// Covered fraction per (model, technology group).
pub type CoverageTable = ScoreTable;

impl ScoreTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, model: &str, column: &str, value: f64) {
        self.rows
            .entry(model.to_string())
            .or_default()
            .insert(column.to_string(), value);
    }

    pub fn get(&self, model: &str, column: &str) -> Option<f64> {
        self.rows.get(model)?.get(column).copied()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Models in name order.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn row(&self, model: &str) -> Option<&BTreeMap<String, f64>> {
        self.rows.get(model)
    }

    /// Values of one model in column order; missing cells read as 0.
    pub fn values(&self, model: &str) -> Vec<f64> {
        self.columns
            .iter()
            .map(|c| self.get(model, c).unwrap_or(0.0))
            .collect()
    }

    /// Unweighted mean across all columns (the "overall rating").
    pub fn mean(&self, model: &str) -> Option<f64> {
        if self.columns.is_empty() || !self.rows.contains_key(model) {
            return None;
        }
        let values = self.values(model);
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the listed columns, in the listed order.
    pub fn select(&self, columns: &[String]) -> Self {
        let mut out = Self::new(columns.to_vec());
        for (model, row) in &self.rows {
            for column in columns {
                if let Some(v) = row.get(column) {
                    out.insert(model, column, *v);
                }
            }
        }
        out
    }
}
