//! Two-level count tables pivoted into rows and columns.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;
use std::hash::Hash;

/// Counts of (row, column) pairs, zeros filled for absent combinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pivot {
    /// Name of the row dimension, e.g. `"country"`.
    pub index_name: String,
    /// Row labels, highest total first.
    pub row_labels: Vec<String>,
    /// Column labels, in the column type's natural order.
    pub column_labels: Vec<String>,
    /// `cells[row][column]` counts.
    pub cells: Vec<Vec<usize>>,
}

impl Pivot {
    /// Count `(row, column)` pairs and keep the `top_n` rows by total.
    ///
    /// Rows are ranked by total count descending, ties by row label
    /// ascending. Columns are every column key present in the data, in
    /// `Ord` order.
    pub fn from_pairs<'a, K, I>(index_name: &str, pairs: I, top_n: usize) -> Self
    where
        K: Ord + Hash + Copy + Display,
        I: IntoIterator<Item = (&'a str, K)>,
    {
        let mut totals: HashMap<&'a str, usize> = HashMap::new();
        let mut counts: HashMap<(&'a str, K), usize> = HashMap::new();
        let mut columns: BTreeSet<K> = BTreeSet::new();

        for (row, column) in pairs {
            *totals.entry(row).or_insert(0) += 1;
            *counts.entry((row, column)).or_insert(0) += 1;
            columns.insert(column);
        }

        let mut ranked: Vec<(&'a str, usize)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(top_n);

        let cells = ranked
            .iter()
            .map(|(row, _)| {
                columns
                    .iter()
                    .map(|column| counts.get(&(*row, *column)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            index_name: index_name.to_string(),
            row_labels: ranked.iter().map(|(row, _)| row.to_string()).collect(),
            column_labels: columns.iter().map(|c| c.to_string()).collect(),
            cells,
        }
    }

    /// Count for a row and column label, `None` if either is absent.
    pub fn get(&self, row: &str, column: &str) -> Option<usize> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.column_labels.iter().position(|l| l == column)?;
        Some(self.cells[r][c])
    }

    /// Sum of a row across all columns.
    pub fn row_total(&self, row: &str) -> Option<usize> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        Some(self.cells[r].iter().sum())
    }

    /// Whether the pivot has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    /// Export as a DataFrame: one index column plus one count column per
    /// column label.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.column_labels.len() + 1);
        columns.push(Column::new(
            self.index_name.as_str().into(),
            self.row_labels.clone(),
        ));

        for (c, label) in self.column_labels.iter().enumerate() {
            let values: Vec<u64> = self.cells.iter().map(|row| row[c] as u64).collect();
            columns.push(Column::new(label.as_str().into(), values));
        }

        DataFrame::new(columns)
    }
}
