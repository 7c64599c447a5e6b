//! Shared utilities for the catalog pipeline.
//!
//! This module contains helpers used by both repair and aggregation so that
//! blank handling and frequency ordering stay consistent.

use crate::aggregate::LabelCount;
use std::collections::HashMap;

// =============================================================================
// Cell Utilities
// =============================================================================

/// Normalize a raw text cell: blank or whitespace-only text is missing.
///
/// Non-blank text is kept verbatim, surrounding whitespace included.
pub fn normalize_cell(value: Option<&str>) -> Option<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Some(text.to_string()),
        _ => None,
    }
}

// =============================================================================
// Frequency Utilities
// =============================================================================

/// Count labels, most frequent first.
///
/// Labels with equal counts keep the order in which they were first
/// encountered, which makes every frequency table deterministic.
pub fn value_counts<'a, I>(values: I) -> Vec<LabelCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<LabelCount> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                index.insert(value, counts.len());
                counts.push(LabelCount::new(value, 1));
            }
        }
    }

    // stable: ties stay in first-encountered order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Most frequent non-missing value, ties broken by first encounter.
pub fn column_mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    value_counts(values.into_iter().flatten())
        .into_iter()
        .next()
        .map(|entry| entry.label)
}

// =============================================================================
// Tests
// =============================================================================
