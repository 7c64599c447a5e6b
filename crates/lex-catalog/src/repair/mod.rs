//! Field repair for raw catalog records.
//!
//! This module fills or drops missing values according to a
//! [`RepairPolicy`]:
//! - Lenient: placeholders for director, cast and country; records missing
//!   date_added, rating or duration are removed
//! - Imputation: placeholders for director, cast, date_added and rating;
//!   country is filled with its mode
//!
//! Records missing a duration are removed under both policies. Records with
//! an unusable type, title or release year are faults handled per
//! [`ErrorMode`].

mod fill;

pub use fill::{ColumnFill, FillPlan, FillSource};

use crate::config::{ErrorMode, RepairPolicy};
use crate::error::{CatalogError, Result};
use crate::types::{
    ActionType, ContentType, RawRecord, RecordIssue, RepairedRecord, RunAction,
};
use tracing::{debug, info, warn};

/// Placeholder for missing director, cast or country, and missing rating.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

/// Placeholder for missing cast under the imputation policy.
pub const NO_DATA_PLACEHOLDER: &str = "No Data";

/// Sentinel stored in `date_added` when the title was never listed.
pub const DATE_NOT_ADDED: &str = "No";

/// Stage name used in issues and error context.
pub const STAGE: &str = "repair";

/// Result of repairing a record set.
#[derive(Debug, Clone, Default)]
pub struct RepairOutcome {
    /// Repaired records in input order.
    pub records: Vec<RepairedRecord>,
    /// Records removed by policy or rejected as faulty.
    pub dropped: Vec<RecordIssue>,
    /// Fill and drop actions, for the run summary.
    pub actions: Vec<RunAction>,
}

/// Repairs missing fields of raw records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRepairer {
    policy: RepairPolicy,
    error_mode: ErrorMode,
}

impl FieldRepairer {
    /// Create a repairer.
    pub fn new(policy: RepairPolicy, error_mode: ErrorMode) -> Self {
        Self { policy, error_mode }
    }

    /// Repair a raw record set.
    ///
    /// The input is only read; repaired records are new values. Row indices
    /// in issues and errors are positions in `raw`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::EmptyColumn`] when country imputation has no values
    /// - record faults under [`ErrorMode::Strict`]
    pub fn repair(&self, raw: &[RawRecord]) -> Result<RepairOutcome> {
        info!(
            "Repairing {} records with {:?} policy",
            raw.len(),
            self.policy
        );

        let mut outcome = RepairOutcome::default();
        let mut policy_drops = 0usize;
        let mut kept: Vec<(usize, &RawRecord, ContentType, String, i64)> = Vec::new();

        for (row, record) in raw.iter().enumerate() {
            if let Some(column) = self.policy_drop_column(record) {
                debug!("Row {}: removing record missing '{}'", row, column);
                outcome.dropped.push(RecordIssue::new(
                    row,
                    STAGE,
                    format!("MISSING_{}", column.to_ascii_uppercase()),
                    format!("Row {}: '{}' is missing", row, column),
                ));
                policy_drops += 1;
                continue;
            }

            match Self::required_fields(row, record) {
                Ok((content_type, title, release_year)) => {
                    kept.push((row, record, content_type, title, release_year))
                }
                Err(e) if self.error_mode == ErrorMode::Lenient => {
                    warn!("Dropping row {}: {}", row, e);
                    outcome.dropped.push(RecordIssue::from_error(row, STAGE, &e));
                }
                Err(e) => return Err(e),
            }
        }

        let survivors: Vec<&RawRecord> = kept.iter().map(|(_, r, ..)| *r).collect();
        let plan = FillPlan::for_policy(self.policy, &survivors)?;
        let mut filled = FillCounts::default();

        for (row, record, content_type, title, release_year) in kept {
            outcome.records.push(RepairedRecord {
                source_row: row,
                content_type,
                title,
                director: fill_value(&record.director, &plan.director, &mut filled.director),
                cast: fill_value(&record.cast, &plan.cast, &mut filled.cast),
                country: fill_value(&record.country, &plan.country, &mut filled.country),
                date_added: fill_optional(&record.date_added, plan.date_added.as_ref(), &mut filled.date_added),
                release_year,
                rating: fill_optional(&record.rating, plan.rating.as_ref(), &mut filled.rating),
                // policy drops guarantee a duration here
                duration: record.duration.clone().unwrap_or_default(),
                listed_in: record.listed_in.clone().unwrap_or_default(),
                description: record.description.clone().unwrap_or_default(),
            });
        }

        outcome.actions = filled.into_actions(&plan);
        if policy_drops > 0 {
            outcome.actions.push(RunAction::new(
                ActionType::RowsRemoved,
                "dataset",
                format!("Removed {} records missing a required field", policy_drops),
            ));
        }
        let rejected = outcome.dropped.len() - policy_drops;
        if rejected > 0 {
            outcome.actions.push(RunAction::new(
                ActionType::RecordsRejected,
                "dataset",
                format!("Rejected {} faulty records", rejected),
            ));
        }

        info!(
            "Repair complete: {} kept, {} dropped",
            outcome.records.len(),
            outcome.dropped.len()
        );
        Ok(outcome)
    }

    /// Column whose absence removes the record under the current policy.
    fn policy_drop_column(&self, record: &RawRecord) -> Option<&'static str> {
        if self.policy == RepairPolicy::Lenient {
            if record.date_added.is_none() {
                return Some("date_added");
            }
            if record.rating.is_none() {
                return Some("rating");
            }
        }
        if record.duration.is_none() {
            return Some("duration");
        }
        None
    }

    fn required_fields(row: usize, record: &RawRecord) -> Result<(ContentType, String, i64)> {
        let missing = |column: &str| CatalogError::MissingRequiredField {
            row,
            column: column.to_string(),
        };

        let content_type = record
            .content_type
            .as_deref()
            .ok_or_else(|| missing("type"))
            .and_then(|value| ContentType::parse(value, row))?;
        let title = record.title.clone().ok_or_else(|| missing("title"))?;
        let release_year = record.release_year.ok_or_else(|| missing("release_year"))?;

        Ok((content_type, title, release_year))
    }
}

fn fill_value(value: &Option<String>, fill: &ColumnFill, counter: &mut usize) -> String {
    match value {
        Some(v) => v.clone(),
        None => {
            *counter += 1;
            fill.value.clone()
        }
    }
}

fn fill_optional(value: &Option<String>, fill: Option<&ColumnFill>, counter: &mut usize) -> String {
    match (value, fill) {
        (Some(v), _) => v.clone(),
        (None, Some(fill)) => {
            *counter += 1;
            fill.value.clone()
        }
        // records missing a column without a fill were removed by policy
        (None, None) => String::new(),
    }
}

#[derive(Debug, Default)]
struct FillCounts {
    director: usize,
    cast: usize,
    country: usize,
    date_added: usize,
    rating: usize,
}

impl FillCounts {
    fn into_actions(self, plan: &FillPlan) -> Vec<RunAction> {
        let columns = [
            ("director", self.director, Some(&plan.director)),
            ("cast", self.cast, Some(&plan.cast)),
            ("country", self.country, Some(&plan.country)),
            ("date_added", self.date_added, plan.date_added.as_ref()),
            ("rating", self.rating, plan.rating.as_ref()),
        ];

        columns
            .into_iter()
            .filter(|(_, count, _)| *count > 0)
            .filter_map(|(column, count, fill)| fill.map(|fill| (column, count, fill)))
            .map(|(column, count, fill)| {
                let (action_type, method) = match fill.source {
                    FillSource::Constant => (ActionType::ValueFilled, "constant"),
                    FillSource::Mode => (ActionType::ValueImputed, "mode"),
                };
                RunAction::new(
                    action_type,
                    column,
                    format!(
                        "Filled {} missing '{}' with {}: '{}'",
                        count, column, method, fill.value
                    ),
                )
            })
            .collect()
    }
}
