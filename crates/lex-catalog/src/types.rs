use crate::aggregate::AggregateViews;
use crate::derive::{AgeGroup, DateParts, Duration};
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Record Types
// ============================================================================

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl ContentType {
    /// All variants in column order.
    pub const ALL: [ContentType; 2] = [ContentType::Movie, ContentType::TvShow];

    /// Label as it appears in catalog data.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::TvShow => "TV Show",
        }
    }

    /// Parse a raw `type` cell.
    ///
    /// `row` is only used to locate the record in the returned error.
    pub fn parse(value: &str, row: usize) -> Result<Self> {
        match value.trim() {
            "Movie" => Ok(Self::Movie),
            "TV Show" | "TVShow" => Ok(Self::TvShow),
            other => Err(CatalogError::UnmappedType {
                row,
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One catalog row exactly as ingested.
///
/// Every field is optional; blank cells are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<i64>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    pub description: Option<String>,
}

/// A record after field repair: every repair column holds a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepairedRecord {
    /// Zero-based index of the source row.
    pub source_row: usize,
    pub content_type: ContentType,
    pub title: String,
    pub director: String,
    pub cast: String,
    pub country: String,
    /// Either a "Month Day, Year" date or the [`DATE_NOT_ADDED`](crate::repair::DATE_NOT_ADDED) sentinel.
    pub date_added: String,
    pub release_year: i64,
    pub rating: String,
    pub duration: String,
    pub listed_in: String,
    pub description: String,
}

/// A cleaned, enriched catalog record.
///
/// Equality and hashing cover every raw and derived field, which is what
/// deduplication compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub content_type: ContentType,
    pub title: String,
    pub director: String,
    pub cast: String,
    pub country: String,
    pub date_added: String,
    pub release_year: i64,
    pub rating: String,
    pub duration: String,
    pub listed_in: String,
    pub description: String,
    pub parsed_duration: Duration,
    pub date_parts: DateParts,
    pub age_group: AgeGroup,
}

impl Record {
    /// Duration in minutes, `None` for season counts and unknown durations.
    pub fn duration_minutes(&self) -> Option<f64> {
        self.parsed_duration.minutes()
    }

    /// Year the title was added, `None` when it was never listed.
    pub fn year_added(&self) -> Option<&str> {
        self.date_parts.year_added.as_deref()
    }

    /// Month label the title was added, empty when it was never listed.
    pub fn month_added(&self) -> &str {
        &self.date_parts.month_added
    }

    /// Genre labels split on the catalog delimiter.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.listed_in
            .split(", ")
            .filter(|genre| !genre.is_empty())
    }
}

// ============================================================================
// Run Summary Types
// ============================================================================

/// A record dropped during the run, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordIssue {
    /// Zero-based index of the source row.
    pub row: usize,
    /// Stage that rejected the record.
    pub stage: String,
    /// Machine-readable reason.
    pub code: String,
    /// Human-readable reason.
    pub message: String,
}

impl RecordIssue {
    /// Create a new issue.
    pub fn new(
        row: usize,
        stage: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            stage: stage.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build an issue from a record-level error.
    pub fn from_error(row: usize, stage: impl Into<String>, error: &CatalogError) -> Self {
        Self::new(row, stage, error.error_code(), error.to_string())
    }
}

/// Human-readable summary of what the pipeline did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows received.
    pub rows_before: usize,
    /// Number of records in the cleaned dataset.
    pub rows_after: usize,
    /// Number of rows dropped by repair policy or lenient error handling.
    pub rows_dropped: usize,
    /// Number of exact duplicates collapsed.
    pub duplicates_removed: usize,

    /// List of actions taken during the run.
    pub actions: Vec<RunAction>,

    /// Every record dropped during the run.
    pub issues: Vec<RecordIssue>,
}

impl RunSummary {
    /// Create a new empty summary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action to the summary.
    pub fn add_action(&mut self, action: RunAction) {
        self.actions.push(action);
    }

    /// Record dropped rows and their reasons.
    pub fn add_issues(&mut self, issues: impl IntoIterator<Item = RecordIssue>) {
        let before = self.issues.len();
        self.issues.extend(issues);
        self.rows_dropped += self.issues.len() - before;
    }

    /// Calculate the percentage of rows dropped or collapsed.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.rows_before == 0 {
            0.0
        } else {
            let removed = self.rows_dropped + self.duplicates_removed;
            (removed as f32 / self.rows_before as f32) * 100.0
        }
    }
}

/// A single action taken during the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAction {
    /// Type of action performed.
    pub action_type: ActionType,
    /// Target of the action (column name or "dataset").
    pub target: String,
    /// Human-readable description of the action.
    pub description: String,
}

impl RunAction {
    /// Create a new action.
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
        }
    }
}

/// Types of actions taken during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Missing values were replaced with a placeholder.
    ValueFilled,
    /// Missing values were replaced with the column mode.
    ValueImputed,
    /// Rows were removed by the repair policy.
    RowsRemoved,
    /// Faulty records were dropped in lenient mode.
    RecordsRejected,
    /// Derived fields were computed.
    FieldsDerived,
    /// Duplicate records were removed.
    DuplicatesRemoved,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ValueFilled => "Value Filled",
            Self::ValueImputed => "Value Imputed",
            Self::RowsRemoved => "Rows Removed",
            Self::RecordsRejected => "Records Rejected",
            Self::FieldsDerived => "Fields Derived",
            Self::DuplicatesRemoved => "Duplicates Removed",
        }
    }
}

/// Output of a successful pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// The cleaned record set, in first-appearance order.
    pub records: Vec<Record>,
    /// Every named aggregate view.
    pub views: AggregateViews,
    /// What the run did.
    pub summary: RunSummary,
}

impl PipelineResult {
    /// The cleaned records as a frame, derived columns included.
    pub fn to_dataframe(&self) -> polars::prelude::PolarsResult<polars::prelude::DataFrame> {
        crate::ingest::records_to_dataframe(&self.records)
    }
}

// ============================================================================
// Tests
// ============================================================================
