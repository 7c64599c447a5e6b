//! Media Catalog Normalization Library
//!
//! Cleans a tabular catalog of movies and TV shows and computes the summary
//! views an exploratory dashboard is built from, using Rust and Polars.
//!
//! # Overview
//!
//! A run chains pure stages, each consuming the full output of the previous
//! one:
//!
//! - **Field Repair**: fills or drops missing values per column under a
//!   [`RepairPolicy`]
//! - **Derivation**: parses durations, splits the added date into year and
//!   month, and maps rating codes to audience categories
//! - **Deduplication**: removes exact duplicate records, keeping the first
//! - **Aggregation**: counts per year, type, genre, rating, country and
//!   description token
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_catalog::{ingest, Pipeline, PipelineConfig, RepairPolicy};
//!
//! let df = ingest::read_csv("catalog.csv")?;
//!
//! let config = PipelineConfig::builder()
//!     .repair_policy(RepairPolicy::Imputation)
//!     .top_n(10)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(&df)?;
//!
//! for genre in &result.views.top_genres {
//!     println!("{}: {}", genre.label, genre.count);
//! }
//! ```
//!
//! # Errors
//!
//! By default the first faulty record aborts the run with an error naming
//! the row and stage. With [`ErrorMode::Lenient`] faulty records are dropped
//! and listed in [`RunSummary::issues`] instead.

pub mod aggregate;
pub mod config;
pub mod dedup;
pub mod derive;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod repair;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use aggregate::{
    AggregateViews, AggregationEngine, DurationPoint, LabelCount, Pivot, YearCount,
};
pub use config::{
    ConfigValidationError, DurationPolicy, ErrorMode, PipelineConfig, PipelineConfigBuilder,
    RepairPolicy,
};
pub use dedup::DeduplicationFilter;
pub use derive::{AgeGroup, AgeGroupClassifier, DateParts, Duration, FieldDeriver};
pub use error::{CatalogError, Result as CatalogResult, ResultExt};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage, ProgressReporter,
    ProgressUpdate,
};
pub use repair::{FieldRepairer, RepairOutcome};
pub use types::{
    ActionType, ContentType, PipelineResult, RawRecord, Record, RecordIssue, RepairedRecord,
    RunAction, RunSummary,
};
pub use utils::{column_mode, normalize_cell, value_counts};
