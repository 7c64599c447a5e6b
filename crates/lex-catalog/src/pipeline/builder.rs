//! Main catalog pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating repair, derivation, deduplication and aggregation.

use crate::aggregate::AggregationEngine;
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::dedup::DeduplicationFilter;
use crate::derive::{AgeGroupClassifier, FieldDeriver};
use crate::error::{Result, ResultExt};
use crate::ingest::records_from_dataframe;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::repair::FieldRepairer;
use crate::types::{ActionType, PipelineResult, RawRecord, RunAction, RunSummary};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The catalog pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use lex_catalog::{Pipeline, PipelineConfig, RepairPolicy};
///
/// let result = Pipeline::builder()
///     .config(
///         PipelineConfig::builder()
///             .repair_policy(RepairPolicy::Imputation)
///             .build()?,
///     )
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(&dataframe)?;
///
/// println!("{} records", result.records.len());
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    repairer: FieldRepairer,
    deriver: FieldDeriver,
    dedup: DeduplicationFilter,
    engine: AggregationEngine,
}

// Ensure Pipeline is Send (can be moved to another thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process an input frame through the pipeline.
    ///
    /// The frame is never modified. Returns the cleaned records, every
    /// aggregate view and a run summary, or the first terminating error.
    pub fn process(&self, df: &DataFrame) -> Result<PipelineResult> {
        self.finish(self.process_frame(df))
    }

    /// Process already-ingested raw records through the pipeline.
    pub fn process_records(&self, raw: &[RawRecord]) -> Result<PipelineResult> {
        self.finish(self.process_internal(raw, Instant::now()))
    }

    fn finish(&self, result: Result<PipelineResult>) -> Result<PipelineResult> {
        match result {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Pipeline completed: {} records",
                    result.records.len()
                )));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn process_frame(&self, df: &DataFrame) -> Result<PipelineResult> {
        let start_time = Instant::now();

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Ingesting,
            0.0,
            format!("Ingesting {} rows...", df.height()),
        ));
        info!("Ingesting {} rows x {} columns", df.height(), df.width());

        let raw = records_from_dataframe(df).context("During ingest")?;

        self.report_progress(ProgressUpdate::with_items(
            PipelineStage::Ingesting,
            raw.len(),
            raw.len(),
            "Ingest complete",
        ));

        self.process_internal(&raw, start_time)
    }

    fn process_internal(&self, raw: &[RawRecord], start_time: Instant) -> Result<PipelineResult> {
        let mut summary = RunSummary::new();
        summary.rows_before = raw.len();

        // Step 1: Field repair
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Repairing,
            0.0,
            "Repairing missing fields...",
        ));
        info!("Step 1: Repairing fields ({:?} policy)", self.config.repair_policy);

        let outcome = self.repairer.repair(raw).context("During field repair")?;
        let repaired_count = outcome.records.len();
        summary.add_issues(outcome.dropped);
        for action in outcome.actions {
            summary.add_action(action);
        }

        self.report_progress(ProgressUpdate::with_items(
            PipelineStage::Repairing,
            repaired_count,
            raw.len(),
            format!("Repaired {} of {} rows", repaired_count, raw.len()),
        ));

        // Step 2: Derived fields
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Deriving,
            0.0,
            "Deriving duration, date parts and age group...",
        ));
        info!("Step 2: Deriving fields for {} records", repaired_count);

        let (records, rejected) = self
            .deriver
            .derive_all(outcome.records, self.config.error_mode)
            .context("During derivation")?;

        if !rejected.is_empty() {
            summary.add_action(RunAction::new(
                ActionType::RecordsRejected,
                "duration",
                format!("Rejected {} records with unparsable durations", rejected.len()),
            ));
        }
        summary.add_issues(rejected);
        summary.add_action(RunAction::new(
            ActionType::FieldsDerived,
            "dataset",
            format!(
                "Derived duration_minutes, year_added, month_added and age_group for {} records",
                records.len()
            ),
        ));

        self.report_progress(ProgressUpdate::with_items(
            PipelineStage::Deriving,
            records.len(),
            repaired_count,
            "Derivation complete",
        ));

        // Step 3: Deduplication
        let records = if self.config.remove_duplicates {
            self.report_progress(ProgressUpdate::new(
                PipelineStage::Deduplicating,
                0.0,
                "Removing duplicate records...",
            ));
            info!("Step 3: Removing duplicate records");

            let (records, removed) = self.dedup.apply(records);
            summary.duplicates_removed = removed;
            if removed > 0 {
                summary.add_action(RunAction::new(
                    ActionType::DuplicatesRemoved,
                    "dataset",
                    format!("Removed {} duplicate records", removed),
                ));
            }

            self.report_progress(ProgressUpdate::new(
                PipelineStage::Deduplicating,
                1.0,
                format!("Removed {} duplicates", removed),
            ));
            records
        } else {
            info!("Step 3: Skipping duplicate removal (disabled)");
            records
        };

        // Step 4: Aggregation
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Aggregating,
            0.0,
            "Computing aggregate views...",
        ));
        info!("Step 4: Computing aggregate views over {} records", records.len());

        let views = self.engine.compute_all(&records, &self.config);

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Aggregating,
            1.0,
            "Aggregation complete",
        ));

        summary.rows_after = records.len();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        debug!(
            "Run summary: {} -> {} rows ({} dropped, {} duplicates)",
            summary.rows_before, summary.rows_after, summary.rows_dropped, summary.duplicates_removed
        );
        info!("Pipeline finished in {}ms", summary.duration_ms);

        Ok(PipelineResult {
            records,
            views,
            summary,
        })
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    classifier: Option<AgeGroupClassifier>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom rating classifier instead of the built-in table.
    pub fn classifier(mut self, classifier: AgeGroupClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let classifier = self.classifier.unwrap_or_default();

        Ok(Pipeline {
            repairer: FieldRepairer::new(config.repair_policy, config.error_mode),
            deriver: FieldDeriver::new(classifier, config.duration_policy),
            dedup: DeduplicationFilter,
            engine: AggregationEngine::from_config(&config),
            progress_reporter: self.progress_reporter,
            config,
        })
    }
}
