//! Configuration types for the catalog pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};

/// Policy for repairing missing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RepairPolicy {
    /// Fill director, cast and country with "Unknown"; drop rows missing
    /// date_added, rating or duration.
    #[default]
    Lenient,
    /// Fill director with "Unknown", cast with "No Data", country with the
    /// column mode, date_added with "No" and rating with "Unknown".
    Imputation,
}

/// Policy for turning duration text into minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DurationPolicy {
    /// Season-count durations never yield minutes.
    #[default]
    SeasonsAsNull,
    /// Every digit run is taken as minutes, season texts included.
    RawMagnitude,
}

/// How record-level faults are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ErrorMode {
    /// Abort the run on the first faulty record.
    #[default]
    Strict,
    /// Drop the faulty record, report it in the run summary and continue.
    Lenient,
}

/// Configuration for the catalog pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_catalog::config::{PipelineConfig, RepairPolicy};
///
/// let config = PipelineConfig::builder()
///     .repair_policy(RepairPolicy::Imputation)
///     .top_countries(5)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Policy for filling or dropping missing values.
    /// Default: Lenient
    pub repair_policy: RepairPolicy,

    /// Policy for season-count durations.
    /// Default: SeasonsAsNull
    pub duration_policy: DurationPolicy,

    /// Handling of record-level faults.
    /// Default: Strict
    pub error_mode: ErrorMode,

    /// Whether to collapse exact duplicate records.
    /// Default: true
    pub remove_duplicates: bool,

    /// Number of genres in the top-genres view.
    /// Default: 10
    pub top_genres: usize,

    /// Number of countries kept in the country pivots.
    /// Default: 10
    pub top_countries: usize,

    /// Number of rating codes in the rating view.
    /// Default: 10
    pub top_ratings: usize,

    /// Stop words removed from description tokens.
    /// If None, the built-in English set is used.
    /// Default: None
    pub stop_words: Option<Vec<String>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            repair_policy: RepairPolicy::default(),
            duration_policy: DurationPolicy::default(),
            error_mode: ErrorMode::default(),
            remove_duplicates: true,
            top_genres: 10,
            top_countries: 10,
            top_ratings: 10,
            stop_words: None,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("top_genres", self.top_genres),
            ("top_countries", self.top_countries),
            ("top_ratings", self.top_ratings),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::InvalidTopN {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if let Some(words) = &self.stop_words
            && let Some(word) = words.iter().find(|w| w.trim().is_empty())
        {
            return Err(ConfigValidationError::InvalidStopWord(word.clone()));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidTopN { field: String, value: usize },

    #[error("Invalid stop word '{0}' (must not be blank)")]
    InvalidStopWord(String),
}

impl From<ConfigValidationError> for crate::error::CatalogError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::CatalogError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    repair_policy: Option<RepairPolicy>,
    duration_policy: Option<DurationPolicy>,
    error_mode: Option<ErrorMode>,
    remove_duplicates: Option<bool>,
    top_genres: Option<usize>,
    top_countries: Option<usize>,
    top_ratings: Option<usize>,
    stop_words: Option<Vec<String>>,
}

impl PipelineConfigBuilder {
    /// Set the policy for repairing missing fields.
    pub fn repair_policy(mut self, policy: RepairPolicy) -> Self {
        self.repair_policy = Some(policy);
        self
    }

    /// Set the policy for season-count durations.
    pub fn duration_policy(mut self, policy: DurationPolicy) -> Self {
        self.duration_policy = Some(policy);
        self
    }

    /// Set how record-level faults are handled.
    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = Some(mode);
        self
    }

    /// Enable or disable duplicate record removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Set the number of genres in the top-genres view.
    pub fn top_genres(mut self, n: usize) -> Self {
        self.top_genres = Some(n);
        self
    }

    /// Set the number of countries kept in the country pivots.
    pub fn top_countries(mut self, n: usize) -> Self {
        self.top_countries = Some(n);
        self
    }

    /// Set the number of rating codes in the rating view.
    pub fn top_ratings(mut self, n: usize) -> Self {
        self.top_ratings = Some(n);
        self
    }

    /// Set the same limit for every top-N view.
    pub fn top_n(self, n: usize) -> Self {
        self.top_genres(n).top_countries(n).top_ratings(n)
    }

    /// Replace the built-in stop-word set.
    ///
    /// Words are matched after tokens are lowercased, so they should be
    /// given in lowercase.
    pub fn stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            repair_policy: self.repair_policy.unwrap_or_default(),
            duration_policy: self.duration_policy.unwrap_or_default(),
            error_mode: self.error_mode.unwrap_or_default(),
            remove_duplicates: self.remove_duplicates.unwrap_or(true),
            top_genres: self.top_genres.unwrap_or(10),
            top_countries: self.top_countries.unwrap_or(10),
            top_ratings: self.top_ratings.unwrap_or(10),
            stop_words: self.stop_words,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.repair_policy, RepairPolicy::Lenient);
        assert_eq!(config.duration_policy, DurationPolicy::SeasonsAsNull);
        assert_eq!(config.error_mode, ErrorMode::Strict);
        assert_eq!(config.top_genres, 10);
        assert!(config.remove_duplicates);
        assert!(config.stop_words.is_none());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .repair_policy(RepairPolicy::Imputation)
            .duration_policy(DurationPolicy::RawMagnitude)
            .error_mode(ErrorMode::Lenient)
            .top_n(5)
            .top_ratings(3)
            .stop_words(["the", "a"])
            .build()
            .unwrap();

        assert_eq!(config.repair_policy, RepairPolicy::Imputation);
        assert_eq!(config.duration_policy, DurationPolicy::RawMagnitude);
        assert_eq!(config.error_mode, ErrorMode::Lenient);
        assert_eq!(config.top_genres, 5);
        assert_eq!(config.top_countries, 5);
        assert_eq!(config.top_ratings, 3);
        assert_eq!(
            config.stop_words,
            Some(vec!["the".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn test_validation_zero_top_n() {
        let result = PipelineConfig::builder().top_countries(0).build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidTopN { value: 0, .. }
        ));
    }

    #[test]
    fn test_validation_blank_stop_word() {
        let result = PipelineConfig::builder().stop_words(["the", "  "]).build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidStopWord(_)
        ));
    }

    #[test]
    fn test_validation_error_converts_to_catalog_error() {
        let err: crate::error::CatalogError = PipelineConfig::builder()
            .top_genres(0)
            .build()
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(err.to_string().contains("top_genres"));
    }

    #[test]
    fn test_pipeline_config_from_json() {
        let json = r#"{
            "repair_policy": "Imputation",
            "duration_policy": "SeasonsAsNull",
            "error_mode": "Lenient",
            "remove_duplicates": false,
            "top_genres": 8,
            "top_countries": 6,
            "top_ratings": 4,
            "stop_words": null
        }"#;

        let config: PipelineConfig =
            serde_json::from_str(json).expect("Should deserialize from frontend JSON");

        assert_eq!(config.repair_policy, RepairPolicy::Imputation);
        assert_eq!(config.error_mode, ErrorMode::Lenient);
        assert!(!config.remove_duplicates);
        assert_eq!(config.top_genres, 8);
        assert_eq!(config.top_countries, 6);
        assert_eq!(config.top_ratings, 4);
        assert!(config.validate().is_ok());
    }
}
