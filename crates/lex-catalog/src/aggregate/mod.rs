//! Aggregate views over the cleaned dataset.
//!
//! Every view is a pure function of the records: calling it twice on the
//! same slice yields identical output. Frequency tables are ordered by count
//! descending with ties in first-encountered order.

mod pivot;
mod text;

pub use pivot::Pivot;
pub use text::{DEFAULT_STOP_WORDS, ENGLISH_STOP_WORDS, content_tokens, normalize_token};

use crate::config::PipelineConfig;
use crate::types::Record;
use crate::utils::value_counts;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// A label and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

impl LabelCount {
    /// Create a new entry.
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Number of records released in a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i64,
    pub count: usize,
}

/// Release year and running time of one movie-length record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationPoint {
    pub release_year: i64,
    pub minutes: f64,
}

/// Every named view, as handed to the chart-rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateViews {
    pub counts_by_year: Vec<YearCount>,
    pub counts_by_type: Vec<LabelCount>,
    pub top_genres: Vec<LabelCount>,
    pub type_by_country: Pivot,
    pub rating_counts: Vec<LabelCount>,
    pub country_age_group: Pivot,
    pub description_tokens: Vec<LabelCount>,
    pub duration_by_release_year: Vec<DurationPoint>,
    pub counts_by_month_added: Vec<LabelCount>,
}

impl AggregateViews {
    /// Names of the views, matching their serialized keys.
    pub const VIEW_NAMES: [&'static str; 9] = [
        "counts_by_year",
        "counts_by_type",
        "top_genres",
        "type_by_country",
        "rating_counts",
        "country_age_group",
        "description_tokens",
        "duration_by_release_year",
        "counts_by_month_added",
    ];

    /// Names of the views, matching their serialized keys.
    pub fn view_names() -> &'static [&'static str] {
        &Self::VIEW_NAMES
    }
}

/// Computes aggregate views.
///
/// The engine only owns the stop-word set used for description tokens; all
/// other views are associated functions.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    stop_words: HashSet<String>,
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.clone(),
        }
    }
}

impl AggregationEngine {
    /// Create an engine with a custom stop-word set.
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stop_words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an engine from pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        match &config.stop_words {
            Some(words) => Self::with_stop_words(words.iter().cloned()),
            None => Self::default(),
        }
    }

    /// Compute every view with the limits from `config`.
    pub fn compute_all(&self, records: &[Record], config: &PipelineConfig) -> AggregateViews {
        debug!("Computing aggregate views over {} records", records.len());
        AggregateViews {
            counts_by_year: Self::counts_by_year(records),
            counts_by_type: Self::counts_by_type(records),
            top_genres: Self::top_genres(records, config.top_genres),
            type_by_country: Self::type_by_country(records, config.top_countries),
            rating_counts: Self::rating_counts(records, config.top_ratings),
            country_age_group: Self::country_age_group_pivot(records, config.top_countries),
            description_tokens: self.description_token_frequency(records),
            duration_by_release_year: Self::duration_by_release_year(records),
            counts_by_month_added: Self::counts_by_month_added(records),
        }
    }

    /// Records per release year, years ascending.
    pub fn counts_by_year(records: &[Record]) -> Vec<YearCount> {
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for record in records {
            *counts.entry(record.release_year).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect()
    }

    /// Records per content type.
    pub fn counts_by_type(records: &[Record]) -> Vec<LabelCount> {
        value_counts(records.iter().map(|r| r.content_type.label()))
    }

    /// The `n` most frequent genre labels across exploded genre lists.
    pub fn top_genres(records: &[Record], n: usize) -> Vec<LabelCount> {
        let mut counts = value_counts(records.iter().flat_map(Record::genres));
        counts.truncate(n);
        counts
    }

    /// Content types per country for the `top_n` countries.
    pub fn type_by_country(records: &[Record], top_n: usize) -> Pivot {
        Pivot::from_pairs(
            "country",
            records
                .iter()
                .map(|r| (r.country.as_str(), r.content_type)),
            top_n,
        )
    }

    /// The `top_n` most frequent rating codes.
    pub fn rating_counts(records: &[Record], top_n: usize) -> Vec<LabelCount> {
        let mut counts = value_counts(records.iter().map(|r| r.rating.as_str()));
        counts.truncate(top_n);
        counts
    }

    /// Audience categories per country for the `top_n` countries.
    pub fn country_age_group_pivot(records: &[Record], top_n: usize) -> Pivot {
        Pivot::from_pairs(
            "country",
            records.iter().map(|r| (r.country.as_str(), r.age_group)),
            top_n,
        )
    }

    /// Token frequencies over all descriptions, stop words removed.
    pub fn description_token_frequency(&self, records: &[Record]) -> Vec<LabelCount> {
        let corpus = records
            .iter()
            .map(|r| r.description.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let tokens: Vec<String> = content_tokens(&corpus, &self.stop_words).collect();
        value_counts(tokens.iter().map(String::as_str))
    }

    /// `(release_year, minutes)` for every record with a minute duration.
    pub fn duration_by_release_year(records: &[Record]) -> Vec<DurationPoint> {
        records
            .iter()
            .filter_map(|r| {
                r.duration_minutes().map(|minutes| DurationPoint {
                    release_year: r.release_year,
                    minutes,
                })
            })
            .collect()
    }

    /// Records per verbatim month label, never-listed records excluded.
    pub fn counts_by_month_added(records: &[Record]) -> Vec<LabelCount> {
        value_counts(
            records
                .iter()
                .map(Record::month_added)
                .filter(|month| !month.is_empty()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{AgeGroup, DateParts, Duration};
    use crate::types::ContentType;
    use pretty_assertions::assert_eq;

    fn record(
        content_type: ContentType,
        country: &str,
        release_year: i64,
        rating: &str,
        listed_in: &str,
    ) -> Record {
        let age_group = crate::derive::AgeGroupClassifier::default().classify(rating);
        Record {
            content_type,
            title: format!("{} {}", country, release_year),
            director: "Unknown".to_string(),
            cast: "Unknown".to_string(),
            country: country.to_string(),
            date_added: "September 9, 2019".to_string(),
            release_year,
            rating: rating.to_string(),
            duration: "90 min".to_string(),
            listed_in: listed_in.to_string(),
            description: String::new(),
            parsed_duration: Duration::Minutes(90.0),
            date_parts: DateParts {
                year_added: Some("2019".to_string()),
                month_added: "September".to_string(),
            },
            age_group,
        }
    }

    fn catalog() -> Vec<Record> {
        vec![
            record(ContentType::Movie, "USA", 2019, "TV-MA", "Dramas, International Movies"),
            record(ContentType::TvShow, "India", 2017, "TV-14", "International TV Shows, Dramas"),
            record(ContentType::Movie, "USA", 2019, "PG", "Comedies"),
            record(ContentType::Movie, "India", 2020, "TV-MA", "Dramas"),
            record(ContentType::TvShow, "Japan", 2017, "TV-Y", "Anime Series"),
        ]
    }

    // ========================================================================
    // Simple counts
    // ========================================================================

    #[test]
    fn test_counts_by_year_ascending() {
        let counts = AggregationEngine::counts_by_year(&catalog());
        assert_eq!(
            counts,
            vec![
                YearCount { year: 2017, count: 2 },
                YearCount { year: 2019, count: 2 },
                YearCount { year: 2020, count: 1 },
            ]
        );
        assert!(counts.windows(2).all(|w| w[0].year < w[1].year));
    }

    #[test]
    fn test_counts_by_type() {
        let counts = AggregationEngine::counts_by_type(&catalog());
        assert_eq!(
            counts,
            vec![LabelCount::new("Movie", 3), LabelCount::new("TV Show", 2)]
        );
    }

    #[test]
    fn test_top_genres_explodes_lists() {
        let genres = AggregationEngine::top_genres(&catalog(), 10);
        assert_eq!(genres[0], LabelCount::new("Dramas", 3));
        // ties in first-encountered order
        let labels: Vec<&str> = genres.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Dramas",
                "International Movies",
                "International TV Shows",
                "Comedies",
                "Anime Series"
            ]
        );
    }

    #[test]
    fn test_top_genres_limit() {
        let genres = AggregationEngine::top_genres(&catalog(), 2);
        assert_eq!(genres.len(), 2);
    }

    #[test]
    fn test_rating_counts() {
        let ratings = AggregationEngine::rating_counts(&catalog(), 2);
        assert_eq!(
            ratings,
            vec![LabelCount::new("TV-MA", 2), LabelCount::new("TV-14", 1)]
        );
    }

    // ========================================================================
    // Pivots
    // ========================================================================

    #[test]
    fn test_type_by_country() {
        let pivot = AggregationEngine::type_by_country(&catalog(), 2);
        assert_eq!(pivot.row_labels, vec!["India", "USA"]);
        assert_eq!(pivot.get("USA", "Movie"), Some(2));
        assert_eq!(pivot.get("USA", "TV Show"), Some(0));
        assert_eq!(pivot.get("India", "TV Show"), Some(1));
    }

    #[test]
    fn test_country_age_group_pivot() {
        let pivot = AggregationEngine::country_age_group_pivot(&catalog(), 10);
        assert_eq!(pivot.column_labels, vec!["Kids", "Older Kids", "Young Adults", "Adults"]);
        assert_eq!(pivot.get("India", "Adults"), Some(1));
        assert_eq!(pivot.get("India", "Young Adults"), Some(1));
        assert_eq!(pivot.get("Japan", "Kids"), Some(1));
        assert_eq!(pivot.get("Japan", "Adults"), Some(0));
        assert_eq!(pivot.row_total("USA"), Some(2));
    }

    // ========================================================================
    // Text and supplementary views
    // ========================================================================

    #[test]
    fn test_description_token_frequency() {
        let mut records = catalog();
        records[0].description = "A family moves to the city.".to_string();
        records[1].description = "The city never sleeps; a family waits.".to_string();

        let tokens = AggregationEngine::default().description_token_frequency(&records);
        assert_eq!(tokens[0], LabelCount::new("family", 2));
        assert_eq!(tokens[1], LabelCount::new("city", 2));
        assert!(tokens.iter().all(|t| t.label != "the" && t.label != "a"));
    }

    #[test]
    fn test_duration_by_release_year_skips_seasons() {
        let mut records = catalog();
        records[1].parsed_duration = Duration::Seasons(2);
        let points = AggregationEngine::duration_by_release_year(&records);
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.minutes == 90.0));
    }

    #[test]
    fn test_counts_by_month_added_excludes_unlisted() {
        let mut records = catalog();
        records[0].date_parts = DateParts::default();
        records[1].date_parts.month_added = "March".to_string();
        let months = AggregationEngine::counts_by_month_added(&records);
        assert_eq!(
            months,
            vec![LabelCount::new("September", 3), LabelCount::new("March", 1)]
        );
    }

    #[test]
    fn test_compute_all_is_deterministic() {
        let records = catalog();
        let config = PipelineConfig::default();
        let engine = AggregationEngine::from_config(&config);

        let first = engine.compute_all(&records, &config);
        let second = engine.compute_all(&records, &config);
        assert_eq!(first, second);
        assert_eq!(AggregateViews::view_names().len(), 9);
    }

    #[test]
    fn test_views_serialize_by_name() {
        let config = PipelineConfig::default();
        let views = AggregationEngine::default().compute_all(&catalog(), &config);
        let json = serde_json::to_value(&views).unwrap();
        for name in AggregateViews::view_names() {
            assert!(json.get(name).is_some(), "missing view {}", name);
        }
    }

    #[test]
    fn test_unused_age_groups_are_not_columns() {
        let pivot = AggregationEngine::country_age_group_pivot(&catalog(), 10);
        assert!(!pivot.column_labels.contains(&AgeGroup::Teens.to_string()));
    }
}
