//! Derived fields.
//!
//! This module computes the fields a repaired record does not carry:
//! - Parsed duration ([`Duration`])
//! - Added year and month ([`DateParts`])
//! - Audience category ([`AgeGroup`])
//!
//! The three derivations are independent of each other and only read the
//! repaired record.

mod age_group;
mod date;
mod duration;

pub use age_group::{AGE_GROUP_TABLE, AgeGroup, AgeGroupClassifier};
pub use date::DateParts;
pub use duration::{Duration, SEASON_TOKEN};

use crate::config::{DurationPolicy, ErrorMode};
use crate::error::Result;
use crate::types::{RecordIssue, Record, RepairedRecord};
use tracing::{debug, warn};

/// Stage name used in issues and error context.
pub const STAGE: &str = "derivation";

/// Computes derived fields for repaired records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldDeriver {
    classifier: AgeGroupClassifier,
    duration_policy: DurationPolicy,
}

impl FieldDeriver {
    /// Create a deriver with the given classifier and duration policy.
    pub fn new(classifier: AgeGroupClassifier, duration_policy: DurationPolicy) -> Self {
        Self {
            classifier,
            duration_policy,
        }
    }

    /// Derive fields for one record.
    ///
    /// Fails only when the duration cannot be parsed.
    pub fn derive(&self, repaired: RepairedRecord) -> Result<Record> {
        let parsed_duration =
            Duration::parse(&repaired.duration, self.duration_policy, repaired.source_row)?;
        let date_parts = DateParts::decompose(Some(&repaired.date_added));
        let age_group = self.classifier.classify(&repaired.rating);

        Ok(Record {
            content_type: repaired.content_type,
            title: repaired.title,
            director: repaired.director,
            cast: repaired.cast,
            country: repaired.country,
            date_added: repaired.date_added,
            release_year: repaired.release_year,
            rating: repaired.rating,
            duration: repaired.duration,
            listed_in: repaired.listed_in,
            description: repaired.description,
            parsed_duration,
            date_parts,
            age_group,
        })
    }

    /// Derive fields for every record.
    ///
    /// Under [`ErrorMode::Strict`] the first failure aborts; under
    /// [`ErrorMode::Lenient`] failing records are dropped and returned as
    /// issues.
    pub fn derive_all(
        &self,
        repaired: Vec<RepairedRecord>,
        mode: ErrorMode,
    ) -> Result<(Vec<Record>, Vec<RecordIssue>)> {
        let mut records = Vec::with_capacity(repaired.len());
        let mut issues = Vec::new();

        for record in repaired {
            let row = record.source_row;
            match self.derive(record) {
                Ok(derived) => records.push(derived),
                Err(e) if mode == ErrorMode::Lenient && e.is_record_fault() => {
                    warn!("Dropping row {}: {}", row, e);
                    issues.push(RecordIssue::from_error(row, STAGE, &e));
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            "Derived fields for {} records ({} dropped)",
            records.len(),
            issues.len()
        );
        Ok((records, issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentType;

    fn repaired(row: usize, duration: &str, rating: &str, date_added: &str) -> RepairedRecord {
        RepairedRecord {
            source_row: row,
            content_type: ContentType::Movie,
            title: format!("Title {}", row),
            director: "Unknown".to_string(),
            cast: "Unknown".to_string(),
            country: "India".to_string(),
            date_added: date_added.to_string(),
            release_year: 2019,
            rating: rating.to_string(),
            duration: duration.to_string(),
            listed_in: "Dramas".to_string(),
            description: "A story.".to_string(),
        }
    }

    #[test]
    fn test_derive_all_fields() {
        let deriver = FieldDeriver::default();
        let record = deriver
            .derive(repaired(0, "90 min", "TV-Y", "September 9, 2019"))
            .unwrap();

        assert_eq!(record.duration_minutes(), Some(90.0));
        assert_eq!(record.year_added(), Some("2019"));
        assert_eq!(record.month_added(), "September");
        assert_eq!(record.age_group, AgeGroup::Kids);
    }

    #[test]
    fn test_derive_sentinel_date_and_seasons() {
        let deriver = FieldDeriver::default();
        let record = deriver.derive(repaired(0, "3 Seasons", "Unknown", "No")).unwrap();

        assert_eq!(record.parsed_duration, Duration::Seasons(3));
        assert_eq!(record.duration_minutes(), None);
        assert_eq!(record.year_added(), None);
        assert_eq!(record.month_added(), "");
        assert_eq!(record.age_group, AgeGroup::Unknown);
    }

    #[test]
    fn test_derive_all_strict_aborts() {
        let deriver = FieldDeriver::default();
        let input = vec![
            repaired(0, "90 min", "R", "No"),
            repaired(1, "a while", "R", "No"),
        ];

        let err = deriver.derive_all(input, ErrorMode::Strict).unwrap_err();
        assert_eq!(err.error_code(), "UNPARSABLE_DURATION");
        assert_eq!(err.row(), Some(1));
    }

    #[test]
    fn test_derive_all_lenient_drops_and_reports() {
        let deriver = FieldDeriver::default();
        let input = vec![
            repaired(0, "90 min", "R", "No"),
            repaired(1, "a while", "R", "No"),
            repaired(2, "1 Season", "R", "No"),
        ];

        let (records, issues) = deriver.derive_all(input, ErrorMode::Lenient).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].row, 1);
        assert_eq!(issues[0].stage, STAGE);
        assert_eq!(issues[0].code, "UNPARSABLE_DURATION");
    }

    #[test]
    fn test_raw_magnitude_deriver() {
        let deriver = FieldDeriver::new(AgeGroupClassifier::default(), DurationPolicy::RawMagnitude);
        let record = deriver.derive(repaired(0, "2 Seasons", "PG", "No")).unwrap();
        assert_eq!(record.duration_minutes(), Some(2.0));
    }
}
