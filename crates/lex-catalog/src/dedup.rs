//! Exact duplicate removal.
//!
//! Two records are duplicates only when every raw and derived field is
//! equal. Records sharing a title but differing anywhere else are kept.

use crate::types::Record;
use std::collections::HashSet;
use tracing::debug;

/// Collapses exact duplicate records to their first occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeduplicationFilter;

impl DeduplicationFilter {
    /// Remove exact duplicates, keeping first occurrences in input order.
    ///
    /// Returns the kept records and the number of duplicates removed.
    pub fn apply(&self, records: Vec<Record>) -> (Vec<Record>, usize) {
        let before = records.len();
        let mut seen: HashSet<Record> = HashSet::with_capacity(before);
        let mut kept = Vec::with_capacity(before);

        for record in records {
            if !seen.contains(&record) {
                seen.insert(record.clone());
                kept.push(record);
            }
        }

        let removed = before - kept.len();
        debug!("Removed {} duplicate records", removed);
        (kept, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{AgeGroup, DateParts, Duration};
    use crate::types::ContentType;

    fn record(title: &str, country: &str) -> Record {
        Record {
            content_type: ContentType::Movie,
            title: title.to_string(),
            director: "Unknown".to_string(),
            cast: "Unknown".to_string(),
            country: country.to_string(),
            date_added: "September 9, 2019".to_string(),
            release_year: 2019,
            rating: "PG".to_string(),
            duration: "90 min".to_string(),
            listed_in: "Dramas".to_string(),
            description: "A story.".to_string(),
            parsed_duration: Duration::Minutes(90.0),
            date_parts: DateParts {
                year_added: Some("2019".to_string()),
                month_added: "September".to_string(),
            },
            age_group: AgeGroup::OlderKids,
        }
    }

    #[test]
    fn test_first_occurrence_survives() {
        let input = vec![
            record("A", "USA"),
            record("B", "USA"),
            record("A", "USA"),
        ];
        let (kept, removed) = DeduplicationFilter.apply(input);

        assert_eq!(removed, 1);
        let titles: Vec<&str> = kept.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_same_title_different_fields_kept() {
        let input = vec![record("A", "USA"), record("A", "India")];
        let (kept, removed) = DeduplicationFilter.apply(input);
        assert_eq!(removed, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_derived_fields_participate() {
        let mut other = record("A", "USA");
        other.age_group = AgeGroup::Unknown;
        let (kept, _) = DeduplicationFilter.apply(vec![record("A", "USA"), other]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            record("A", "USA"),
            record("A", "USA"),
            record("B", "India"),
            record("B", "India"),
            record("C", "USA"),
        ];
        let (once, _) = DeduplicationFilter.apply(input);
        let (twice, removed) = DeduplicationFilter.apply(once.clone());

        assert_eq!(removed, 0);
        assert_eq!(once, twice);
    }
}
