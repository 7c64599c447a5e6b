//! Audience classification from rating codes.
//!
//! The rating vocabulary differs between catalogs, so classification is
//! total: a code missing from [`AGE_GROUP_TABLE`] maps to
//! [`AgeGroup::Unknown`] instead of failing.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Audience category of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Kids,
    #[serde(rename = "Older Kids")]
    OlderKids,
    Teens,
    #[serde(rename = "Young Adults")]
    YoungAdults,
    Adults,
    Unknown,
}

impl AgeGroup {
    /// All variants in column order.
    pub const ALL: [AgeGroup; 6] = [
        AgeGroup::Kids,
        AgeGroup::OlderKids,
        AgeGroup::Teens,
        AgeGroup::YoungAdults,
        AgeGroup::Adults,
        AgeGroup::Unknown,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Kids => "Kids",
            Self::OlderKids => "Older Kids",
            Self::Teens => "Teens",
            Self::YoungAdults => "Young Adults",
            Self::Adults => "Adults",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rating code to audience category.
pub static AGE_GROUP_TABLE: Lazy<HashMap<&'static str, AgeGroup>> = Lazy::new(|| {
    HashMap::from([
        ("TV-MA", AgeGroup::Adults),
        ("R", AgeGroup::Adults),
        ("NR", AgeGroup::Adults),
        ("NC-17", AgeGroup::Adults),
        ("UR", AgeGroup::Adults),
        ("TV-14", AgeGroup::YoungAdults),
        ("PG-13", AgeGroup::Teens),
        ("TV-PG", AgeGroup::OlderKids),
        ("TV-Y7", AgeGroup::OlderKids),
        ("TV-Y7-FV", AgeGroup::OlderKids),
        ("PG", AgeGroup::OlderKids),
        ("TV-G", AgeGroup::Kids),
        ("TV-Y", AgeGroup::Kids),
        ("G", AgeGroup::Kids),
    ])
});

/// Maps rating codes to [`AgeGroup`]s through a read-only table.
#[derive(Debug, Clone, Copy)]
pub struct AgeGroupClassifier {
    table: &'static HashMap<&'static str, AgeGroup>,
}

impl Default for AgeGroupClassifier {
    fn default() -> Self {
        Self::new(&AGE_GROUP_TABLE)
    }
}

impl AgeGroupClassifier {
    /// Create a classifier over the given table.
    pub fn new(table: &'static HashMap<&'static str, AgeGroup>) -> Self {
        Self { table }
    }

    /// Classify a rating code. Never fails.
    pub fn classify(&self, rating: &str) -> AgeGroup {
        self.table
            .get(rating.trim())
            .copied()
            .unwrap_or(AgeGroup::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        let classifier = AgeGroupClassifier::default();
        assert_eq!(classifier.classify("TV-Y"), AgeGroup::Kids);
        assert_eq!(classifier.classify("TV-MA"), AgeGroup::Adults);
        assert_eq!(classifier.classify("PG"), AgeGroup::OlderKids);
        assert_eq!(classifier.classify("TV-Y7-FV"), AgeGroup::OlderKids);
    }

    #[test]
    fn test_tv14_and_pg13_are_distinct() {
        let classifier = AgeGroupClassifier::default();
        assert_eq!(classifier.classify("TV-14"), AgeGroup::YoungAdults);
        assert_eq!(classifier.classify("PG-13"), AgeGroup::Teens);
    }

    #[test]
    fn test_unmapped_codes_are_unknown() {
        let classifier = AgeGroupClassifier::default();
        for code in ["ZZ-UNKNOWN", "Unknown", "", "74 min", "tv-ma"] {
            assert_eq!(classifier.classify(code), AgeGroup::Unknown, "code {:?}", code);
        }
    }

    #[test]
    fn test_every_table_entry_classifies() {
        let classifier = AgeGroupClassifier::default();
        for (code, group) in AGE_GROUP_TABLE.iter() {
            assert_eq!(classifier.classify(code), *group);
        }
        assert_eq!(AGE_GROUP_TABLE.len(), 14);
    }

    #[test]
    fn test_age_group_labels() {
        assert_eq!(AgeGroup::OlderKids.to_string(), "Older Kids");
        assert_eq!(
            serde_json::to_string(&AgeGroup::YoungAdults).unwrap(),
            "\"Young Adults\""
        );
    }
}
