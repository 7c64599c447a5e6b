//! Added-date decomposition.
//!
//! Dates are kept as text: the year is the trailing four characters and the
//! month is the leading token, used verbatim as a grouping label.

use crate::repair::DATE_NOT_ADDED;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Year and month a title was added to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateParts {
    /// Four-digit year text, `None` when the title was never listed.
    pub year_added: Option<String>,
    /// Month label such as `"September"`, empty when never listed.
    pub month_added: String,
}

impl DateParts {
    /// Split a `"Month Day, Year"` date.
    ///
    /// `None`, blank text and the `"No"` sentinel all mean the title was
    /// never listed.
    pub fn decompose(date_added: Option<&str>) -> Self {
        let text = match date_added.map(str::trim) {
            Some(text) if !text.is_empty() && text != DATE_NOT_ADDED => text,
            _ => return Self::default(),
        };

        let month_added = text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();

        let chars: Vec<char> = text.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        let year_added = if tail.len() == 4 && tail.chars().all(|c| c.is_ascii_digit()) {
            Some(tail)
        } else {
            debug!("No trailing year in date_added '{}'", text);
            None
        };

        Self {
            year_added,
            month_added,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_full_date() {
        let parts = DateParts::decompose(Some("September 9, 2019"));
        assert_eq!(parts.year_added.as_deref(), Some("2019"));
        assert_eq!(parts.month_added, "September");
    }

    #[test]
    fn test_decompose_trims_leading_space() {
        let parts = DateParts::decompose(Some(" August 4, 2017"));
        assert_eq!(parts.year_added.as_deref(), Some("2017"));
        assert_eq!(parts.month_added, "August");
    }

    #[test]
    fn test_decompose_sentinel() {
        let parts = DateParts::decompose(Some("No"));
        assert_eq!(parts.year_added, None);
        assert_eq!(parts.month_added, "");
    }

    #[test]
    fn test_decompose_absent() {
        assert_eq!(DateParts::decompose(None), DateParts::default());
        assert_eq!(DateParts::decompose(Some("   ")), DateParts::default());
    }

    #[test]
    fn test_decompose_without_year() {
        let parts = DateParts::decompose(Some("Sometime"));
        assert_eq!(parts.year_added, None);
        assert_eq!(parts.month_added, "Sometime");
    }

    #[test]
    fn test_month_is_not_normalized() {
        let parts = DateParts::decompose(Some("sept 1, 2020"));
        assert_eq!(parts.month_added, "sept");
        assert_eq!(parts.year_added.as_deref(), Some("2020"));
    }
}
