//! Duration parsing.
//!
//! Catalog durations are free text such as `"90 min"` or `"3 Seasons"`.
//! Parsing yields a tagged [`Duration`] so consumers match on the variant
//! instead of checking for a missing minute value.

use crate::config::DurationPolicy;
use crate::error::{CatalogError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Token marking a season-count duration. Matched case-sensitively.
pub const SEASON_TOKEN: &str = "Season";

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("Invalid regex: digit run"));

/// Parsed duration of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Duration {
    /// Running time in minutes.
    Minutes(f64),
    /// Number of seasons.
    Seasons(u32),
    /// Season-based entry without a stated count.
    Unknown,
}

// Minutes only ever holds whole numbers parsed from digits, never NaN.
impl Eq for Duration {}

impl Hash for Duration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Minutes(minutes) => minutes.to_bits().hash(state),
            Self::Seasons(count) => count.hash(state),
            Self::Unknown => {}
        }
    }
}

impl Duration {
    /// Minutes, `None` for anything that is not a minute duration.
    pub fn minutes(&self) -> Option<f64> {
        match self {
            Self::Minutes(minutes) => Some(*minutes),
            Self::Seasons(_) | Self::Unknown => None,
        }
    }

    /// Parse duration text under the given policy.
    ///
    /// The first run of decimal digits is the magnitude. Under
    /// [`DurationPolicy::SeasonsAsNull`] a text containing `"Season"` is a
    /// season count whatever its digits; under
    /// [`DurationPolicy::RawMagnitude`] every magnitude is taken as minutes.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnparsableDuration`] when the text has no digit run
    /// and is not a season form. `row` locates the record in the error.
    pub fn parse(text: &str, policy: DurationPolicy, row: usize) -> Result<Self> {
        let is_season = text.contains(SEASON_TOKEN);
        let magnitude = match DIGIT_RUN.find(text) {
            Some(m) => Some(m.as_str().parse::<u64>().map_err(|_| {
                CatalogError::UnparsableDuration {
                    row,
                    value: text.to_string(),
                }
            })?),
            None => None,
        };

        match (policy, is_season, magnitude) {
            (DurationPolicy::SeasonsAsNull, true, Some(count)) => {
                let count = u32::try_from(count).map_err(|_| CatalogError::UnparsableDuration {
                    row,
                    value: text.to_string(),
                })?;
                Ok(Self::Seasons(count))
            }
            (_, true, None) => Ok(Self::Unknown),
            (_, _, Some(minutes)) => Ok(Self::Minutes(minutes as f64)),
            (_, false, None) => Err(CatalogError::UnparsableDuration {
                row,
                value: text.to_string(),
            }),
        }
    }
}
