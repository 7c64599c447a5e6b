//! Fill values per repair policy.

use crate::config::RepairPolicy;
use crate::error::{CatalogError, Result};
use crate::types::RawRecord;
use crate::utils::column_mode;

use super::{DATE_NOT_ADDED, NO_DATA_PLACEHOLDER, UNKNOWN_PLACEHOLDER};

/// Where a fill value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillSource {
    /// A fixed placeholder.
    Constant,
    /// The most frequent observed value.
    Mode,
}

/// Fill value for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFill {
    pub value: String,
    pub source: FillSource,
}

impl ColumnFill {
    fn constant(value: &str) -> Self {
        Self {
            value: value.to_string(),
            source: FillSource::Constant,
        }
    }
}

/// Fill values for every repairable column.
///
/// `None` means the policy drops records missing that column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillPlan {
    pub director: ColumnFill,
    pub cast: ColumnFill,
    pub country: ColumnFill,
    pub date_added: Option<ColumnFill>,
    pub rating: Option<ColumnFill>,
}

impl FillPlan {
    /// Build the plan for `policy` over the records that survive policy drops.
    ///
    /// # Errors
    ///
    /// [`CatalogError::EmptyColumn`] when the country mode is needed but no
    /// record has a country.
    pub fn for_policy(policy: RepairPolicy, records: &[&RawRecord]) -> Result<Self> {
        match policy {
            RepairPolicy::Lenient => Ok(Self {
                director: ColumnFill::constant(UNKNOWN_PLACEHOLDER),
                cast: ColumnFill::constant(UNKNOWN_PLACEHOLDER),
                country: ColumnFill::constant(UNKNOWN_PLACEHOLDER),
                date_added: None,
                rating: None,
            }),
            RepairPolicy::Imputation => Ok(Self {
                director: ColumnFill::constant(UNKNOWN_PLACEHOLDER),
                cast: ColumnFill::constant(NO_DATA_PLACEHOLDER),
                country: Self::country_mode(records)?,
                date_added: Some(ColumnFill::constant(DATE_NOT_ADDED)),
                rating: Some(ColumnFill::constant(UNKNOWN_PLACEHOLDER)),
            }),
        }
    }

    fn country_mode(records: &[&RawRecord]) -> Result<ColumnFill> {
        let needed = records.iter().any(|r| r.country.is_none());
        let mode = column_mode(records.iter().map(|r| r.country.as_deref()));

        match mode {
            Some(value) => Ok(ColumnFill {
                value,
                source: FillSource::Mode,
            }),
            None if needed => Err(CatalogError::EmptyColumn {
                column: "country".to_string(),
            }),
            // nothing to fill, the value is never read
            None => Ok(ColumnFill::constant(UNKNOWN_PLACEHOLDER)),
        }
    }
}
