//! Demand points for routing jobs

use serde::Serialize;
use vrpsetup_types::{Error, Result, ValidationRule};

use super::geo::{GeoPoint, LATITUDE_COLUMN, LONGITUDE_COLUMN};
use super::Record;

/// Non-empty ordered set of demand records.
///
/// Every record carries `latitude`, `longitude` and the vehicle unit column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DemandSet(Vec<Record>);

impl DemandSet {
    pub fn new(records: Vec<Record>, unit: &str) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::validation(ValidationRule::EmptyDemandSet, 0));
        }
        for (idx, record) in records.iter().enumerate() {
            let row = Some(idx + 1);
            for field in [LATITUDE_COLUMN, LONGITUDE_COLUMN, unit] {
                if !record.has_field(field) {
                    return Err(Error::missing_field(field, row));
                }
            }
        }
        Ok(Self(records))
    }

    pub fn records(&self) -> &[Record] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coordinates of each record, failing on the first unusable one
    pub fn points(&self) -> Result<Vec<GeoPoint>> {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, record)| GeoPoint::from_record(record, Some(idx + 1)))
            .collect()
    }
}
