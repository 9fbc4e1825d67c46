//! Error types for vrpsetup

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Missing configuration value: {0}")]
    MissingValue(String),
}

/// Errors raised while turning an uploaded file into records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("File could not be read: {0}")]
    Unreadable(String),

    #[error("File has no header row")]
    MissingHeader,

    #[error("Duplicate column in header: {0}")]
    DuplicateColumn(String),
}

/// Named validation rules, reported with the offending value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    NotANumber,
    LatitudeRange,
    LongitudeRange,
    OutsideBoundingBox,
    CapacityNotPositiveInteger,
    EmptyUnit,
    EmptyDemandSet,
    EmptyRecordSet,
}

impl ValidationRule {
    pub fn description(&self) -> &'static str {
        match self {
            ValidationRule::NotANumber => "value is not a number",
            ValidationRule::LatitudeRange => "latitude must be between -90 and 90",
            ValidationRule::LongitudeRange => "longitude must be between -180 and 180",
            ValidationRule::OutsideBoundingBox => {
                "latitude and longitude must be within the contiguous USA"
            }
            ValidationRule::CapacityNotPositiveInteger => {
                "vehicle capacity must be a positive integer"
            }
            ValidationRule::EmptyUnit => "vehicle unit is required",
            ValidationRule::EmptyDemandSet => "demand file has no records",
            ValidationRule::EmptyRecordSet => "file has no records",
        }
    }
}

impl std::fmt::Display for ValidationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Missing required field '{field}'{}", row_suffix(.row))]
    MissingField { field: String, row: Option<usize> },

    #[error("Validation failed: {rule} (got '{value}')")]
    Validation { rule: ValidationRule, value: String },

    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("A submission is already in flight")]
    ConcurrentSubmission,

    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    pub fn missing_field(field: impl Into<String>, row: Option<usize>) -> Self {
        Error::MissingField {
            field: field.into(),
            row,
        }
    }

    pub fn validation(rule: ValidationRule, value: impl ToString) -> Self {
        Error::Validation {
            rule,
            value: value.to_string(),
        }
    }

    /// Rule name for validation errors, `None` for every other kind
    pub fn rule(&self) -> Option<ValidationRule> {
        match self {
            Error::Validation { rule, .. } => Some(*rule),
            _ => None,
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" in row {}", r),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_includes_row() {
        let err = Error::missing_field("zip", Some(3));
        assert_eq!(err.to_string(), "Missing required field 'zip' in row 3");

        let err = Error::missing_field("unit", None);
        assert_eq!(err.to_string(), "Missing required field 'unit'");
    }

    #[test]
    fn test_validation_message() {
        let err = Error::validation(ValidationRule::CapacityNotPositiveInteger, "12.5");
        assert_eq!(err.rule(), Some(ValidationRule::CapacityNotPositiveInteger));
        assert!(err.to_string().contains("positive integer"));
        assert!(err.to_string().contains("12.5"));
    }
}
