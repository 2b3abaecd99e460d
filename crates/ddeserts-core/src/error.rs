//! Error types for census table processing
//!
//! Provides a unified error type for all ddeserts crates. Data-quality
//! anomalies (negative residuals, zero populations) are never errors; they are
//! clamped or reported as NaN. Only structural problems end up here.

use thiserror::Error;

/// Core error type for table construction and annotation
#[derive(Error, Debug)]
pub enum Error {
    /// A stage was entered without a column it reads
    #[error("Missing column: stage `{stage}` requires `{column}`")]
    MissingColumn { stage: &'static str, column: String },

    /// A breakdown label or race referenced by configuration is not in the lookup table
    #[error("Unknown breakdown: {0}")]
    UnknownBreakdown(String),

    /// Race code that cannot be used as a column prefix
    #[error("Invalid race code: {0:?}")]
    InvalidRace(String),

    /// Configuration that is internally inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raw input row without a field the reshaper needs
    #[error("Missing field `{field}` in input row {row}")]
    MissingField { field: String, row: usize },

    /// Annotation stages assembled in the wrong order
    #[error("Stage order violation: `{stage}` cannot run after `{after}`")]
    StageOrder {
        stage: &'static str,
        after: &'static str,
    },

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration (de)serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a column a stage could not find
    pub fn missing_column(stage: &'static str, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            stage,
            column: column.into(),
        }
    }

    /// Create an error for a configuration problem
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::missing_column("other", "tmr_adu_est");
        assert_eq!(
            err.to_string(),
            "Missing column: stage `other` requires `tmr_adu_est`"
        );

        let err = Error::UnknownBreakdown("Asian and White".to_string());
        assert_eq!(err.to_string(), "Unknown breakdown: Asian and White");

        let err = Error::InvalidRace("Blk".to_string());
        assert_eq!(err.to_string(), "Invalid race code: \"Blk\"");

        let err = Error::MissingField {
            field: "geoid".to_string(),
            row: 3,
        };
        assert_eq!(err.to_string(), "Missing field `geoid` in input row 3");

        let err = Error::StageOrder {
            stage: "consolidate",
            after: "dvap",
        };
        assert_eq!(
            err.to_string(),
            "Stage order violation: `consolidate` cannot run after `dvap`"
        );
    }

    #[test]
    fn test_error_from_io_error() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => assert!(err.to_string().contains("file not found")),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        assert!(matches!(err, Error::Other(_)));
        assert!(err.to_string().contains("custom error message"));
    }
}
