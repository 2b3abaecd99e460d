//! Error types for ddeserts-reshape

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Core error: {0}")]
    Core(#[from] ddeserts_core::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// A raw row lacks a field the reshaper cannot do without
    pub fn missing_field(field: &str, row: usize) -> Self {
        Self::Core(ddeserts_core::Error::MissingField {
            field: field.to_string(),
            row,
        })
    }
}
