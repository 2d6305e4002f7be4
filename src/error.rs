//! Application error types.

use thiserror::Error;

/// Application-level errors for the small graph catalog.
#[derive(Error, Debug)]
pub enum AppError {
    // Lookup errors
    #[error("Small graph not found: {0}")]
    GraphNotFound(String),

    #[error("Name already registered: {0}")]
    DuplicateName(String),

    // Family errors
    #[error("Not a union family: {0}")]
    NotAUnionFamily(String),

    #[error("No complement for {0}")]
    MissingComplement(String),

    #[error("Union family {0} has no subfamilies")]
    EmptySubfamilies(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Stable code for the error kind, suitable for logs and reports.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::GraphNotFound(_) => "GRAPH_NOT_FOUND",
            AppError::DuplicateName(_) => "DUPLICATE_NAME",
            AppError::NotAUnionFamily(_) => "NOT_A_UNION_FAMILY",
            AppError::MissingComplement(_) => "MISSING_COMPLEMENT",
            AppError::EmptySubfamilies(_) => "EMPTY_SUBFAMILIES",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }
}
