//! Error types for valuation computations.

use thiserror::Error;

/// Result type for valuation operations.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Errors that can occur while valuing a company.
///
/// None of these are fatal for a batch run: the pipeline records them per
/// company and moves on to the next record.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// A numeric field required by the current step is absent or unusable
    #[error("Insufficient data: {0}")]
    MissingData(String),

    /// Total capital (equity plus net debt) is zero
    #[error("WACC undefined: total capital is zero")]
    UndefinedWacc,

    /// DCF parameters that would produce a divergent or meaningless value
    #[error("Invalid model parameters: {0}")]
    InvalidModelParameters(String),

    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ValuationError {
    /// Shorthand for [`ValuationError::MissingData`].
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingData(field.into())
    }
}
