use event_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Caller-supplied parameter outside contract. Reported synchronously
    /// with a specific message; never a system fault.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Store failures bubble unchanged to the boundary.
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
