//! Demo error type.

use thiserror::Error;

use qsearch_hal::HalError;
use qsearch_ir::IrError;

/// Errors raised while running a demo.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DemoError {
    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// The backend could not be obtained or the job failed.
    #[error(transparent)]
    Hal(#[from] HalError),

    /// The histogram broke an invariant of the experiment.
    #[error("Unexpected outcome: {0}")]
    UnexpectedOutcome(String),

    /// Writing the report failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for demo operations.
pub type DemoResult<T> = Result<T, DemoError>;
