//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur in backend operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend could not be obtained or is offline.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Job execution failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job cancelled")]
    JobCancelled,

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Bad backend configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout waiting for job.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let cases = [
            (HalError::BackendUnavailable("gone".into()), "Backend not available: gone"),
            (HalError::JobFailed("boom".into()), "Job failed: boom"),
            (HalError::JobCancelled, "Job cancelled"),
            (HalError::JobNotFound("j1".into()), "Job not found: j1"),
            (HalError::InvalidCircuit("empty".into()), "Invalid circuit: empty"),
            (
                HalError::CircuitTooLarge("30 qubits".into()),
                "Circuit exceeds backend capabilities: 30 qubits",
            ),
            (HalError::InvalidShots("0".into()), "Invalid shots: 0"),
            (HalError::Configuration("seed".into()), "Configuration error: seed"),
            (HalError::Timeout("j2".into()), "Timeout waiting for job j2"),
            (HalError::Backend("oops".into()), "Backend error: oops"),
        ];
        for (err, message) in cases {
            assert_eq!(err.to_string(), message);
        }
    }
}
