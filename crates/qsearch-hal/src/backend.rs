//! Backend trait and configuration.
//!
//! The [`Backend`] trait covers the job lifecycle:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)       (async)       (async)      (async)      (async)
//! ```
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&Capabilities` |
//! | `availability()` | async | yes | `HalResult<BackendAvailability>` |
//! | `validate()` | async | provided | `HalResult<ValidationResult>` |
//! | `submit()` | async | yes | `HalResult<JobId>` |
//! | `status()` | async | yes | `HalResult<JobStatus>` |
//! | `result()` | async | yes | `HalResult<ExecutionResult>` |
//! | `cancel()` | async | yes | `HalResult<()>` |
//! | `wait()` | async | provided | `HalResult<ExecutionResult>` |

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use qsearch_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
#[derive(Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Backend-specific settings.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a configuration with no extra settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add a setting.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer setting.
    ///
    /// Absent keys yield `None`; present keys of the wrong type are a
    /// configuration error.
    pub fn get_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!(
                    "'{key}' must be a non-negative integer, got {value}"
                ))
            }),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("extra", &self.extra)
            .finish()
    }
}

/// Trait for quantum execution backends.
///
/// - `capabilities()` is synchronous and infallible; implementations cache
///   it at construction.
/// - `submit()` returns a job that starts in `Queued` (or has already moved
///   on, for backends that execute inline).
/// - `result()` is only meaningful once `status()` reports `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Name of this backend.
    fn name(&self) -> &str;

    /// Capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Liveness and queue information.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Check a circuit against backend constraints.
    ///
    /// The default checks qubit count and gate support from
    /// [`capabilities()`](Backend::capabilities).
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let reasons = self.capabilities().violations(circuit);
        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    /// Submit a circuit for `shots` repetitions.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    /// Status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a job.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Wait for a job to finish and return its result.
    ///
    /// Polls every 500ms for up to 5 minutes.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let poll_interval = Duration::from_millis(500);
        let max_polls = 600;

        for _ in 0..max_polls {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }

        Err(HalError::Timeout(job_id.0.clone()))
    }
}

/// Backend availability information.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    /// Whether the backend accepts jobs.
    pub is_available: bool,
    /// Jobs currently queued, if known.
    pub queue_depth: Option<u32>,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Always available with an empty queue, as for local simulators.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            status_message: None,
        }
    }

    /// Offline with a reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            queue_depth: None,
            status_message: Some(reason.into()),
        }
    }
}

/// Result of checking a circuit against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit can be submitted as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Why.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Construct a backend from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Counts;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Backend whose jobs stay `Running` for a fixed number of polls.
    struct SlowBackend {
        caps: Capabilities,
        polls_left: AtomicU32,
        outcome: Mutex<Option<JobStatus>>,
    }

    impl SlowBackend {
        fn new(polls: u32, outcome: JobStatus) -> Self {
            Self {
                caps: Capabilities::simulator(2),
                polls_left: AtomicU32::new(polls),
                outcome: Mutex::new(Some(outcome)),
            }
        }
    }

    #[async_trait]
    impl Backend for SlowBackend {
        fn name(&self) -> &str {
            "slow"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.caps
        }

        async fn availability(&self) -> HalResult<BackendAvailability> {
            Ok(BackendAvailability::always_available())
        }

        async fn submit(&self, _circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
            Ok(JobId::new("slow-1"))
        }

        async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
            if self.polls_left.load(Ordering::SeqCst) > 0 {
                self.polls_left.fetch_sub(1, Ordering::SeqCst);
                return Ok(JobStatus::Running);
            }
            Ok(self.outcome.lock().unwrap().clone().unwrap())
        }

        async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
            let mut counts = Counts::new();
            counts.insert("00", 10);
            Ok(ExecutionResult::new(counts, 10))
        }

        async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_backend_config_extras() {
        let config = BackendConfig::new("test")
            .with_extra("max_qubits", serde_json::json!(8))
            .with_extra("label", serde_json::json!("x"));

        assert_eq!(config.get_u64("max_qubits").unwrap(), Some(8));
        assert_eq!(config.get_u64("missing").unwrap(), None);
        assert!(matches!(
            config.get_u64("label"),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_backend_availability() {
        let avail = BackendAvailability::always_available();
        assert!(avail.is_available);
        assert_eq!(avail.queue_depth, Some(0));

        let down = BackendAvailability::unavailable("maintenance");
        assert!(!down.is_available);
        assert_eq!(down.status_message.as_deref(), Some("maintenance"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_polls_until_completed() {
        let backend = SlowBackend::new(3, JobStatus::Completed);
        let result = backend.wait(&JobId::new("slow-1")).await.unwrap();
        assert_eq!(result.counts.get("00"), 10);
        assert_eq!(backend.polls_left.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_surfaces_failure() {
        let backend = SlowBackend::new(1, JobStatus::Failed("calibration".into()));
        let err = backend.wait(&JobId::new("slow-1")).await.unwrap_err();
        assert!(matches!(err, HalError::JobFailed(msg) if msg == "calibration"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out() {
        let backend = SlowBackend::new(u32::MAX, JobStatus::Completed);
        let err = backend.wait(&JobId::new("slow-1")).await.unwrap_err();
        assert!(matches!(err, HalError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_default_validate() {
        let backend = SlowBackend::new(0, JobStatus::Completed);
        let ok = backend.validate(&Circuit::bell().unwrap()).await.unwrap();
        assert!(ok.is_valid());

        let too_big = backend.validate(&Circuit::ghz(4).unwrap()).await.unwrap();
        assert!(!too_big.is_valid());
    }
}
