//! Hardware abstraction layer for qsearch.
//!
//! Execution targets implement the [`Backend`] trait and are looked up by
//! name through a [`BackendRegistry`]. Results come back as an
//! [`ExecutionResult`] carrying a [`Counts`] histogram.
//!
//! # Example
//!
//! ```ignore
//! use qsearch_hal::{Backend, BackendRegistry};
//! use qsearch_ir::Circuit;
//!
//! async fn run(registry: &BackendRegistry) -> anyhow::Result<()> {
//!     let backend = registry.get("qasm_simulator")?;
//!     let job_id = backend.submit(&Circuit::bell()?, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!     println!("{}", result.counts);
//!     Ok(())
//! }
//! ```
//!
//! # Implementing a backend
//!
//! Implement [`Backend`] for the execution lifecycle and [`BackendFactory`]
//! so the registry can build it from a [`BackendConfig`]. Only
//! `validate()` and `wait()` have default bodies.

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, DEFAULT_MAX_SHOTS, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult};
