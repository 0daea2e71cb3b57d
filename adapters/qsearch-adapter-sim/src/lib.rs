//! Local statevector simulator for qsearch.
//!
//! [`SimulatorBackend`] implements the HAL [`Backend`](qsearch_hal::Backend)
//! trait on top of an exact [`Statevector`]. Shots are drawn from the final
//! state when every measurement is terminal, and replayed one by one with
//! collapse otherwise.
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//!
//! # Example
//!
//! ```ignore
//! use qsearch_adapter_sim::SimulatorBackend;
//! use qsearch_hal::Backend;
//! use qsearch_ir::Circuit;
//!
//! let backend = SimulatorBackend::new().with_seed(7);
//! let job_id = backend.submit(&Circuit::bell()?, 1000).await?;
//! let result = backend.wait(&job_id).await?;
//! println!("{}", result.counts);
//! ```

mod simulator;
mod statevector;

pub use simulator::{SIMULATOR_NAME, SimulatorBackend};
pub use statevector::Statevector;
