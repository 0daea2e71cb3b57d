//! Uniform superposition demo.
//!
//! Builds an `n`-qubit circuit that puts every qubit into superposition,
//! runs it on a registered backend and reports the measured histogram:
//!
//! ```text
//!   q0 ─H─░─M─
//!   q1 ─H─░─M─      1024 shots      Results of quantum search: {'000': 128, ...}
//!   q2 ─H─░─M─    ──────────→
//! ```
//!
//! Each of the `2^n` outcomes is equally likely, so with the defaults every
//! bitstring shows up about 128 times.
//!
//! ```ignore
//! use qsearch_demos::{DemoConfig, default_registry, run_demo_with};
//!
//! let mut out = Vec::new();
//! let counts = run_demo_with(&default_registry(), &DemoConfig::default(), &mut out).await?;
//! assert_eq!(counts.total_shots(), 1024);
//! ```

pub mod config;
pub mod error;
pub mod runner;

use console::style;

pub use config::DemoConfig;
pub use error::{DemoError, DemoResult};
pub use runner::{
    check_histogram, default_registry, execute, format_histogram, run_demo, run_demo_with,
    superposition_circuit,
};

/// Print an error to stderr.
pub fn print_error(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}
