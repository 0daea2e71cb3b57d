//! Uniform Superposition Demo
//!
//! Runs the three-qubit superposition experiment once and prints its
//! histogram. Takes no arguments.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use qsearch_demos::{print_error, run_demo};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = run_demo().await.context("quantum search demo failed");

    if let Err(e) = result {
        print_error(format!("{e:#}"));
        std::process::exit(1);
    }

    Ok(())
}
