//! The superposition experiment, end to end.

use std::io::Write;

use tracing::{debug, info, instrument};

use qsearch_adapter_sim::{SIMULATOR_NAME, SimulatorBackend};
use qsearch_hal::{BackendRegistry, Counts, ExecutionResult, HalError, ValidationResult};
use qsearch_ir::Circuit;

use crate::config::DemoConfig;
use crate::error::{DemoError, DemoResult};

/// H on every qubit, a barrier, then a measurement of every qubit into an
/// implicitly created classical bit.
pub fn superposition_circuit(num_qubits: u32) -> DemoResult<Circuit> {
    Ok(Circuit::uniform_superposition(num_qubits)?)
}

/// Registry with the local simulator under `qasm_simulator`.
pub fn default_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register::<SimulatorBackend>(SIMULATOR_NAME);
    registry
}

/// Build the circuit, run it on the configured backend and check the
/// histogram.
#[instrument(skip(registry))]
pub async fn execute(registry: &BackendRegistry, config: &DemoConfig) -> DemoResult<ExecutionResult> {
    let circuit = superposition_circuit(config.num_qubits)?;
    debug!(
        "Built '{}': {} qubits, depth {}",
        circuit.name(),
        circuit.num_qubits(),
        circuit.depth()
    );

    let backend = registry.get(&config.backend)?;

    let availability = backend.availability().await?;
    if !availability.is_available {
        return Err(HalError::BackendUnavailable(
            availability
                .status_message
                .unwrap_or_else(|| backend.name().to_string()),
        )
        .into());
    }

    if let ValidationResult::Invalid { reasons } = backend.validate(&circuit).await? {
        return Err(HalError::InvalidCircuit(reasons.join("; ")).into());
    }

    let job_id = backend.submit(&circuit, config.shots).await?;
    info!("Submitted job {} to {}", job_id, backend.name());

    let result = backend.wait(&job_id).await?;
    check_histogram(&result, config.num_qubits)?;
    Ok(result)
}

/// Verify that every shot landed on a well-formed bitstring.
pub fn check_histogram(result: &ExecutionResult, num_qubits: u32) -> DemoResult<()> {
    let counts = &result.counts;
    let width = num_qubits as usize;

    if !result.is_consistent() {
        return Err(DemoError::UnexpectedOutcome(format!(
            "counts total {} but {} shots were requested",
            counts.total_shots(),
            result.shots
        )));
    }

    if let Some((bad, _)) = counts
        .iter()
        .find(|(key, _)| key.len() != width || !key.chars().all(|c| c == '0' || c == '1'))
    {
        return Err(DemoError::UnexpectedOutcome(format!(
            "'{bad}' is not a {width}-bit string"
        )));
    }

    let max_outcomes = 1_usize.checked_shl(num_qubits).unwrap_or(usize::MAX);
    if counts.is_empty() || counts.len() > max_outcomes {
        return Err(DemoError::UnexpectedOutcome(format!(
            "{} distinct outcomes, expected 1..={max_outcomes}",
            counts.len()
        )));
    }

    Ok(())
}

/// The report line: `<label>: {'000': 128, ...}`.
pub fn format_histogram(label: &str, counts: &Counts) -> String {
    format!("{label}: {counts}")
}

/// Run the experiment and write its report line to `out`.
///
/// Nothing is written when the run fails.
pub async fn run_demo_with<W: Write>(
    registry: &BackendRegistry,
    config: &DemoConfig,
    out: &mut W,
) -> DemoResult<Counts> {
    let result = execute(registry, config).await?;
    writeln!(out, "{}", format_histogram(&config.label, &result.counts))?;
    out.flush()?;
    Ok(result.counts)
}

/// Run the default experiment on the local simulator, reporting to stdout.
pub async fn run_demo() -> DemoResult<Counts> {
    let registry = default_registry();
    let mut stdout = std::io::stdout();
    run_demo_with(&registry, &DemoConfig::default(), &mut stdout).await
}
