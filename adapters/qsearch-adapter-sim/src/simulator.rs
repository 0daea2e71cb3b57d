//! Simulator backend implementation.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use qsearch_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    DEFAULT_MAX_SHOTS, ExecutionResult, HalError, HalResult, Job, JobId, JobStatus,
};
use qsearch_ir::{Circuit, Instruction, InstructionKind};

use crate::statevector::Statevector;

/// Name the simulator registers under.
pub const SIMULATOR_NAME: &str = "qasm_simulator";

const DEFAULT_MAX_QUBITS: u32 = 20;

struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local shot-based simulator.
///
/// Circuits run to completion inside `submit`, so by the time a job id is
/// returned its status is already terminal. Memory grows as `2^n`; the
/// default limit of 20 qubits keeps a register at 16 MB.
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Create a simulator with default limits and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::build(
            BackendConfig::new(SIMULATOR_NAME),
            DEFAULT_MAX_QUBITS,
            DEFAULT_MAX_SHOTS,
            None,
        )
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(
            BackendConfig::new(SIMULATOR_NAME),
            max_qubits,
            DEFAULT_MAX_SHOTS,
            None,
        )
    }

    /// Reseed the sampler so repeated runs produce identical histograms.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    fn build(config: BackendConfig, max_qubits: u32, max_shots: u32, seed: Option<u64>) -> Self {
        let capabilities = Capabilities::simulator(max_qubits)
            .with_name(config.name.clone())
            .with_max_shots(max_shots);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            capabilities,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            rng: Mutex::new(rng),
        }
    }

    fn check_submission(&self, circuit: &Circuit, shots: u32) -> HalResult<()> {
        let caps = &self.capabilities;
        if circuit.num_qubits() > caps.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                caps.num_qubits
            )));
        }
        if shots == 0 || shots > caps.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots requested, expected 1..={}",
                caps.max_shots
            )));
        }
        if !circuit.has_measurements() {
            return Err(HalError::InvalidCircuit(
                "circuit has no measurements, so there is nothing to count".into(),
            ));
        }
        Ok(())
    }

    /// Run a circuit synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();
        let instructions: Vec<&Instruction> = circuit.instructions().collect();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        debug!(
            "Starting simulation: {} qubits, {} instructions, {} shots",
            circuit.num_qubits(),
            instructions.len(),
            shots
        );

        let counts = if measurements_are_terminal(&instructions) {
            debug!("Sampling from a single statevector pass");
            sample_terminal(circuit, &instructions, shots, &mut *rng)
        } else {
            debug!("Replaying circuit per shot");
            replay_shots(circuit, &instructions, shots, &mut *rng)
        };

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots)
            .with_execution_time(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .with_metadata("backend", self.config.name.clone())
    }

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, SimJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// True when no operation other than a barrier touches a qubit after it has
/// been measured, and nothing resets.
fn measurements_are_terminal(instructions: &[&Instruction]) -> bool {
    let mut measured = vec![];
    for inst in instructions {
        match inst.kind {
            InstructionKind::Barrier => {}
            InstructionKind::Reset => return false,
            InstructionKind::Measure | InstructionKind::Gate(_) => {
                if inst.qubits.iter().any(|q| measured.contains(q)) {
                    return false;
                }
                if inst.is_measure() {
                    measured.extend(inst.qubits.iter().copied());
                }
            }
        }
    }
    true
}

/// Render classical bit values with `c0` as the rightmost character.
fn clbits_to_bitstring(clbits: &[bool]) -> String {
    clbits
        .iter()
        .rev()
        .map(|&bit| if bit { '1' } else { '0' })
        .collect()
}

fn sample_terminal(
    circuit: &Circuit,
    instructions: &[&Instruction],
    shots: u32,
    rng: &mut StdRng,
) -> Counts {
    let mut sv = Statevector::new(circuit.num_qubits());
    let mut wiring = vec![];
    for inst in instructions {
        sv.apply_unitary(inst);
        wiring.extend(inst.measured_pairs());
    }

    let mut counts = Counts::new();
    let mut clbits = vec![false; circuit.num_clbits()];
    for _ in 0..shots {
        let outcome = sv.sample(rng);
        for &(qubit, clbit) in &wiring {
            clbits[clbit.index()] = outcome & (1 << qubit.index()) != 0;
        }
        counts.insert(clbits_to_bitstring(&clbits), 1);
    }
    counts
}

fn replay_shots(
    circuit: &Circuit,
    instructions: &[&Instruction],
    shots: u32,
    rng: &mut StdRng,
) -> Counts {
    let mut counts = Counts::new();
    for shot in 0..shots {
        let mut sv = Statevector::new(circuit.num_qubits());
        let mut clbits = vec![false; circuit.num_clbits()];
        for inst in instructions {
            match inst.kind {
                InstructionKind::Gate(_) => sv.apply_unitary(inst),
                InstructionKind::Measure => {
                    for (qubit, clbit) in inst.measured_pairs() {
                        clbits[clbit.index()] = sv.measure(qubit.index(), rng);
                    }
                }
                InstructionKind::Reset => {
                    for qubit in &inst.qubits {
                        sv.reset(qubit.index(), rng);
                    }
                }
                InstructionKind::Barrier => {}
            }
        }
        counts.insert(clbits_to_bitstring(&clbits), 1);

        if shot > 0 && shot % 1000 == 0 {
            debug!("Completed {} shots", shot);
        }
    }
    counts
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        self.check_submission(circuit, shots)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), shots).with_backend(self.config.name.clone());
        self.lock_jobs().insert(job_id.0.clone(), SimJob { job, result: None });
        debug!("Submitted job: {}", job_id);

        if let Some(sim_job) = self.lock_jobs().get_mut(&job_id.0) {
            sim_job.job.transition(JobStatus::Running);
        }

        let result = self.run_simulation(circuit, shots);

        if let Some(sim_job) = self.lock_jobs().get_mut(&job_id.0) {
            if sim_job.job.transition(JobStatus::Completed) {
                sim_job.result = Some(result);
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.lock_jobs()
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.lock_jobs();
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (status, _) => Err(HalError::Backend(format!(
                "job {job_id} has no result yet (status: {status})"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.lock_jobs();
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        // Finished jobs keep their outcome.
        sim_job.job.transition(JobStatus::Cancelled);
        Ok(())
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = read_u32(&config, "max_qubits")?.unwrap_or(DEFAULT_MAX_QUBITS);
        let max_shots = read_u32(&config, "max_shots")?.unwrap_or(DEFAULT_MAX_SHOTS);
        let seed = config.get_u64("seed")?;

        Ok(Self::build(config, max_qubits, max_shots, seed))
    }
}

fn read_u32(config: &BackendConfig, key: &str) -> HalResult<Option<u32>> {
    config
        .get_u64(key)?
        .map(|v| {
            u32::try_from(v)
                .map_err(|_| HalError::Configuration(format!("'{key}' is out of range: {v}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsearch_ir::{ClbitId, QubitId};

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert_eq!(backend.name(), "qasm_simulator");
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 20);
        assert_eq!(caps.max_shots, DEFAULT_MAX_SHOTS);
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new();

        let circuit = Circuit::bell().unwrap();
        let job_id = backend.submit(&circuit, 1000).await.unwrap();

        let status = backend.status(&job_id).await.unwrap();
        assert!(status.is_success());

        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.shots, 1000);
        assert!(result.is_consistent());

        let counts = &result.counts;
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[tokio::test]
    async fn test_simulator_ghz_state() {
        let backend = SimulatorBackend::new();

        let circuit = Circuit::ghz(3).unwrap();
        let job_id = backend.submit(&circuit, 1000).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        let counts = &result.counts;
        assert_eq!(counts.get("000") + counts.get("111"), 1000);
    }

    #[tokio::test]
    async fn test_clbit_zero_is_rightmost() {
        let backend = SimulatorBackend::new();

        let mut circuit = Circuit::with_size("x0", 3, 3);
        circuit.x(QubitId(0)).unwrap().measure_all().unwrap();
        let job_id = backend.submit(&circuit, 50).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();

        assert_eq!(result.counts.get("001"), 50);
        assert_eq!(result.counts.len(), 1);
    }

    #[tokio::test]
    async fn test_mid_circuit_measurement_and_reset() {
        let backend = SimulatorBackend::new().with_seed(3);

        // c0 records a coin flip, then q0 is reset and flipped to 1 for c1.
        let mut circuit = Circuit::with_size("mid", 1, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .reset(QubitId(0))
            .unwrap()
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(1))
            .unwrap();

        let job_id = backend.submit(&circuit, 400).await.unwrap();
        let counts = backend.result(&job_id).await.unwrap().counts;

        assert_eq!(counts.get("10") + counts.get("11"), 400);
        assert!(counts.get("10") > 100);
        assert!(counts.get("11") > 100);
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let circuit = Circuit::uniform_superposition(3).unwrap();

        let a = SimulatorBackend::new().with_seed(42);
        let b = SimulatorBackend::new().with_seed(42);
        let ra = a.result(&a.submit(&circuit, 1024).await.unwrap()).await.unwrap();
        let rb = b.result(&b.submit(&circuit, 1024).await.unwrap()).await.unwrap();

        assert_eq!(ra.counts, rb.counts);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let circuit = Circuit::with_size("test", 10, 0);
        let result = backend.submit(&circuit, 100).await;

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_invalid_shots() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::bell().unwrap();

        assert!(matches!(
            backend.submit(&circuit, 0).await,
            Err(HalError::InvalidShots(_))
        ));
        assert!(matches!(
            backend.submit(&circuit, DEFAULT_MAX_SHOTS + 1).await,
            Err(HalError::InvalidShots(_))
        ));
    }

    #[tokio::test]
    async fn test_unmeasured_circuit_rejected() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("bare", 2, 0);
        circuit.h(QubitId(0)).unwrap();

        assert!(matches!(
            backend.submit(&circuit, 10).await,
            Err(HalError::InvalidCircuit(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let backend = SimulatorBackend::new();
        let missing = JobId::new("nope");

        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
        assert!(matches!(
            backend.cancel(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cancel_after_completion_keeps_result() {
        let backend = SimulatorBackend::new();
        let job_id = backend.submit(&Circuit::bell().unwrap(), 10).await.unwrap();

        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);
        assert!(backend.result(&job_id).await.is_ok());
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("qasm_simulator")
            .with_extra("max_qubits", serde_json::json!(4))
            .with_extra("max_shots", serde_json::json!(2048))
            .with_extra("seed", serde_json::json!(9));
        let backend = SimulatorBackend::from_config(config).unwrap();

        assert_eq!(backend.capabilities().num_qubits, 4);
        assert_eq!(backend.capabilities().max_shots, 2048);

        let bad = BackendConfig::new("qasm_simulator")
            .with_extra("max_qubits", serde_json::json!(u64::MAX));
        assert!(matches!(
            SimulatorBackend::from_config(bad),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_terminal_detection() {
        let ghz = Circuit::ghz(3).unwrap();
        let insts: Vec<_> = ghz.instructions().collect();
        assert!(measurements_are_terminal(&insts));

        let mut late = Circuit::with_size("late", 1, 1);
        late.measure(QubitId(0), ClbitId(0)).unwrap().x(QubitId(0)).unwrap();
        let insts: Vec<_> = late.instructions().collect();
        assert!(!measurements_are_terminal(&insts));
    }
}
