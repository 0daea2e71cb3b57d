//! Backend capability introspection.
//!
//! A [`Capabilities`] value describes what a backend accepts: qubit count,
//! gate names and shot limits. Backends build it once at construction and
//! hand out references.

use serde::{Deserialize, Serialize};

use qsearch_ir::Circuit;

/// Shot limit of a local simulator unless configured otherwise.
pub const DEFAULT_MAX_SHOTS: u32 = 100_000;

/// Hardware or simulator capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set.
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether the backend is a classical simulator.
    pub is_simulator: bool,
    /// Capability flags such as `"statevector"` or `"mid_circuit_measurement"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities of a local statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: DEFAULT_MAX_SHOTS,
            is_simulator: true,
            features: vec![
                "statevector".into(),
                "mid_circuit_measurement".into(),
                "reset".into(),
            ],
        }
    }

    /// Rename the described backend.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the shot limit.
    #[must_use]
    pub fn with_max_shots(mut self, max_shots: u32) -> Self {
        self.max_shots = max_shots;
        self
    }

    /// Check whether a feature flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Reasons `circuit` cannot run here; empty when it fits.
    pub fn violations(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = vec![];

        if circuit.num_qubits() > self.num_qubits as usize {
            reasons.push(format!(
                "circuit uses {} qubits, backend has {}",
                circuit.num_qubits(),
                self.num_qubits
            ));
        }

        let mut unsupported: Vec<&str> = circuit
            .instructions()
            .filter_map(|inst| inst.as_gate())
            .map(|gate| gate.name())
            .filter(|name| !self.gate_set.contains(name))
            .collect();
        unsupported.sort_unstable();
        unsupported.dedup();
        for name in unsupported {
            reasons.push(format!("gate '{name}' is not supported"));
        }

        reasons
    }
}

/// Gate names a backend accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// Every gate the IR can express.
    pub fn universal() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| (*s).to_string()).collect();
        Self {
            single_qubit: names(&[
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "rx", "ry", "rz", "p",
            ]),
            two_qubit: names(&["cx", "cz", "swap"]),
            three_qubit: names(&["ccx"]),
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .chain(&self.three_qubit)
            .any(|g| g == gate)
    }
}
