//! Demo parameters.

use serde::{Deserialize, Serialize};

use qsearch_adapter_sim::SIMULATOR_NAME;

/// Parameters of the superposition experiment.
///
/// The binary always runs with [`DemoConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Qubits placed in superposition.
    pub num_qubits: u32,
    /// Repetitions of the circuit.
    pub shots: u32,
    /// Registry name of the backend to run on.
    pub backend: String,
    /// Prefix of the printed result line.
    pub label: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            num_qubits: 3,
            shots: 1024,
            backend: SIMULATOR_NAME.into(),
            label: "Results of quantum search".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.num_qubits, 3);
        assert_eq!(config.shots, 1024);
        assert_eq!(config.backend, "qasm_simulator");
        assert_eq!(config.label, "Results of quantum search");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: DemoConfig = serde_json::from_str(r#"{"shots": 64}"#).unwrap();
        assert_eq!(config.shots, 64);
        assert_eq!(config.num_qubits, 3);
        assert_eq!(config.backend, "qasm_simulator");
    }
}
