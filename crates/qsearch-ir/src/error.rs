//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised while building a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not present in the circuit.
    #[error("Qubit {qubit} not found in circuit{}", gate_context(.gate_name))]
    QubitNotFound {
        /// The missing qubit.
        qubit: QubitId,
        /// Gate being applied, if any.
        gate_name: Option<String>,
    },

    /// Classical bit not present in the circuit.
    #[error("Classical bit {clbit} not found in circuit{}", gate_context(.gate_name))]
    ClbitNotFound {
        /// The missing classical bit.
        clbit: ClbitId,
        /// Gate being applied, if any.
        gate_name: Option<String>,
    },

    /// Gate applied to the wrong number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Arity of the gate.
        expected: u32,
        /// Number of operands supplied.
        got: u32,
    },

    /// The same qubit appears twice in one instruction.
    #[error("Duplicate qubit {qubit} in operation{}", gate_context(.gate_name))]
    DuplicateQubit {
        /// The repeated qubit.
        qubit: QubitId,
        /// Gate being applied, if any.
        gate_name: Option<String>,
    },

    /// Measurement operands do not pair up.
    #[error("Measurement maps {qubits} qubits onto {clbits} classical bits")]
    MeasureMismatch {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of target classical bits.
        clbits: usize,
    },

    /// Inconsistent graph state.
    #[error("Invalid DAG structure: {0}")]
    InvalidDag(String),
}

#[allow(clippy::ref_option)]
fn gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
