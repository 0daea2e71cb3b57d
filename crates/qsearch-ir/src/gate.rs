//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Gates with fixed, known semantics.
///
/// Rotation angles are concrete radians; there is no symbolic
/// parameter binding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// S (sqrt(Z)).
    S,
    /// S-dagger.
    Sdg,
    /// T (fourth root of Z).
    T,
    /// T-dagger.
    Tdg,
    /// Rotation around X.
    Rx(f64),
    /// Rotation around Y.
    Ry(f64),
    /// Rotation around Z.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Controlled-X (CNOT).
    CX,
    /// Controlled-Z.
    CZ,
    /// SWAP.
    Swap,
    /// Toffoli (CCX).
    CCX,
}

impl StandardGate {
    /// OpenQASM-style lowercase name.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CCX => "ccx",
        }
    }

    /// Number of qubits the gate acts on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,
            StandardGate::CCX => 3,
            _ => 1,
        }
    }
}

/// The gate carried by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The gate kind.
    pub kind: StandardGate,
}

impl Gate {
    /// Gate name.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Gate arity.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(kind: StandardGate) -> Self {
        Self { kind }
    }
}
