//! qsearch circuit intermediate representation
//!
//! Core data structures for describing quantum circuits: qubit and classical
//! bit identifiers, gates, instructions, and a DAG that keeps operations in
//! wire order. [`Circuit`] is the builder most code should use.
//!
//! # Example: uniform superposition
//!
//! ```rust
//! use qsearch_ir::Circuit;
//!
//! // Three qubits, no classical bits declared up front.
//! let mut circuit = Circuit::with_size("superposition", 3, 0);
//! circuit.h_all()?.barrier_all()?.measure_all()?;
//!
//! assert_eq!(circuit.num_clbits(), 3);
//! assert_eq!(circuit.depth(), 2);
//! # Ok::<(), qsearch_ir::IrError>(())
//! ```
//!
//! # Supported gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I`, `X`, `Y`, `Z` | 1 | Identity and Pauli gates |
//! | `H` | 1 | Hadamard |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase gates |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotations (radians) |
//! | `CX`, `CZ`, `Swap` | 2 | Two-qubit gates |
//! | `CCX` | 3 | Toffoli |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
