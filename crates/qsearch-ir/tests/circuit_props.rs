//! Property-based tests for circuit construction.

use proptest::prelude::*;
use qsearch_ir::{Circuit, QubitId};

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    Rz(f64, u32),
    CX(u32, u32),
    Barrier,
}

impl GateOp {
    /// Apply the op, returning whether it was accepted.
    fn apply(self, circuit: &mut Circuit) -> bool {
        match self {
            GateOp::H(q) => circuit.h(QubitId(q)).is_ok(),
            GateOp::X(q) => circuit.x(QubitId(q)).is_ok(),
            GateOp::Rz(theta, q) => circuit.rz(theta, QubitId(q)).is_ok(),
            GateOp::CX(c, t) => circuit.cx(QubitId(c), QubitId(t)).is_ok(),
            GateOp::Barrier => circuit.barrier_all().is_ok(),
        }
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::X),
        (-3.2_f64..3.2, 0..num_qubits).prop_map(|(t, q)| GateOp::Rz(t, q)),
        (0..num_qubits, 0..num_qubits).prop_map(|(c, t)| GateOp::CX(c, t)),
        Just(GateOp::Barrier),
    ]
}

fn arb_ops() -> impl Strategy<Value = (u32, Vec<GateOp>)> {
    (1_u32..=5).prop_flat_map(|n| (Just(n), prop::collection::vec(arb_gate_op(n), 0..=20)))
}

proptest! {
    #[test]
    fn accepted_ops_all_land_in_the_dag((n, ops) in arb_ops()) {
        let mut circuit = Circuit::with_size("prop", n, 0);
        let accepted = ops.into_iter().filter(|op| op.clone().apply(&mut circuit)).count();

        prop_assert_eq!(circuit.dag().num_ops(), accepted);
        prop_assert_eq!(circuit.instructions().count(), accepted);
        prop_assert!(circuit.depth() <= accepted);
    }

    #[test]
    fn measure_all_always_pairs_every_qubit((n, ops) in arb_ops()) {
        let mut circuit = Circuit::with_size("prop", n, 0);
        for op in ops {
            op.apply(&mut circuit);
        }
        circuit.measure_all().unwrap();

        prop_assert_eq!(circuit.num_clbits(), n as usize);
        let last = circuit.instructions().last().unwrap();
        prop_assert!(last.is_measure());
        prop_assert_eq!(last.measured_pairs().count(), n as usize);
    }
}
