//! Property tests: every histogram accounts for exactly the requested shots.

use proptest::prelude::*;

use qsearch_adapter_sim::SimulatorBackend;
use qsearch_hal::Backend;
use qsearch_ir::{Circuit, QubitId};

#[derive(Debug, Clone)]
enum Op {
    H(u32),
    X(u32),
    Ry(f64, u32),
    CX(u32, u32),
}

fn op(num_qubits: u32) -> impl Strategy<Value = Op> {
    let q = 0..num_qubits;
    prop_oneof![
        q.clone().prop_map(Op::H),
        q.clone().prop_map(Op::X),
        (0.0..std::f64::consts::TAU, q.clone()).prop_map(|(t, q)| Op::Ry(t, q)),
        (q.clone(), q).prop_map(|(a, b)| Op::CX(a, b)),
    ]
}

fn circuit_and_shots() -> impl Strategy<Value = (u32, Vec<Op>, u32, bool)> {
    (1u32..=5).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(op(n), 0..12),
            1u32..300,
            any::<bool>(),
        )
    })
}

fn build(num_qubits: u32, ops: &[Op], mid_circuit: bool) -> Circuit {
    let mut circuit = Circuit::with_size("random", num_qubits, 0);
    for op in ops {
        // CX with equal operands is rejected by the builder; skip it.
        let _ = match *op {
            Op::H(q) => circuit.h(QubitId(q)).map(|_| ()),
            Op::X(q) => circuit.x(QubitId(q)).map(|_| ()),
            Op::Ry(t, q) => circuit.ry(t, QubitId(q)).map(|_| ()),
            Op::CX(a, b) => circuit.cx(QubitId(a), QubitId(b)).map(|_| ()),
        };
    }
    circuit.measure_all().unwrap();
    if mid_circuit {
        // Touching a measured qubit forces the per-shot replay path.
        circuit.h(QubitId(0)).unwrap().measure_all().unwrap();
    }
    circuit
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn counts_cover_all_shots((n, ops, shots, mid) in circuit_and_shots()) {
        let circuit = build(n, &ops, mid);
        let backend = SimulatorBackend::new().with_seed(1);

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let result = rt.block_on(async {
            let job_id = backend.submit(&circuit, shots).await.unwrap();
            backend.result(&job_id).await.unwrap()
        });

        prop_assert!(result.is_consistent());
        prop_assert_eq!(result.counts.total_shots(), u64::from(shots));
        prop_assert!(result.counts.len() <= 1 << n);
        for (bitstring, count) in &result.counts {
            prop_assert_eq!(bitstring.len(), circuit.num_clbits());
            prop_assert!(bitstring.chars().all(|c| c == '0' || c == '1'));
            prop_assert!(*count > 0);
        }
    }
}
